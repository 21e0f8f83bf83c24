//! Environment-driven tuning for property-test suites.
//!
//! Every property suite in the workspace reads its case count and fork mode
//! through [`ProptestRunProfile`], so CI can scale all of them with two
//! variables.

use std::env;

/// Environment variable overriding the number of cases per property.
pub const PROGTEST_CASES_ENV_KEY: &str = "PROGTEST_CASES";
/// Environment variable toggling forked execution of property cases.
pub const CAMPUSNET_PBT_FORK_ENV_KEY: &str = "CAMPUSNET_PBT_FORK";

/// Case count and fork mode for one property suite.
///
/// # Examples
/// ```
/// use campusnet_test_support::proptest_profile::ProptestRunProfile;
///
/// let profile = ProptestRunProfile::load(64, false);
/// assert!(profile.cases() > 0);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ProptestRunProfile {
    cases: u32,
    fork: bool,
}

impl ProptestRunProfile {
    /// Reads overrides from the environment, keeping the given defaults for
    /// unset or malformed values. Malformed values are logged at `warn`.
    #[must_use]
    pub fn load(default_cases: u32, default_fork: bool) -> Self {
        Self {
            cases: override_or(PROGTEST_CASES_ENV_KEY, default_cases, parse_cases),
            fork: override_or(CAMPUSNET_PBT_FORK_ENV_KEY, default_fork, parse_switch),
        }
    }

    /// Returns the number of cases per property.
    #[must_use]
    pub const fn cases(&self) -> u32 {
        self.cases
    }

    /// Returns `true` when cases run in forked subprocesses.
    #[must_use]
    pub const fn fork(&self) -> bool {
        self.fork
    }
}

fn override_or<T>(key: &'static str, default: T, parse: fn(&str) -> Result<T, &'static str>) -> T {
    let Ok(raw) = env::var(key) else {
        return default;
    };
    parse(raw.trim()).unwrap_or_else(|reason| {
        tracing::warn!(env = key, raw = %raw, reason, "ignoring property-test override");
        default
    })
}

fn parse_cases(raw: &str) -> Result<u32, &'static str> {
    match raw.parse::<u32>() {
        Ok(0) => Err("cases must be positive"),
        Ok(cases) => Ok(cases),
        Err(_) => Err("cases must be an unsigned integer"),
    }
}

fn parse_switch(raw: &str) -> Result<bool, &'static str> {
    const ON: [&str; 4] = ["1", "true", "yes", "on"];
    const OFF: [&str; 4] = ["0", "false", "no", "off"];
    let lowered = raw.to_ascii_lowercase();
    if ON.contains(&lowered.as_str()) {
        Ok(true)
    } else if OFF.contains(&lowered.as_str()) {
        Ok(false)
    } else {
        Err("expected 1/0, true/false, yes/no or on/off")
    }
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::sync::{Mutex, MutexGuard, PoisonError};

    use rstest::rstest;

    use super::{CAMPUSNET_PBT_FORK_ENV_KEY, PROGTEST_CASES_ENV_KEY, ProptestRunProfile};

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Holds the environment lock and restores both variables on drop.
    struct ScopedEnv {
        saved: Vec<(&'static str, Option<String>)>,
        _lock: MutexGuard<'static, ()>,
    }

    impl ScopedEnv {
        fn new(cases: Option<&str>, fork: Option<&str>) -> Self {
            let lock = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
            let mut saved = Vec::new();
            for (key, value) in [(PROGTEST_CASES_ENV_KEY, cases), (CAMPUSNET_PBT_FORK_ENV_KEY, fork)] {
                saved.push((key, env::var(key).ok()));
                // SAFETY: every test touching these variables holds ENV_LOCK.
                unsafe {
                    match value {
                        Some(value) => env::set_var(key, value),
                        None => env::remove_var(key),
                    }
                }
            }
            Self { saved, _lock: lock }
        }
    }

    impl Drop for ScopedEnv {
        fn drop(&mut self) {
            for (key, value) in self.saved.drain(..) {
                // SAFETY: ENV_LOCK is still held by this guard.
                unsafe {
                    match value {
                        Some(value) => env::set_var(key, value),
                        None => env::remove_var(key),
                    }
                }
            }
        }
    }

    #[test]
    fn defaults_apply_without_overrides() {
        let _env = ScopedEnv::new(None, None);
        assert_eq!(
            ProptestRunProfile::load(32, true),
            ProptestRunProfile {
                cases: 32,
                fork: true,
            }
        );
    }

    #[rstest]
    #[case("1", 1)]
    #[case(" 512 ", 512)]
    #[case("40000", 40_000)]
    fn valid_case_overrides_apply(#[case] raw: &str, #[case] expected: u32) {
        let _env = ScopedEnv::new(Some(raw), None);
        assert_eq!(ProptestRunProfile::load(64, false).cases(), expected);
    }

    #[rstest]
    #[case("0")]
    #[case("-4")]
    #[case("many")]
    fn invalid_case_overrides_keep_default(#[case] raw: &str) {
        let _env = ScopedEnv::new(Some(raw), None);
        assert_eq!(ProptestRunProfile::load(64, false).cases(), 64);
    }

    #[rstest]
    #[case("yes", true)]
    #[case("ON", true)]
    #[case("1", true)]
    #[case("False", false)]
    #[case("off", false)]
    #[case("0", false)]
    fn valid_fork_overrides_apply(#[case] raw: &str, #[case] expected: bool) {
        let _env = ScopedEnv::new(None, Some(raw));
        assert_eq!(ProptestRunProfile::load(64, !expected).fork(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("sometimes")]
    #[case("2")]
    fn invalid_fork_overrides_keep_default(#[case] raw: &str) {
        let _env = ScopedEnv::new(None, Some(raw));
        assert!(ProptestRunProfile::load(64, true).fork());
    }
}
