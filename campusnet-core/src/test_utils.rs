//! Shared test utilities for `campusnet-core`.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use campusnet_test_support::proptest_profile::ProptestRunProfile;
use proptest::test_runner::Config as ProptestConfig;

use crate::graph::{EdgeRecord, Graph, UserId, UserRecord};

/// Builds a standard proptest configuration from the shared run profile.
///
/// This keeps property suites aligned on the same `PROGTEST_CASES` and
/// `CAMPUSNET_PBT_FORK` interpretation.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// Builds a validated graph over `users` with `(from, to, cost)` links.
///
/// Every user is named `user-<id>`.
pub(crate) fn graph_of(users: &[u64], edges: &[(u64, u64, i64)]) -> Graph {
    let records = users
        .iter()
        .map(|id| UserRecord::new(*id, format!("user-{id}")))
        .collect();
    let links: Vec<EdgeRecord> = edges
        .iter()
        .map(|(from, to, cost)| EdgeRecord::new(*from, *to, *cost))
        .collect();
    match Graph::try_new(records, &links) {
        Ok(graph) => graph,
        Err(err) => panic!("test graph must validate: {err}"),
    }
}

/// Shorthand for a list of [`UserId`] values.
pub(crate) fn ids(raw: &[u64]) -> Vec<UserId> {
    raw.iter().copied().map(UserId::new).collect()
}

/// Connected components by breadth-first search, independent of the
/// disjoint set under test.
///
/// Components are ordered by their smallest member.
pub(crate) fn bfs_components(
    users: impl IntoIterator<Item = UserId>,
    links: impl IntoIterator<Item = (UserId, UserId)>,
) -> Vec<BTreeSet<UserId>> {
    let mut adjacency: BTreeMap<UserId, Vec<UserId>> =
        users.into_iter().map(|user| (user, Vec::new())).collect();
    for (left, right) in links {
        adjacency.entry(left).or_default().push(right);
        adjacency.entry(right).or_default().push(left);
    }

    let mut seen = BTreeSet::new();
    let mut components = Vec::new();
    for &start in adjacency.keys() {
        if !seen.insert(start) {
            continue;
        }
        let mut component = BTreeSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(user) = queue.pop_front() {
            for &next in adjacency.get(&user).map(Vec::as_slice).unwrap_or_default() {
                if seen.insert(next) {
                    component.insert(next);
                    queue.push_back(next);
                }
            }
        }
        components.push(component);
    }
    components
}
