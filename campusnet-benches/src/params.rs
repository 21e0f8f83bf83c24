//! Benchmark parameter types, rendered as Criterion benchmark ids.

use std::fmt;

/// Parameters for a graph benchmark run.
#[derive(Clone, Debug)]
pub struct GraphBenchParams {
    /// Number of users.
    pub user_count: usize,
    /// Extra random links per user on top of the spanning backbone.
    pub extra_links_per_user: usize,
}

impl fmt::Display for GraphBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},d={}", self.user_count, self.extra_links_per_user)
    }
}

/// Parameters for a coverage benchmark run.
#[derive(Clone, Debug)]
pub struct CoverageBenchParams {
    /// Number of categories.
    pub category_count: usize,
    /// Selection budget.
    pub budget: u64,
    /// Ranking rule label.
    pub rule: &'static str,
}

impl fmt::Display for CoverageBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "c={},b={},{}",
            self.category_count, self.budget, self.rule
        )
    }
}
