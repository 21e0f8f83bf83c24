//! Seeded synthetic campuses.
//!
//! Every generated campus is connected: user `i` befriends a random earlier
//! user before extra random links are added. Categories reach random subsets
//! of users and the candidate pool holds random pairs, so blockage runs have
//! something to reconnect from.

use std::collections::BTreeSet;

use campusnet_core::{
    CategoryRecord, CategorySet, Edge, EdgeRecord, Graph, RecordKind, UserId, UserRecord,
};
use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::error::BenchSetupError;

/// Shape of a synthetic campus.
#[derive(Clone, Debug)]
pub struct SyntheticCampusConfig {
    /// Number of users; must be positive.
    pub user_count: usize,
    /// Extra random links per user beyond the spanning backbone.
    pub extra_links_per_user: usize,
    /// Number of interest categories.
    pub category_count: usize,
    /// Upper bound (inclusive) of each category's reach; must be positive.
    pub max_reach: usize,
    /// Number of candidate links in the reconnection pool.
    pub candidate_count: usize,
    /// Upper bound (inclusive) of link and category costs; must be positive.
    pub max_cost: u64,
    /// Seed for the deterministic generator.
    pub seed: u64,
}

impl Default for SyntheticCampusConfig {
    fn default() -> Self {
        Self {
            user_count: 100,
            extra_links_per_user: 2,
            category_count: 20,
            max_reach: 10,
            candidate_count: 50,
            max_cost: 100,
            seed: 42,
        }
    }
}

/// A generated campus ready to feed the planners.
#[derive(Clone, Debug)]
pub struct SyntheticCampus {
    graph: Graph,
    categories: CategorySet,
    candidates: Vec<Edge>,
}

impl SyntheticCampus {
    /// Generates a campus from `config`.
    ///
    /// # Errors
    /// Returns [`BenchSetupError::InvalidConfig`] for a zero user count,
    /// reach bound or cost bound, and [`BenchSetupError::Validation`] if the
    /// generated records are rejected.
    pub fn generate(config: &SyntheticCampusConfig) -> Result<Self, BenchSetupError> {
        validate(config)?;
        let mut rng = SmallRng::seed_from_u64(config.seed);
        let users: Vec<UserRecord> = (1..=config.user_count)
            .map(|id| user_record(id as u64))
            .collect();

        let links = generate_links(config, &mut rng);
        let graph = Graph::try_new(users, &links)?;

        let categories: Vec<CategoryRecord> = (1..=config.category_count)
            .map(|id| category_record(id as u64, config, &mut rng))
            .collect();
        let categories = CategorySet::try_new(categories, &graph)?;

        let candidates: Vec<EdgeRecord> = (0..config.candidate_count)
            .map(|_| random_link(config, &mut rng))
            .collect();
        let candidates = graph.validate_links(&candidates, RecordKind::Candidate)?;

        Ok(Self {
            graph,
            categories,
            candidates,
        })
    }

    /// Returns the generated graph.
    #[must_use]
    pub const fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Returns the generated categories.
    #[must_use]
    pub const fn categories(&self) -> &CategorySet {
        &self.categories
    }

    /// Returns the generated candidate pool.
    #[must_use]
    pub fn candidates(&self) -> &[Edge] {
        &self.candidates
    }

    /// Picks up to `count` links to block, spread evenly over the graph's
    /// links in cost order.
    #[must_use]
    pub fn blocked_links(&self, count: usize) -> Vec<(UserId, UserId)> {
        let edges = self.graph.edges();
        if count == 0 || edges.is_empty() {
            return Vec::new();
        }
        let stride = (edges.len() / count).max(1);
        edges
            .iter()
            .step_by(stride)
            .take(count)
            .map(Edge::endpoints)
            .collect()
    }
}

fn validate(config: &SyntheticCampusConfig) -> Result<(), BenchSetupError> {
    let reason = if config.user_count == 0 {
        "user_count must be positive"
    } else if config.max_reach == 0 {
        "max_reach must be positive"
    } else if config.max_cost == 0 {
        "max_cost must be positive"
    } else {
        return Ok(());
    };
    Err(BenchSetupError::InvalidConfig { reason })
}

fn user_record(id: u64) -> UserRecord {
    UserRecord::new(id, format!("user-{id}"))
}

fn generate_links(config: &SyntheticCampusConfig, rng: &mut SmallRng) -> Vec<EdgeRecord> {
    let mut links = Vec::with_capacity(config.user_count * (1 + config.extra_links_per_user));
    for user in 2..=config.user_count as u64 {
        let friend = rng.gen_range(1..user);
        links.push(EdgeRecord::new(friend, user, random_cost(config, rng)));
    }
    for _ in 0..config.user_count * config.extra_links_per_user {
        links.push(random_link(config, rng));
    }
    links
}

fn random_link(config: &SyntheticCampusConfig, rng: &mut SmallRng) -> EdgeRecord {
    let upper = config.user_count as u64;
    EdgeRecord::new(
        rng.gen_range(1..=upper),
        rng.gen_range(1..=upper),
        random_cost(config, rng),
    )
}

fn random_cost(config: &SyntheticCampusConfig, rng: &mut SmallRng) -> i64 {
    let cost = rng.gen_range(1..=config.max_cost);
    i64::try_from(cost).unwrap_or(i64::MAX)
}

fn category_record(id: u64, config: &SyntheticCampusConfig, rng: &mut SmallRng) -> CategoryRecord {
    let reach = rng.gen_range(1..=config.max_reach.min(config.user_count));
    let upper = config.user_count as u64;
    let mut reached = BTreeSet::new();
    while reached.len() < reach {
        reached.insert(rng.gen_range(1..=upper));
    }
    CategoryRecord::new(id, random_cost(config, rng), reached).with_name(format!("category-{id}"))
}
