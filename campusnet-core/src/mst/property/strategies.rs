//! Graph generators for the spanning forest property tests.
//!
//! Every fixture is derived from a seed through [`SmallRng`] so a failing
//! case can be replayed with the targeted rstest runners.

use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::test_utils::graph_of;

use super::types::{ForestFixture, Topology};

const MIN_USERS: usize = 2;
const MAX_USERS: usize = 40;
/// Oracle fixtures stay tiny because the oracle enumerates link subsets.
const ORACLE_MAX_USERS: usize = 6;
const ORACLE_MAX_LINKS: usize = 12;

/// Generates fixtures across every [`Topology`].
pub(super) fn forest_fixture_strategy() -> impl Strategy<Value = ForestFixture> {
    (topology_strategy(), any::<u64>()).prop_map(|(topology, seed)| {
        let mut rng = SmallRng::seed_from_u64(seed);
        generate_fixture(topology, &mut rng)
    })
}

/// Generates fixtures small enough for the exhaustive oracle.
pub(super) fn oracle_fixture_strategy() -> impl Strategy<Value = ForestFixture> {
    any::<u64>().prop_map(|seed| {
        let mut rng = SmallRng::seed_from_u64(seed);
        generate_oracle_fixture(&mut rng)
    })
}

fn topology_strategy() -> impl Strategy<Value = Topology> {
    prop_oneof![
        2 => Just(Topology::Random),
        3 => Just(Topology::ManyTies),
        2 => Just(Topology::Sparse),
        1 => Just(Topology::Islands),
    ]
}

/// Generates a fixture for an explicitly chosen topology.
pub(super) fn generate_fixture(topology: Topology, rng: &mut SmallRng) -> ForestFixture {
    let user_count = rng.gen_range(MIN_USERS..=MAX_USERS);
    let users = user_ids(user_count, rng);
    let links = match topology {
        Topology::Random => random_links(&users, rng, 0.3, 1..=1_000),
        Topology::ManyTies => random_links(&users, rng, 0.4, 0..=3),
        Topology::Sparse => sparse_links(&users, rng),
        Topology::Islands => island_links(&users, rng),
    };
    ForestFixture {
        graph: graph_of(&users, &links),
        topology,
    }
}

/// Generates a tiny graph with at most [`ORACLE_MAX_LINKS`] links.
pub(super) fn generate_oracle_fixture(rng: &mut SmallRng) -> ForestFixture {
    let user_count = rng.gen_range(MIN_USERS..=ORACLE_MAX_USERS);
    let users = user_ids(user_count, rng);
    let mut links = random_links(&users, rng, 0.6, 0..=6);
    links.truncate(ORACLE_MAX_LINKS);
    ForestFixture {
        graph: graph_of(&users, &links),
        topology: Topology::Random,
    }
}

/// Distinct, non-contiguous identifiers so nothing relies on dense ids.
fn user_ids(count: usize, rng: &mut SmallRng) -> Vec<u64> {
    let base: u64 = rng.gen_range(0..1_000);
    let step: u64 = rng.gen_range(1..=7);
    (0..count as u64).map(|offset| base + offset * step).collect()
}

fn random_links(
    users: &[u64],
    rng: &mut SmallRng,
    probability: f64,
    costs: std::ops::RangeInclusive<i64>,
) -> Vec<(u64, u64, i64)> {
    let mut links = Vec::new();
    for (position, &left) in users.iter().enumerate() {
        for &right in &users[position + 1..] {
            if rng.gen_bool(probability) {
                links.push((left, right, rng.gen_range(costs.clone())));
            }
        }
    }
    links
}

fn sparse_links(users: &[u64], rng: &mut SmallRng) -> Vec<(u64, u64, i64)> {
    let mut links = Vec::with_capacity(users.len() * 2);
    for position in 1..users.len() {
        let parent = rng.gen_range(0..position);
        links.push((users[parent], users[position], rng.gen_range(1..=50)));
    }
    let extra = users.len() / 2;
    for _ in 0..extra {
        let left = users[rng.gen_range(0..users.len())];
        let right = users[rng.gen_range(0..users.len())];
        links.push((left, right, rng.gen_range(1..=50)));
    }
    links
}

fn island_links(users: &[u64], rng: &mut SmallRng) -> Vec<(u64, u64, i64)> {
    let islands = rng.gen_range(2..=4_usize).min(users.len());
    let mut links = Vec::new();
    for (position, &left) in users.iter().enumerate() {
        for (offset, &right) in users[position + 1..].iter().enumerate() {
            let same_island = position % islands == (position + 1 + offset) % islands;
            if same_island && rng.gen_bool(0.5) {
                links.push((left, right, rng.gen_range(1..=20)));
            }
        }
    }
    links
}
