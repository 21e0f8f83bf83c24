//! Structural invariants of a computed spanning forest.
//!
//! - Every accepted link exists in the graph with the same cost.
//! - No accepted link closes a cycle.
//! - Exactly `users - components` links are accepted.
//! - The forest has the same components as the graph.
//! - Acceptance order is non-decreasing in `(cost, from, to)`.

use proptest::test_runner::{TestCaseError, TestCaseResult};

use crate::disjoint_set::DisjointSet;
use crate::graph::Edge;
use crate::minimum_spanning_forest;
use crate::test_utils::bfs_components;

use super::types::ForestFixture;

/// Runs the structural invariant property for `fixture`.
pub(super) fn run_structural_invariants_property(fixture: &ForestFixture) -> TestCaseResult {
    let graph = &fixture.graph;
    let forest = minimum_spanning_forest(graph).map_err(|err| {
        TestCaseError::fail(format!(
            "forest failed: {err} (topology={:?}, users={}, edges={})",
            fixture.topology,
            graph.user_count(),
            graph.edge_count(),
        ))
    })?;

    let mut sets = DisjointSet::with_members(graph.user_ids());
    for (position, edge) in forest.edges().iter().enumerate() {
        if graph.find_edge(edge.from(), edge.to()) != Some(edge) {
            return Err(TestCaseError::fail(format!(
                "edge {position} ({edge}) is not a graph link"
            )));
        }
        let joined = sets
            .union(edge.from(), edge.to())
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        if !joined {
            return Err(TestCaseError::fail(format!(
                "edge {position} ({edge}) closes a cycle"
            )));
        }
    }

    if !forest.edges().is_sorted() {
        return Err(TestCaseError::fail("acceptance order is not sorted"));
    }

    let expected = bfs_components(graph.user_ids(), graph.edges().iter().map(Edge::endpoints));
    if forest.component_count() != expected.len() {
        return Err(TestCaseError::fail(format!(
            "component count mismatch: forest={}, graph={} (topology={:?})",
            forest.component_count(),
            expected.len(),
            fixture.topology,
        )));
    }
    if forest.edges().len() != graph.user_count() - expected.len() {
        return Err(TestCaseError::fail(format!(
            "edge count mismatch: forest={}, expected={}",
            forest.edges().len(),
            graph.user_count() - expected.len(),
        )));
    }

    let spanned = bfs_components(graph.user_ids(), forest.edges().iter().map(Edge::endpoints));
    if spanned != expected {
        return Err(TestCaseError::fail("forest components differ from graph components"));
    }

    let summed: u64 = forest.edges().iter().map(Edge::cost).sum();
    if summed != forest.total_cost() {
        return Err(TestCaseError::fail(format!(
            "total cost {} does not match summed links {summed}",
            forest.total_cost()
        )));
    }
    Ok(())
}
