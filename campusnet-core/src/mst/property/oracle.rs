//! Exhaustive oracle for minimum spanning forest cost.
//!
//! Enumerates every subset of links, keeps the acyclic ones of maximal size
//! and returns the cheapest total. Only usable on tiny graphs.

use crate::disjoint_set::DisjointSet;
use crate::graph::Graph;

/// Result of the exhaustive search.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) struct OracleForest {
    /// Cheapest total over all maximal acyclic link subsets.
    pub total_cost: u64,
    /// Number of links in a maximal acyclic subset.
    pub edge_count: usize,
}

/// Finds the minimum spanning forest cost by brute force.
pub(super) fn exhaustive_forest(graph: &Graph) -> OracleForest {
    let edges = graph.edges();
    let mut best = OracleForest {
        total_cost: 0,
        edge_count: 0,
    };
    let mut found = false;

    for mask in 0_u32..(1 << edges.len()) {
        let mut sets = DisjointSet::with_members(graph.user_ids());
        let mut total = 0_u64;
        let mut count = 0_usize;
        let mut acyclic = true;
        for (position, edge) in edges.iter().enumerate() {
            if mask & (1 << position) == 0 {
                continue;
            }
            if !matches!(sets.union(edge.from(), edge.to()), Ok(true)) {
                acyclic = false;
                break;
            }
            total += edge.cost();
            count += 1;
        }
        if !acyclic {
            continue;
        }
        let better = !found
            || count > best.edge_count
            || (count == best.edge_count && total < best.total_cost);
        if better {
            best = OracleForest {
                total_cost: total,
                edge_count: count,
            };
            found = true;
        }
    }
    best
}
