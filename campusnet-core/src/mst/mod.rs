//! Minimum spanning forest construction (Kruskal).
//!
//! Links are processed in ascending `(cost, from, to)` order. A link is
//! accepted when its endpoints are not yet connected and skipped otherwise,
//! since it would close a cycle. The pass stops early once a single component
//! remains. When the graph itself is disconnected the result is a forest and
//! the component count says so; that is an outcome, not an error.
//!
//! The same cheapest-first join drives the reconnection pass of the blockage
//! analyser.

use std::collections::BTreeMap;

use tracing::{debug, info, instrument};

use crate::{
    Result,
    disjoint_set::DisjointSet,
    error::LookupError,
    graph::{Edge, Graph, UserId},
};

/// The output of a minimum spanning forest computation.
///
/// When the graph is connected the forest is a minimum spanning tree.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SpanningForest {
    edges: Vec<Edge>,
    total_cost: u64,
    component_count: usize,
}

impl SpanningForest {
    /// Returns the accepted links in acceptance order.
    #[must_use]
    #[rustfmt::skip]
    pub fn edges(&self) -> &[Edge] { &self.edges }

    /// Returns the summed cost of the accepted links.
    #[must_use]
    #[rustfmt::skip]
    pub const fn total_cost(&self) -> u64 { self.total_cost }

    /// Returns the number of connected components left after the pass.
    #[must_use]
    #[rustfmt::skip]
    pub const fn component_count(&self) -> usize { self.component_count }

    /// Returns `true` when the forest spans a single component.
    #[must_use]
    pub const fn is_tree(&self) -> bool {
        self.component_count == 1
    }

    /// Returns how much cheaper the forest is than keeping every link of
    /// `graph`.
    #[must_use]
    pub fn savings(&self, graph: &Graph) -> u64 {
        graph.total_cost().saturating_sub(self.total_cost)
    }

    /// Returns each user's forest neighbours as `(neighbour, cost)` pairs,
    /// sorted by neighbour. Users without forest links map to an empty list.
    #[must_use]
    pub fn adjacency(&self, graph: &Graph) -> BTreeMap<UserId, Vec<(UserId, u64)>> {
        let mut adjacency: BTreeMap<UserId, Vec<(UserId, u64)>> =
            graph.user_ids().map(|user| (user, Vec::new())).collect();
        for edge in &self.edges {
            adjacency
                .entry(edge.from())
                .or_default()
                .push((edge.to(), edge.cost()));
            adjacency
                .entry(edge.to())
                .or_default()
                .push((edge.from(), edge.cost()));
        }
        for neighbours in adjacency.values_mut() {
            neighbours.sort_unstable();
        }
        adjacency
    }
}

/// Computes a minimum spanning forest of `graph` with Kruskal's algorithm.
///
/// # Errors
/// Returns [`crate::CampusError::Lookup`] only if the disjoint set is asked
/// about a user the graph does not contain, which validated graphs rule out.
///
/// # Examples
/// ```
/// use campusnet_core::{EdgeRecord, Graph, UserRecord, minimum_spanning_forest};
///
/// let users = ["A", "B", "C", "D"]
///     .iter()
///     .zip(1..)
///     .map(|(name, id)| UserRecord::new(id, *name))
///     .collect();
/// let graph = Graph::try_new(
///     users,
///     &[
///         EdgeRecord::new(1, 2, 1),
///         EdgeRecord::new(2, 3, 2),
///         EdgeRecord::new(1, 3, 3),
///         EdgeRecord::new(3, 4, 4),
///     ],
/// )?;
/// let forest = minimum_spanning_forest(&graph)?;
/// assert_eq!(forest.total_cost(), 7);
/// assert_eq!(forest.edges().len(), 3);
/// assert!(forest.is_tree());
/// # Ok::<(), campusnet_core::CampusError>(())
/// ```
#[instrument(
    name = "core.mst",
    err,
    skip(graph),
    fields(users = graph.user_count(), edges = graph.edge_count()),
)]
pub fn minimum_spanning_forest(graph: &Graph) -> Result<SpanningForest> {
    let mut sets = DisjointSet::with_members(graph.user_ids());
    let joined = join_cheapest(&mut sets, graph.edges())?;

    let forest = SpanningForest {
        edges: joined.edges,
        total_cost: joined.total_cost,
        component_count: sets.component_count(),
    };
    info!(
        accepted = forest.edges.len(),
        total_cost = forest.total_cost,
        components = forest.component_count,
        "spanning forest computed"
    );
    Ok(forest)
}

/// Links accepted by a cheapest-first join.
pub(crate) struct Joined {
    pub(crate) edges: Vec<Edge>,
    pub(crate) total_cost: u64,
}

/// Accepts links from `pool` in `(cost, from, to)` order while they join two
/// distinct sets, stopping once `sets` holds a single component.
pub(crate) fn join_cheapest(
    sets: &mut DisjointSet,
    pool: &[Edge],
) -> core::result::Result<Joined, LookupError> {
    let mut ordered = pool.to_vec();
    ordered.sort_unstable();

    let mut joined = Joined {
        edges: Vec::with_capacity(sets.len().saturating_sub(1)),
        total_cost: 0,
    };
    for edge in ordered {
        if sets.component_count() <= 1 {
            break;
        }
        if sets.union(edge.from(), edge.to())? {
            joined.total_cost = joined.total_cost.saturating_add(edge.cost());
            joined.edges.push(edge);
        } else {
            debug!(%edge, "link skipped, endpoints already connected");
        }
    }
    Ok(joined)
}

#[cfg(test)]
mod property;
