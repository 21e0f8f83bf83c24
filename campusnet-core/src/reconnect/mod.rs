//! Blockage detection and cheapest reconnection.
//!
//! Some links of the campus graph stop working. The analyser drops them,
//! groups users into the components the surviving links still connect, and,
//! when the campus fell apart, joins the components again with the cheapest
//! links from a candidate pool.

use std::collections::BTreeSet;

use tracing::{debug, info, instrument};

use crate::{
    Result,
    disjoint_set::{Component, DisjointSet},
    graph::{Edge, Graph, UserId, canonical_pair},
    mst::join_cheapest,
};

/// A component left after the blocked links were removed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DetectedComponent {
    component: Component,
    anchor: UserId,
}

impl DetectedComponent {
    /// Returns the underlying component.
    #[must_use]
    #[rustfmt::skip]
    pub const fn component(&self) -> &Component { &self.component }

    /// Returns the members in ascending identifier order.
    #[must_use]
    #[rustfmt::skip]
    pub const fn members(&self) -> &BTreeSet<UserId> { self.component.members() }

    /// Returns the user proposed as this component's contact point: the
    /// lower endpoint of its cheapest surviving link, or its smallest member
    /// when no link survives inside it.
    #[must_use]
    #[rustfmt::skip]
    pub const fn anchor(&self) -> UserId { self.anchor }

    /// Returns the number of members.
    #[must_use]
    pub fn size(&self) -> usize {
        self.component.size()
    }
}

/// Outcome of a blockage analysis.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BlockageReport {
    removed: Vec<Edge>,
    unmatched_removals: Vec<(UserId, UserId)>,
    components: Vec<DetectedComponent>,
    reconnection: Vec<Edge>,
    reconnection_cost: u64,
    final_component_count: usize,
}

impl BlockageReport {
    /// Returns the graph links that were removed, in request order.
    #[must_use]
    #[rustfmt::skip]
    pub fn removed(&self) -> &[Edge] { &self.removed }

    /// Returns requested removals that matched no graph link, as canonical
    /// `(min, max)` pairs.
    #[must_use]
    #[rustfmt::skip]
    pub fn unmatched_removals(&self) -> &[(UserId, UserId)] { &self.unmatched_removals }

    /// Returns the components after removal, ordered by smallest member.
    #[must_use]
    #[rustfmt::skip]
    pub fn components(&self) -> &[DetectedComponent] { &self.components }

    /// Returns the number of components after removal.
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Returns `true` when removal split the campus.
    #[must_use]
    pub fn is_disconnected(&self) -> bool {
        self.components.len() > 1
    }

    /// Returns the accepted candidate links in acceptance order.
    #[must_use]
    #[rustfmt::skip]
    pub fn reconnection(&self) -> &[Edge] { &self.reconnection }

    /// Returns the summed cost of the accepted candidate links.
    #[must_use]
    #[rustfmt::skip]
    pub const fn reconnection_cost(&self) -> u64 { self.reconnection_cost }

    /// Returns the number of components once the accepted links are added.
    #[must_use]
    #[rustfmt::skip]
    pub const fn final_component_count(&self) -> usize { self.final_component_count }

    /// Returns `true` when the campus is connected after reconnection.
    #[must_use]
    pub const fn restored(&self) -> bool {
        self.final_component_count <= 1
    }

    /// Proposes `k - 1` links chaining the anchors of consecutive
    /// components. Empty when the campus is still connected.
    #[must_use]
    pub fn chain_suggestions(&self) -> Vec<(UserId, UserId)> {
        self.components
            .windows(2)
            .filter_map(|pair| match pair {
                [left, right] => Some((left.anchor, right.anchor)),
                _ => None,
            })
            .collect()
    }
}

/// Removes the `removals` pairs from `graph`, detects the resulting
/// components, and reconnects them with the cheapest links of `candidates`.
///
/// Removals are unordered pairs. A pair that matches no link is reported in
/// [`BlockageReport::unmatched_removals`] and otherwise ignored. Candidates
/// are accepted in `(cost, from, to)` order only when they join two distinct
/// components, until one component remains or the pool runs out. An
/// insufficient pool is reported through [`BlockageReport::restored`].
///
/// # Errors
/// Returns [`crate::CampusError::Lookup`] when a candidate that is still
/// needed references a user outside `graph`. Validate candidate records with
/// [`Graph::validate_links`] to get a record-level error instead.
///
/// # Examples
/// ```
/// use campusnet_core::{Edge, EdgeRecord, Graph, UserId, UserRecord, analyze_blockage};
///
/// let users = (1..=4).map(|id| UserRecord::new(id, format!("user-{id}"))).collect();
/// let graph = Graph::try_new(
///     users,
///     &[EdgeRecord::new(1, 2, 1), EdgeRecord::new(2, 3, 2), EdgeRecord::new(3, 4, 4)],
/// )?;
/// let report = analyze_blockage(
///     &graph,
///     &[(UserId::new(2), UserId::new(3))],
///     &[Edge::new(UserId::new(2), UserId::new(4), 2)],
/// )?;
/// assert_eq!(report.component_count(), 2);
/// assert_eq!(report.reconnection_cost(), 2);
/// assert!(report.restored());
/// # Ok::<(), campusnet_core::CampusError>(())
/// ```
#[instrument(
    name = "core.blockage",
    err,
    skip_all,
    fields(
        users = graph.user_count(),
        removals = removals.len(),
        candidates = candidates.len(),
    ),
)]
pub fn analyze_blockage(
    graph: &Graph,
    removals: &[(UserId, UserId)],
    candidates: &[Edge],
) -> Result<BlockageReport> {
    let (removed, unmatched_removals) = match_removals(graph, removals);
    let blocked: BTreeSet<(UserId, UserId)> = removed.iter().map(Edge::endpoints).collect();
    let surviving: Vec<Edge> = graph
        .edges()
        .iter()
        .filter(|edge| !blocked.contains(&edge.endpoints()))
        .copied()
        .collect();

    let mut sets = DisjointSet::with_members(graph.user_ids());
    for edge in &surviving {
        sets.union(edge.from(), edge.to())?;
    }
    let components = anchor_components(sets.components(), &surviving);
    debug!(
        removed = removed.len(),
        unmatched = unmatched_removals.len(),
        components = components.len(),
        "blocked links removed"
    );

    let (reconnection, reconnection_cost) = if components.len() > 1 {
        let joined = join_cheapest(&mut sets, candidates)?;
        (joined.edges, joined.total_cost)
    } else {
        (Vec::new(), 0)
    };

    let report = BlockageReport {
        removed,
        unmatched_removals,
        components,
        reconnection,
        reconnection_cost,
        final_component_count: sets.component_count(),
    };
    info!(
        components = report.component_count(),
        accepted = report.reconnection.len(),
        cost = report.reconnection_cost,
        restored = report.restored(),
        "blockage analysed"
    );
    Ok(report)
}

fn match_removals(
    graph: &Graph,
    removals: &[(UserId, UserId)],
) -> (Vec<Edge>, Vec<(UserId, UserId)>) {
    let mut removed: Vec<Edge> = Vec::new();
    let mut unmatched = Vec::new();
    for &(left, right) in removals {
        match graph.find_edge(left, right) {
            Some(edge) if !removed.contains(edge) => removed.push(*edge),
            Some(_) => {}
            None => {
                debug!(%left, %right, "removal matches no link");
                unmatched.push(canonical_pair(left, right));
            }
        }
    }
    (removed, unmatched)
}

/// Attaches an anchor to every component. `surviving` is sorted by
/// `(cost, from, to)`, so the first link inside a component is its cheapest.
fn anchor_components(components: Vec<Component>, surviving: &[Edge]) -> Vec<DetectedComponent> {
    components
        .into_iter()
        .map(|component| {
            let anchor = surviving
                .iter()
                .find(|edge| component.contains(edge.from()))
                .map_or_else(|| component.smallest(), |edge| edge.from());
            DetectedComponent { component, anchor }
        })
        .collect()
}
