//! Fixture types shared by the spanning forest property tests.

use crate::graph::Graph;

/// Shape of a generated campus graph.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum Topology {
    /// Each pair is linked with a fixed probability and distinct-ish costs.
    Random,
    /// Costs drawn from a tiny range so most links tie.
    ManyTies,
    /// A random tree plus a few extra links.
    Sparse,
    /// Several islands with no links between them.
    Islands,
}

/// Generated graph plus the context needed to diagnose a failure.
#[derive(Clone, Debug)]
pub(super) struct ForestFixture {
    /// The validated graph under test.
    pub graph: Graph,
    /// How the graph was generated.
    pub topology: Topology,
}
