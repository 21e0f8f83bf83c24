//! Campusnet core library.
//!
//! Models a university social network as a weighted graph of users and
//! friendship links, and answers three independent questions over it:
//!
//! - which interest categories to enable under a budget to reach the most
//!   users ([`CoveragePlanner`], a greedy approximation);
//! - the cheapest set of links that keeps everybody connected
//!   ([`minimum_spanning_forest`]);
//! - which groups fall apart when links fail, and the cheapest candidate
//!   links that reconnect them ([`analyze_blockage`]).
//!
//! Loaders hand over raw [`UserRecord`], [`EdgeRecord`] and [`CategoryRecord`]
//! values; [`Graph::try_new`] and [`CategorySet::try_new`] validate them once.
//! Every computation is a pure function of its inputs and builds its own
//! [`DisjointSet`].

mod coverage;
mod disjoint_set;
mod error;
mod graph;
mod mst;
mod reconnect;
#[cfg(test)]
mod test_utils;

pub use crate::{
    coverage::{
        Category, CategoryCoverage, CategoryId, CategoryRecord, CategorySet, CoveragePlanner,
        CoverageSelection, CoverageStep, SelectionRule, select_coverage,
    },
    disjoint_set::{Component, DisjointSet},
    error::{
        CampusError, CampusErrorCode, LookupError, LookupErrorCode, RecordKind, RecordRef, Result,
        ValidationError, ValidationErrorCode,
    },
    graph::{Edge, EdgeRecord, Graph, User, UserId, UserRecord},
    mst::{SpanningForest, minimum_spanning_forest},
    reconnect::{BlockageReport, DetectedComponent, analyze_blockage},
};
