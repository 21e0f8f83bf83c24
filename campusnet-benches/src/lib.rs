//! Benchmark support crate for campusnet.
//!
//! Provides a seeded synthetic campus generator and parameter types used by
//! the Criterion benchmarks for spanning forests, coverage selection, and
//! blockage analysis.

pub mod campus;
pub mod error;
pub mod params;
