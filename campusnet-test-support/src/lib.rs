//! Shared test utilities used across campusnet crates.

pub mod proptest_profile;
pub mod recording;
