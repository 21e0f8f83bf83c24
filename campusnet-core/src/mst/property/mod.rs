//! Property-based tests for the spanning forest builder.
//!
//! Checks the builder against an exhaustive oracle on small graphs, verifies
//! structural invariants (acyclicity, component preservation, edge count),
//! and confirms that repeated runs agree across generated topologies.

mod oracle;
mod strategies;
mod structural;
mod types;
