//! Command-line interface for the campusnet planners.
//!
//! Three commands share one data directory: `mst` for the cheapest connected
//! backbone, `coverage` for budgeted category promotion, and `blockage` for
//! reconnection after friendships are blocked.

mod commands;
mod render;

pub use commands::{
    BlockageCommand, BlockedLink, Cli, CliError, Command, CoverageCommand, DataArgs,
    ExecutionSummary, MstCommand, Outcome, RuleArg, run_cli,
};
pub use render::render_summary;

#[cfg(test)]
mod tests;
