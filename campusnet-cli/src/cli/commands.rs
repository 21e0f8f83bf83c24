//! Command implementations and argument parsing for the campusnet CLI.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use campusnet_core::{
    BlockageReport, CampusError, CoveragePlanner, CoverageSelection, SelectionRule,
    SpanningForest, UserId, analyze_blockage, minimum_spanning_forest,
};
use campusnet_providers_json::{CampusDataset, JsonProviderError};
use clap::{Args, Parser, Subcommand, ValueEnum};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "campusnet",
    about = "Plan outreach and connectivity for a campus social network."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Compute the cheapest set of friendships keeping everyone connected.
    Mst(MstCommand),
    /// Choose interest categories to promote within a budget.
    Coverage(CoverageCommand),
    /// Remove blocked friendships and suggest cheapest reconnections.
    Blockage(BlockageCommand),
}

impl Command {
    const fn label(&self) -> &'static str {
        match self {
            Self::Mst(_) => "mst",
            Self::Coverage(_) => "coverage",
            Self::Blockage(_) => "blockage",
        }
    }

    const fn data(&self) -> &DataArgs {
        match self {
            Self::Mst(command) => &command.data,
            Self::Coverage(command) => &command.data,
            Self::Blockage(command) => &command.data,
        }
    }
}

/// Location of the campus data.
#[derive(Debug, Args, Clone)]
pub struct DataArgs {
    /// Directory holding `users.json`, `friendships.json` and the optional
    /// `categories.json` and `candidates.json`.
    #[arg(long = "data-dir", value_name = "DIR")]
    pub data_dir: PathBuf,
}

/// Options accepted by the `mst` command.
#[derive(Debug, Args, Clone)]
pub struct MstCommand {
    /// Data location.
    #[command(flatten)]
    pub data: DataArgs,
}

/// Options accepted by the `coverage` command.
#[derive(Debug, Args, Clone)]
pub struct CoverageCommand {
    /// Data location.
    #[command(flatten)]
    pub data: DataArgs,

    /// Total promotion budget.
    #[arg(long, value_parser = clap::value_parser!(u64))]
    pub budget: u64,

    /// Greedy ranking rule.
    #[arg(long, value_enum, default_value_t = RuleArg::MarginalReach)]
    pub rule: RuleArg,
}

/// Options accepted by the `blockage` command.
#[derive(Debug, Args, Clone)]
pub struct BlockageCommand {
    /// Data location.
    #[command(flatten)]
    pub data: DataArgs,

    /// Friendship to remove, written `U:V`. Repeat for several links.
    #[arg(long = "block", value_name = "U:V", required = true)]
    pub block: Vec<BlockedLink>,

    /// Candidate pool to reconnect from, replacing `candidates.json`.
    #[arg(long, value_name = "FILE")]
    pub candidates: Option<PathBuf>,
}

/// Greedy ranking rules exposed on the command line.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, ValueEnum)]
pub enum RuleArg {
    /// Most newly reached users first.
    #[default]
    MarginalReach,
    /// Most newly reached users per unit of cost first.
    CostEfficiency,
}

impl From<RuleArg> for SelectionRule {
    fn from(rule: RuleArg) -> Self {
        match rule {
            RuleArg::MarginalReach => Self::MarginalReach,
            RuleArg::CostEfficiency => Self::CostEfficiency,
        }
    }
}

/// A friendship named on the command line as `U:V`.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct BlockedLink {
    /// First endpoint.
    pub left: u64,
    /// Second endpoint.
    pub right: u64,
}

impl BlockedLink {
    /// Returns the endpoints as core identifiers.
    #[must_use]
    pub const fn endpoints(self) -> (UserId, UserId) {
        (UserId::new(self.left), UserId::new(self.right))
    }
}

impl FromStr for BlockedLink {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (left, right) = raw
            .split_once(':')
            .ok_or_else(|| format!("`{raw}` is not of the form U:V"))?;
        let parse = |part: &str| {
            part.trim()
                .parse::<u64>()
                .map_err(|err| format!("`{part}` is not a user id: {err}"))
        };
        Ok(Self {
            left: parse(left)?,
            right: parse(right)?,
        })
    }
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Loading the data directory or a candidate pool failed.
    #[error(transparent)]
    Data(#[from] JsonProviderError),
    /// A planner rejected its input.
    #[error(transparent)]
    Core(#[from] CampusError),
}

impl CliError {
    /// Returns the stable code of the underlying failure.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Data(error) => error.code(),
            Self::Core(error) => match error.validation_code() {
                Some(code) => code.as_str(),
                None => error.code().as_str(),
            },
        }
    }
}

/// What a command computed.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Result of `mst`.
    Mst(SpanningForest),
    /// Result of `coverage`.
    Coverage(CoverageSelection),
    /// Result of `blockage`.
    Blockage(BlockageReport),
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone)]
pub struct ExecutionSummary {
    /// Data the command ran against, kept for rendering names.
    pub dataset: CampusDataset,
    /// Planner output.
    pub outcome: Outcome,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when loading or planning fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use campusnet_cli::cli::{Cli, Command, DataArgs, MstCommand, Outcome, run_cli};
/// # use tempfile::TempDir;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let dir = TempDir::new()?;
/// std::fs::write(dir.path().join("users.json"), r#"[{"id": 1}, {"id": 2}]"#)?;
/// std::fs::write(
///     dir.path().join("friendships.json"),
///     r#"[{"from_id": 1, "to_id": 2, "cost": 3}]"#,
/// )?;
/// let cli = Cli {
///     command: Command::Mst(MstCommand {
///         data: DataArgs { data_dir: dir.path().to_path_buf() },
///     }),
/// };
/// let summary = run_cli(cli)?;
/// let Outcome::Mst(forest) = summary.outcome else { unreachable!() };
/// assert_eq!(forest.total_cost(), 3);
/// # Ok(())
/// # }
/// ```
#[instrument(
    name = "cli.run",
    err,
    skip(cli),
    fields(command = field::Empty, data_dir = field::Empty),
)]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    let span = Span::current();
    span.record("command", field::display(cli.command.label()));
    span.record("data_dir", field::display(cli.command.data().data_dir.display()));

    let dataset = load_dataset(&cli.command.data().data_dir)?;
    let outcome = match cli.command {
        Command::Mst(_) => run_mst(&dataset)?,
        Command::Coverage(command) => run_coverage(&dataset, &command),
        Command::Blockage(command) => run_blockage(&dataset, &command)?,
    };
    info!("command completed");
    Ok(ExecutionSummary { dataset, outcome })
}

pub(super) fn load_dataset(dir: &Path) -> Result<CampusDataset, CliError> {
    Ok(CampusDataset::try_from_dir(dir)?)
}

#[instrument(name = "cli.mst", err, skip(dataset))]
pub(super) fn run_mst(dataset: &CampusDataset) -> Result<Outcome, CliError> {
    let forest = minimum_spanning_forest(dataset.graph())?;
    info!(
        links = forest.edges().len(),
        cost = forest.total_cost(),
        connected = forest.is_tree(),
        "mst completed"
    );
    Ok(Outcome::Mst(forest))
}

#[instrument(
    name = "cli.coverage",
    skip(dataset, command),
    fields(budget = command.budget, rule = field::Empty),
)]
pub(super) fn run_coverage(dataset: &CampusDataset, command: &CoverageCommand) -> Outcome {
    let rule = SelectionRule::from(command.rule);
    Span::current().record("rule", field::display(rule));
    let selection = CoveragePlanner::new(command.budget)
        .with_rule(rule)
        .plan(dataset.categories());
    info!(
        selected = selection.steps().len(),
        reach = selection.reach(),
        spent = selection.total_cost(),
        "coverage completed"
    );
    Outcome::Coverage(selection)
}

#[instrument(
    name = "cli.blockage",
    err,
    skip(dataset, command),
    fields(blocked = command.block.len(), candidates = field::Empty),
)]
pub(super) fn run_blockage(
    dataset: &CampusDataset,
    command: &BlockageCommand,
) -> Result<Outcome, CliError> {
    let extra;
    let candidates = match &command.candidates {
        Some(path) => {
            extra = dataset.read_candidates(path)?;
            extra.as_slice()
        }
        None => dataset.candidates(),
    };
    Span::current().record("candidates", candidates.len());

    let removals: Vec<(UserId, UserId)> = command
        .block
        .iter()
        .map(|link| link.endpoints())
        .collect();
    let report = analyze_blockage(dataset.graph(), &removals, candidates)?;
    info!(
        components = report.component_count(),
        restored = report.restored(),
        "blockage completed"
    );
    Ok(Outcome::Blockage(report))
}
