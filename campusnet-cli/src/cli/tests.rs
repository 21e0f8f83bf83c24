//! Unit tests for argument parsing, command execution, and rendering.

use std::fs;
use std::path::{Path, PathBuf};

use campusnet_core::{CampusError, ValidationError};
use campusnet_providers_json::JsonProviderError;
use campusnet_test_support::recording::capture;
use clap::Parser;
use rstest::{fixture, rstest};
use tempfile::TempDir;

use super::{
    BlockageCommand, BlockedLink, Cli, CliError, Command, CoverageCommand, DataArgs,
    ExecutionSummary, MstCommand, Outcome, RuleArg, render_summary, run_cli,
};

type TestResult = Result<(), Box<dyn std::error::Error>>;

const USERS: &str = r#"[
    {"id": 1, "name": "Ana"},
    {"id": 2, "name": "Bruno"},
    {"id": 3, "name": "Carla"},
    {"id": 4, "name": "Dario"}
]"#;

const FRIENDSHIPS: &str = r#"[
    {"from_id": 1, "to_id": 2, "cost": 1},
    {"from_id": 2, "to_id": 3, "cost": 2},
    {"from_id": 1, "to_id": 3, "cost": 3},
    {"from_id": 3, "to_id": 4, "cost": 4},
    {"from_id": 2, "to_id": 4, "cost": 5}
]"#;

const CATEGORIES: &str = r#"[
    {"id": 10, "name": "sports", "cost": 3, "reached_user_ids": [1, 3]},
    {"id": 11, "name": "music", "cost": 2, "reached_user_ids": [2, 3]},
    {"id": 12, "name": "chess", "cost": 4, "reached_user_ids": [4]}
]"#;

const CANDIDATES: &str = r#"[
    {"from_id": 4, "to_id": 1, "cost": 6},
    {"from_id": 2, "to_id": 4, "cost": 2}
]"#;

#[fixture]
fn campus() -> TempDir {
    let dir = TempDir::new().expect("create temp dir");
    for (name, contents) in [
        ("users.json", USERS),
        ("friendships.json", FRIENDSHIPS),
        ("categories.json", CATEGORIES),
        ("candidates.json", CANDIDATES),
    ] {
        write_file(dir.path(), name, contents);
    }
    dir
}

fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write fixture file");
    path
}

fn data(dir: &TempDir) -> DataArgs {
    DataArgs {
        data_dir: dir.path().to_path_buf(),
    }
}

fn blockage(dir: &TempDir, block: &[(u64, u64)], candidates: Option<PathBuf>) -> Cli {
    Cli {
        command: Command::Blockage(BlockageCommand {
            data: data(dir),
            block: block
                .iter()
                .map(|&(left, right)| BlockedLink { left, right })
                .collect(),
            candidates,
        }),
    }
}

fn render(summary: &ExecutionSummary) -> String {
    let mut buffer = Vec::new();
    render_summary(summary, &mut buffer).expect("render to memory");
    String::from_utf8(buffer).expect("utf-8 output")
}

#[rstest]
fn mst_keeps_cheapest_backbone(campus: TempDir) -> TestResult {
    let cli = Cli {
        command: Command::Mst(MstCommand { data: data(&campus) }),
    };
    let summary = run_cli(cli)?;
    let Outcome::Mst(forest) = &summary.outcome else {
        panic!("expected mst outcome, got {:?}", summary.outcome);
    };
    assert_eq!(forest.total_cost(), 7);
    assert!(forest.is_tree());
    assert_eq!(
        render(&summary),
        "users: 4\n\
         links kept: 3 of 5\n\
         total cost: 7 (saves 8)\n\
         components: 1\n  \
         1 Ana -- 2 Bruno (1)\n  \
         2 Bruno -- 3 Carla (2)\n  \
         3 Carla -- 4 Dario (4)\n"
    );
    Ok(())
}

#[rstest]
#[case::marginal_reach(RuleArg::MarginalReach)]
#[case::cost_efficiency(RuleArg::CostEfficiency)]
fn coverage_selects_within_budget(campus: TempDir, #[case] rule: RuleArg) -> TestResult {
    let cli = Cli {
        command: Command::Coverage(CoverageCommand {
            data: data(&campus),
            budget: 5,
            rule,
        }),
    };
    let summary = run_cli(cli)?;
    let Outcome::Coverage(selection) = &summary.outcome else {
        panic!("expected coverage outcome, got {:?}", summary.outcome);
    };
    let selected: Vec<u64> = selection.selected().map(|id| id.get()).collect();
    assert_eq!(selected, [11, 10]);
    assert_eq!(selection.reach(), 3);
    assert_eq!(selection.total_cost(), 5);
    let text = render(&summary);
    assert!(text.starts_with("budget: 5 (spent 5, remaining 0)\nreached users: 3 of 4\n"));
    assert!(text.contains("music (#11)\tcost 2\t+2 users\t(total 2)"));
    assert!(text.ends_with(
        "coverage by category:\n  \
         sports (#10): 2/2 (selected)\n  \
         music (#11): 2/2 (selected)\n  \
         chess (#12): 0/1\n"
    ));
    Ok(())
}

#[rstest]
fn coverage_with_zero_budget_selects_nothing(campus: TempDir) -> TestResult {
    let cli = Cli {
        command: Command::Coverage(CoverageCommand {
            data: data(&campus),
            budget: 0,
            rule: RuleArg::default(),
        }),
    };
    let summary = run_cli(cli)?;
    assert!(render(&summary).ends_with("no category selected\n"));
    Ok(())
}

#[rstest]
fn blockage_of_redundant_link_keeps_network_connected(campus: TempDir) -> TestResult {
    let summary = run_cli(blockage(&campus, &[(3, 2)], None))?;
    let Outcome::Blockage(report) = &summary.outcome else {
        panic!("expected blockage outcome, got {:?}", summary.outcome);
    };
    assert_eq!(report.removed().len(), 1);
    assert!(!report.is_disconnected());
    assert!(render(&summary).ends_with("network remains connected\n"));
    Ok(())
}

#[rstest]
fn blockage_reconnects_from_data_directory_pool(campus: TempDir) -> TestResult {
    let summary = run_cli(blockage(&campus, &[(3, 4), (2, 4)], None))?;
    let Outcome::Blockage(report) = &summary.outcome else {
        panic!("expected blockage outcome, got {:?}", summary.outcome);
    };
    assert_eq!(report.component_count(), 2);
    assert!(report.restored());
    assert_eq!(report.reconnection_cost(), 2);
    let text = render(&summary);
    assert!(text.contains("reconnection cost: 2 (1 links)\n  2 Bruno -- 4 Dario (2)\n"));
    assert!(text.ends_with("connectivity restored\n"));
    Ok(())
}

#[rstest]
fn blockage_prefers_explicit_candidate_file(campus: TempDir) -> TestResult {
    let pool = write_file(campus.path(), "pool.json", r#"[{"u": 1, "v": 4, "costo": 9}]"#);
    let summary = run_cli(blockage(&campus, &[(3, 4), (2, 4)], Some(pool)))?;
    let Outcome::Blockage(report) = &summary.outcome else {
        panic!("expected blockage outcome, got {:?}", summary.outcome);
    };
    assert!(report.restored());
    assert_eq!(report.reconnection_cost(), 9);
    Ok(())
}

#[rstest]
fn blockage_reports_insufficient_pool(campus: TempDir) -> TestResult {
    let pool = write_file(campus.path(), "empty.json", "[]");
    let summary = run_cli(blockage(&campus, &[(3, 4), (2, 4), (1, 4)], Some(pool)))?;
    let Outcome::Blockage(report) = &summary.outcome else {
        panic!("expected blockage outcome, got {:?}", summary.outcome);
    };
    assert!(!report.restored());
    assert_eq!(report.unmatched_removals().len(), 1);
    let text = render(&summary);
    assert!(text.contains("  no link between 1 and 4\n"));
    assert!(text.contains("connectivity not restored: 2 components remain\n"));
    assert!(text.contains("  suggest 1 Ana -- 4 Dario\n"));
    Ok(())
}

#[rstest]
fn mst_runs_when_a_category_has_no_interested_user() -> TestResult {
    let dir = TempDir::new()?;
    write_file(
        dir.path(),
        "usuarios.json",
        r#"[{"id": 1, "intereses": ["Deportes"]}, {"id": 2, "intereses": ["Deportes"]}]"#,
    );
    write_file(dir.path(), "amistades.json", r#"[{"u": 1, "v": 2, "costo": 4}]"#);
    write_file(
        dir.path(),
        "categorias.json",
        r#"[{"id": 0, "nombre": "Deportes", "costo": 100}, {"id": 1, "nombre": "Cine", "costo": 50}]"#,
    );
    let cli = Cli {
        command: Command::Mst(MstCommand { data: data(&dir) }),
    };
    let summary = run_cli(cli)?;
    assert_eq!(summary.dataset.categories().len(), 1);
    let Outcome::Mst(forest) = &summary.outcome else {
        panic!("expected mst outcome, got {:?}", summary.outcome);
    };
    assert_eq!(forest.total_cost(), 4);
    Ok(())
}

#[rstest]
fn missing_data_directory_is_reported(campus: TempDir) {
    let cli = Cli {
        command: Command::Mst(MstCommand {
            data: DataArgs {
                data_dir: campus.path().join("absent"),
            },
        }),
    };
    let err = run_cli(cli).expect_err("directory does not exist");
    assert!(matches!(
        err,
        CliError::Data(JsonProviderError::MissingDocument { .. })
    ));
    assert_eq!(err.code(), "JSON_MISSING_DOCUMENT");
}

#[rstest]
fn candidate_file_with_unknown_user_is_rejected(campus: TempDir) {
    let pool = write_file(campus.path(), "pool.json", r#"[{"u": 1, "v": 42, "costo": 1}]"#);
    let err = run_cli(blockage(&campus, &[(3, 4)], Some(pool))).expect_err("unknown user");
    assert!(matches!(
        err,
        CliError::Data(JsonProviderError::Validation(
            ValidationError::UnknownUser { .. }
        ))
    ));
    assert_eq!(err.code(), "VALIDATION_UNKNOWN_USER");
}

#[rstest]
#[case::validation(
    CliError::Core(CampusError::Validation(ValidationError::EmptyUserSet)),
    "VALIDATION_EMPTY_USER_SET"
)]
#[case::data(
    CliError::Data(JsonProviderError::Validation(ValidationError::EmptyUserSet)),
    "VALIDATION_EMPTY_USER_SET"
)]
fn error_codes_surface_the_root_cause(#[case] err: CliError, #[case] expected: &str) {
    assert_eq!(err.code(), expected);
}

#[rstest]
#[case::coverage(
    &["campusnet", "coverage", "--data-dir", "d", "--budget", "5", "--rule", "cost-efficiency"],
    "coverage"
)]
#[case::coverage_default_rule(&["campusnet", "coverage", "--data-dir", "d", "--budget", "0"], "coverage")]
#[case::mst(&["campusnet", "mst", "--data-dir", "d"], "mst")]
#[case::blockage(
    &["campusnet", "blockage", "--data-dir", "d", "--block", "1:2", "--block", "3:4"],
    "blockage"
)]
fn clap_accepts_documented_invocations(#[case] args: &[&str], #[case] expected: &str) {
    let cli = Cli::try_parse_from(args).expect("arguments must parse");
    let label = match &cli.command {
        Command::Mst(_) => "mst",
        Command::Coverage(command) => {
            assert!(command.budget <= 5);
            "coverage"
        }
        Command::Blockage(command) => {
            assert_eq!(
                command.block,
                [
                    BlockedLink { left: 1, right: 2 },
                    BlockedLink { left: 3, right: 4 }
                ]
            );
            "blockage"
        }
    };
    assert_eq!(label, expected);
}

#[rstest]
#[case::missing_budget(&["campusnet", "coverage", "--data-dir", "d"])]
#[case::unknown_rule(&["campusnet", "coverage", "--data-dir", "d", "--budget", "1", "--rule", "random"])]
#[case::negative_budget(&["campusnet", "coverage", "--data-dir", "d", "--budget", "-1"])]
#[case::missing_block(&["campusnet", "blockage", "--data-dir", "d"])]
#[case::malformed_block(&["campusnet", "blockage", "--data-dir", "d", "--block", "1-2"])]
#[case::missing_data_dir(&["campusnet", "mst"])]
fn clap_rejects_invalid_invocations(#[case] args: &[&str]) {
    assert!(Cli::try_parse_from(args).is_err());
}

#[rstest]
#[case("1:2", Ok(BlockedLink { left: 1, right: 2 }))]
#[case(" 7 : 9 ", Ok(BlockedLink { left: 7, right: 9 }))]
#[case("1", Err("`1` is not of the form U:V"))]
#[case("a:2", Err("`a` is not a user id: invalid digit found in string"))]
fn blocked_links_parse_from_pairs(
    #[case] raw: &str,
    #[case] expected: Result<BlockedLink, &str>,
) {
    let parsed: Result<BlockedLink, String> = raw.parse();
    assert_eq!(parsed.as_ref().map_err(String::as_str), expected.as_ref().map_err(|err| *err));
}

#[rstest]
fn run_cli_records_command_fields(campus: TempDir) {
    let cli = Cli {
        command: Command::Coverage(CoverageCommand {
            data: data(&campus),
            budget: 5,
            rule: RuleArg::CostEfficiency,
        }),
    };
    let (result, layer) = capture(|| run_cli(cli));
    result.expect("coverage succeeds");

    let run = layer.span("cli.run").expect("cli.run span recorded");
    assert_eq!(run.field("command"), Some("coverage"));
    let coverage = layer.span("cli.coverage").expect("cli.coverage span recorded");
    assert_eq!(coverage.field("budget"), Some("5"));
    assert_eq!(coverage.field("rule"), Some("cost-efficiency"));
    assert!(layer.span("providers.json.load").is_some());
    assert_eq!(layer.events_with_message("command completed").len(), 1);
}
