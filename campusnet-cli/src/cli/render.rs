//! Plain-text rendering of command outcomes.

use std::io::{self, Write};

use campusnet_core::{BlockageReport, CoverageSelection, Edge, Graph, SpanningForest, UserId};
use campusnet_providers_json::CampusDataset;

use super::commands::{ExecutionSummary, Outcome};

/// Renders `summary` to `writer` in a human-readable text format.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use campusnet_cli::cli::{ExecutionSummary, Outcome, render_summary};
/// # use campusnet_core::minimum_spanning_forest;
/// # use campusnet_providers_json::{CampusDataset, DataDocuments};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let dataset = CampusDataset::try_from_documents(DataDocuments {
///     users: r#"[{"id": 1, "name": "Ana"}, {"id": 2, "name": "Bo"}]"#,
///     friendships: r#"[{"from_id": 1, "to_id": 2, "cost": 3}]"#,
///     ..DataDocuments::default()
/// })?;
/// let forest = minimum_spanning_forest(dataset.graph())?;
/// let summary = ExecutionSummary { dataset, outcome: Outcome::Mst(forest) };
/// let mut buffer = Vec::new();
/// render_summary(&summary, &mut buffer)?;
/// assert!(String::from_utf8(buffer)?.contains("1 Ana -- 2 Bo (3)"));
/// # Ok(())
/// # }
/// ```
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    match &summary.outcome {
        Outcome::Mst(forest) => render_forest(&summary.dataset, forest, &mut writer),
        Outcome::Coverage(selection) => render_coverage(&summary.dataset, selection, &mut writer),
        Outcome::Blockage(report) => render_blockage(&summary.dataset, report, &mut writer),
    }
}

fn render_forest(
    dataset: &CampusDataset,
    forest: &SpanningForest,
    writer: &mut impl Write,
) -> io::Result<()> {
    let graph = dataset.graph();
    writeln!(writer, "users: {}", graph.user_count())?;
    writeln!(
        writer,
        "links kept: {} of {}",
        forest.edges().len(),
        graph.edge_count()
    )?;
    writeln!(
        writer,
        "total cost: {} (saves {})",
        forest.total_cost(),
        forest.savings(graph)
    )?;
    writeln!(writer, "components: {}", forest.component_count())?;
    for edge in forest.edges() {
        write_edge(graph, edge, writer)?;
    }
    Ok(())
}

fn render_coverage(
    dataset: &CampusDataset,
    selection: &CoverageSelection,
    writer: &mut impl Write,
) -> io::Result<()> {
    writeln!(
        writer,
        "budget: {} (spent {}, remaining {})",
        selection.budget(),
        selection.total_cost(),
        selection.remaining_budget()
    )?;
    writeln!(
        writer,
        "reached users: {} of {}",
        selection.reach(),
        dataset.graph().user_count()
    )?;
    if selection.steps().is_empty() {
        writeln!(writer, "no category selected")?;
        return Ok(());
    }
    writeln!(writer, "selected:")?;
    for step in selection.steps() {
        let label = dataset
            .categories()
            .get(step.category())
            .map_or_else(|| format!("category #{}", step.category()), ToString::to_string);
        writeln!(
            writer,
            "  {label}\tcost {}\t+{} users\t(total {})",
            step.cost(),
            step.marginal_reach(),
            step.cumulative_reach()
        )?;
    }
    writeln!(writer, "coverage by category:")?;
    for category in dataset.categories().iter() {
        let coverage = selection.coverage_of(category);
        writeln!(
            writer,
            "  {category}: {}/{}{}",
            coverage.reached(),
            coverage.size(),
            if selection.is_selected(category.id()) { " (selected)" } else { "" }
        )?;
    }
    Ok(())
}

fn render_blockage(
    dataset: &CampusDataset,
    report: &BlockageReport,
    writer: &mut impl Write,
) -> io::Result<()> {
    let graph = dataset.graph();
    writeln!(writer, "removed links: {}", report.removed().len())?;
    for edge in report.removed() {
        write_edge(graph, edge, writer)?;
    }
    for (left, right) in report.unmatched_removals() {
        writeln!(writer, "  no link between {left} and {right}")?;
    }

    writeln!(writer, "components: {}", report.component_count())?;
    for component in report.components() {
        writeln!(
            writer,
            "  anchor {}: {} users",
            user_label(graph, component.anchor()),
            component.size()
        )?;
    }
    if !report.is_disconnected() {
        writeln!(writer, "network remains connected")?;
        return Ok(());
    }

    writeln!(
        writer,
        "reconnection cost: {} ({} links)",
        report.reconnection_cost(),
        report.reconnection().len()
    )?;
    for edge in report.reconnection() {
        write_edge(graph, edge, writer)?;
    }
    if report.restored() {
        writeln!(writer, "connectivity restored")?;
    } else {
        writeln!(
            writer,
            "connectivity not restored: {} components remain",
            report.final_component_count()
        )?;
        for (left, right) in report.chain_suggestions() {
            writeln!(
                writer,
                "  suggest {} -- {}",
                user_label(graph, left),
                user_label(graph, right)
            )?;
        }
    }
    Ok(())
}

fn write_edge(graph: &Graph, edge: &Edge, writer: &mut impl Write) -> io::Result<()> {
    writeln!(
        writer,
        "  {} -- {} ({})",
        user_label(graph, edge.from()),
        user_label(graph, edge.to()),
        edge.cost()
    )
}

fn user_label(graph: &Graph, id: UserId) -> String {
    graph
        .user(id)
        .map_or_else(|| id.to_string(), |user| format!("{id} {}", user.name()))
}
