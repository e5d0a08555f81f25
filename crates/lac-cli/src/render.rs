//! Terminal rendering of rule lists and reports.

use std::io::{self, Write};

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use lac_model::SkipReason;
use lac_report::{CodeStatus, CodeSummary, Report};
use lac_validate::Registry;

/// Issue rows shown before the listing is truncated.
pub const DEFAULT_ISSUE_LIMIT: usize = 50;

/// One-line outcome of a run.
pub fn summary_line(report: &Report) -> String {
    let summary = report.summary;
    let mut line = format!(
        "{}: {} succeeded, {} skipped, {} failed; {} flagged rows across {} entities",
        report.version,
        summary.succeeded,
        summary.skipped,
        summary.failed,
        report.issues.len(),
        report.entities.len(),
    );
    if let Some(reason) = report.cancelled {
        line.push_str(&format!(" (stopped early: {reason})"));
    }
    line
}

/// Codes of a rule set with their messages and affected fields.
pub fn rule_list_table(registry: &Registry) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Code"),
        header_cell("Message"),
        header_cell("Fields"),
    ]);
    apply_list_table_style(&mut table);
    for entry in registry.iter() {
        let definition = entry.definition();
        table.add_row(vec![
            Cell::new(&definition.code).add_attribute(Attribute::Bold),
            Cell::new(&definition.message),
            dim_cell(definition.affected_fields.join(", ")),
        ]);
    }
    table
}

/// Per-code triage table. Codes left out of the selection are hidden.
pub fn code_table(report: &Report) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Code"),
        header_cell("Status"),
        header_cell("Rows"),
        header_cell("Entities"),
        header_cell("Message"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);

    for summary in report.codes.iter().filter(|s| is_requested(s)) {
        let evaluated = summary.status == CodeStatus::Evaluated;
        table.add_row(vec![
            Cell::new(&summary.code).add_attribute(Attribute::Bold),
            status_cell(&summary.status),
            count_cell(evaluated.then_some(summary.flagged_rows), Color::Red),
            count_cell(evaluated.then_some(summary.distinct_entities), Color::Yellow),
            Cell::new(&summary.message),
        ]);
    }
    table
}

/// Flagged rows, at most `limit` of them.
pub fn issue_table(report: &Report, limit: usize) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Code"),
        header_cell("Table"),
        header_cell("Row"),
        header_cell(&report.entity_key),
        header_cell("Fields"),
    ]);
    apply_issue_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);

    for issue in report.issues.iter().take(limit) {
        table.add_row(vec![
            Cell::new(&issue.code).fg(Color::Red),
            Cell::new(&issue.table),
            Cell::new(issue.row),
            issue
                .entity
                .as_deref()
                .map_or_else(|| dim_cell("-"), Cell::new),
            dim_cell(issue.affected_fields.join(", ")),
        ]);
    }
    table
}

/// Entities with the most flagged rows first, at most `limit` of them.
pub fn entity_table(report: &Report, limit: usize) -> Table {
    let mut ranked: Vec<_> = report.entities.iter().collect();
    ranked.sort_by(|a, b| {
        b.flagged_rows
            .cmp(&a.flagged_rows)
            .then_with(|| a.entity.cmp(&b.entity))
    });

    let mut table = Table::new();
    table.set_header(vec![
        header_cell(&report.entity_key),
        header_cell("Rows"),
        header_cell("Codes"),
    ]);
    apply_issue_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);

    for summary in ranked.into_iter().take(limit) {
        let codes: Vec<&str> = summary.codes.iter().map(String::as_str).collect();
        table.add_row(vec![
            Cell::new(&summary.entity).add_attribute(Attribute::Bold),
            Cell::new(summary.flagged_rows),
            Cell::new(codes.join(", ")),
        ]);
    }
    table
}

/// Write the full report: summary line, code table, then flagged rows and
/// the per-entity breakdown when anything was flagged.
pub fn write_report<W: Write>(out: &mut W, report: &Report, issue_limit: usize) -> io::Result<()> {
    writeln!(out, "{}", summary_line(report))?;
    writeln!(out, "{}", code_table(report))?;

    if !report.has_issues() {
        return writeln!(out, "No flagged rows.");
    }

    writeln!(out)?;
    writeln!(out, "Flagged rows")?;
    writeln!(out, "{}", issue_table(report, issue_limit))?;
    if report.issues.len() > issue_limit {
        writeln!(
            out,
            "... {} more rows not shown",
            report.issues.len() - issue_limit
        )?;
    }

    if !report.entities.is_empty() {
        writeln!(out)?;
        writeln!(out, "By {}", report.entity_key)?;
        writeln!(out, "{}", entity_table(report, issue_limit))?;
    }
    if report.unattributed_rows > 0 {
        writeln!(
            out,
            "{} flagged rows have no {} value",
            report.unattributed_rows, report.entity_key
        )?;
    }
    Ok(())
}

/// Treat a reader that closed the pipe early (`| head`) as a finished write.
pub fn ignore_broken_pipe(result: io::Result<()>) -> io::Result<()> {
    match result {
        Err(error) if error.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

fn is_requested(summary: &CodeSummary) -> bool {
    !matches!(
        summary.status,
        CodeStatus::Skipped {
            reason: SkipReason::Selection
        }
    )
}

fn status_cell(status: &CodeStatus) -> Cell {
    match status {
        CodeStatus::Evaluated => Cell::new("ok").fg(Color::Green),
        CodeStatus::Skipped { reason } => {
            Cell::new(format!("skipped: {reason}")).fg(Color::Yellow)
        }
        CodeStatus::Failed { kind, detail } => {
            Cell::new(format!("{}: {detail}", kind.label())).fg(Color::Red)
        }
    }
}

fn count_cell(count: Option<usize>, color: Color) -> Cell {
    match count {
        Some(value) if value > 0 => Cell::new(value).fg(color).add_attribute(Attribute::Bold),
        Some(value) => dim_cell(value),
        None => dim_cell("-"),
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn apply_list_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
    table.set_constraints(vec![
        ColumnConstraint::LowerBoundary(Width::Fixed(6)),
        ColumnConstraint::UpperBoundary(Width::Percentage(30)),
        ColumnConstraint::LowerBoundary(Width::Fixed(5)),
        ColumnConstraint::LowerBoundary(Width::Fixed(8)),
        ColumnConstraint::UpperBoundary(Width::Percentage(55)),
    ]);
}

fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}
