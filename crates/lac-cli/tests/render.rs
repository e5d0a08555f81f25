use std::io;

use polars::prelude::*;

use lac_cli::render::{
    code_table, entity_table, ignore_broken_pipe, issue_table, rule_list_table, summary_line,
    write_report,
};
use lac_model::{ErrorDefinition, Locations, RuleResult, TableSet};
use lac_report::{Report, ReportBuilder};
use lac_validate::{Orchestrator, Registry, RuleEntry, RunOptions};

fn make_df(columns: Vec<(&str, Vec<&str>)>) -> DataFrame {
    let cols: Vec<Column> = columns
        .into_iter()
        .map(|(name, values)| Column::new(name.into(), values))
        .collect();
    DataFrame::new(cols).expect("dataframe")
}

fn registry() -> Registry {
    Registry::new(
        "demo",
        vec![
            RuleEntry::new(
                ErrorDefinition::new("101", "Gender code is not valid", ["SEX"]),
                |_: &TableSet| -> RuleResult { Ok(Locations::single("Header", [1])) },
            ),
            RuleEntry::new(
                ErrorDefinition::new("105", "Asylum status needs metadata", ["UASC"]),
                |tables: &TableSet| -> RuleResult {
                    tables.metadata_text("file_format")?;
                    Ok(Locations::new())
                },
            ),
            RuleEntry::new(
                ErrorDefinition::new("INT03", "Child missing from Header", ["CHILD"]),
                |_: &TableSet| -> RuleResult { Ok(Locations::new()) },
            ),
        ],
    )
    .expect("registry")
}

fn report(options: RunOptions) -> Report {
    let registry = registry();
    let tables = TableSet::new().with_table(
        "Header",
        make_df(vec![("CHILD", vec!["A1", "B2"]), ("SEX", vec!["1", "9"])]),
    );
    let run = Orchestrator::new(&registry)
        .with_options(options.with_workers(1))
        .run(&tables);
    ReportBuilder::new(&registry).build(&run, &tables)
}

#[test]
fn summary_line_counts_outcomes() {
    let report = report(RunOptions::default());
    insta::assert_snapshot!(
        summary_line(&report),
        @"demo: 2 succeeded, 1 skipped, 0 failed; 1 flagged rows across 1 entities"
    );
}

#[test]
fn code_table_hides_unselected_codes() {
    let rendered = code_table(&report(RunOptions::default().with_selection(["101"]))).to_string();
    assert!(rendered.contains("101"));
    assert!(!rendered.contains("INT03"));
    assert!(!rendered.contains("105"));
}

#[test]
fn code_table_shows_skip_reason() {
    let rendered = code_table(&report(RunOptions::default())).to_string();
    assert!(rendered.contains("INT03"));
    assert!(rendered.contains("skipped"));
}

#[test]
fn issue_and_entity_tables_name_the_child() {
    let report = report(RunOptions::default());
    let issues = issue_table(&report, 10).to_string();
    assert!(issues.contains("Header"));
    assert!(issues.contains("B2"));
    assert!(!issues.contains("A1"));

    let entities = entity_table(&report, 10).to_string();
    assert!(entities.contains("CHILD"));
    assert!(entities.contains("B2"));
}

#[test]
fn issue_table_respects_limit() {
    let report = report(RunOptions::default());
    let rendered = issue_table(&report, 0).to_string();
    assert!(!rendered.contains("B2"));
}

#[test]
fn rule_list_includes_every_catalog_code() {
    let registry = lac_rules::load_registry("lac2024_25").expect("rule set");
    let rendered = rule_list_table(&registry).to_string();
    for code in registry.codes() {
        assert!(rendered.contains(code), "missing {code}");
    }
}

#[test]
fn written_report_lists_flagged_rows() {
    let report = report(RunOptions::default());
    let mut out = Vec::new();
    write_report(&mut out, &report, 10).expect("write report");
    let text = String::from_utf8(out).expect("utf8");

    assert!(text.starts_with("demo: 2 succeeded"));
    assert!(text.contains("Flagged rows"));
    assert!(text.contains("By CHILD"));
    assert!(!text.contains("No flagged rows."));
}

#[test]
fn written_report_without_issues() {
    let report = report(RunOptions::default().with_selection(["INT03"]));
    let mut out = Vec::new();
    write_report(&mut out, &report, 10).expect("write report");
    let text = String::from_utf8(out).expect("utf8");

    assert!(text.trim_end().ends_with("No flagged rows."));
}

#[test]
fn closed_pipe_is_not_an_error() {
    let closed = io::Error::new(io::ErrorKind::BrokenPipe, "closed");
    assert!(ignore_broken_pipe(Err(closed)).is_ok());

    let denied = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
    let error = ignore_broken_pipe(Err(denied)).expect_err("other errors propagate");
    assert_eq!(error.kind(), io::ErrorKind::PermissionDenied);
}
