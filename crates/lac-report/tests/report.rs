use polars::prelude::*;
use proptest::prelude::*;

use lac_model::{ErrorDefinition, Locations, RuleError, RuleResult, SkipReason, TableSet};
use lac_report::{CodeStatus, ReportBuilder};
use lac_validate::{Orchestrator, Registry, RuleEntry, RunOptions};

fn make_df(columns: Vec<(&str, Vec<&str>)>) -> DataFrame {
    let cols: Vec<Column> = columns
        .into_iter()
        .map(|(name, values)| Column::new(name.into(), values))
        .collect();
    DataFrame::new(cols).expect("dataframe")
}

fn tables() -> TableSet {
    TableSet::new()
        .with_table(
            "Header",
            make_df(vec![("CHILD", vec!["101", "102", "103", ""])]),
        )
        .with_table(
            "Episodes",
            make_df(vec![
                ("CHILD", vec!["101", "101", "102", "103"]),
                ("PLACE", vec!["U1", "T0", "R5", "U1"]),
            ]),
        )
        .with_table("Lookup", make_df(vec![("CODE", vec!["A", "B"])]))
}

fn entry(code: &str, fields: &[&str], locations: Locations) -> RuleEntry {
    RuleEntry::new(
        ErrorDefinition::new(code, format!("message {code}"), fields.iter().copied()),
        move |_: &TableSet| -> RuleResult { Ok(locations.clone()) },
    )
}

fn registry() -> Registry {
    let mut both = Locations::single("Header", [0, 3]);
    both.insert("Episodes", [1, 2]);

    Registry::new(
        "test",
        vec![
            entry("101", &["SEX"], Locations::single("Header", [0])),
            entry("INT03", &["CHILD"], both),
            entry("141", &["DECOM"], Locations::new()),
            entry("X1", &["CODE"], Locations::single("Lookup", [1])),
            RuleEntry::new(
                ErrorDefinition::new("105", "needs metadata", ["UASC"]),
                |tables: &TableSet| -> RuleResult {
                    tables.metadata_text("file_format")?;
                    Ok(Locations::new())
                },
            ),
            RuleEntry::new(
                ErrorDefinition::new("BAD", "broken", ["CHILD"]),
                |_: &TableSet| -> RuleResult { Err(RuleError::unhandled("boom")) },
            ),
            entry("999", &["CHILD"], Locations::single("Header", [1])),
        ],
    )
    .expect("registry")
}

fn report_for(registry: &Registry, options: RunOptions) -> lac_report::Report {
    let tables = tables();
    let run = Orchestrator::new(registry).with_options(options).run(&tables);
    ReportBuilder::new(registry).build(&run, &tables)
}

#[test]
fn issue_listing_carries_definition_and_entity() {
    let registry = registry();
    let report = report_for(&registry, RunOptions::default().with_workers(1));

    let listing: Vec<_> = report
        .issues
        .iter()
        .map(|issue| (issue.code.as_str(), issue.table.as_str(), issue.row))
        .collect();
    assert_eq!(
        listing,
        vec![
            ("101", "Header", 0),
            ("INT03", "Episodes", 1),
            ("INT03", "Episodes", 2),
            ("INT03", "Header", 0),
            ("INT03", "Header", 3),
            ("X1", "Lookup", 1),
            ("999", "Header", 1),
        ]
    );

    let first = &report.issues[0];
    assert_eq!(first.message, "message 101");
    assert_eq!(first.affected_fields, vec!["SEX"]);
    assert_eq!(first.entity.as_deref(), Some("101"));
    assert!(report.has_issues());
}

#[test]
fn entity_summary_counts_distinct_codes() {
    let registry = registry();
    let report = report_for(&registry, RunOptions::default().with_workers(1));

    let child_101 = report.entity("101").expect("entity 101");
    assert_eq!(child_101.flagged_rows, 3);
    assert_eq!(child_101.distinct_codes(), 2);

    let child_102 = report.entity("102").expect("entity 102");
    assert_eq!(child_102.codes.iter().collect::<Vec<_>>(), vec!["999", "INT03"]);

    assert!(report.entity("103").is_none());
    let entities: Vec<_> = report.entities.iter().map(|e| e.entity.as_str()).collect();
    assert_eq!(entities, vec!["101", "102"]);

    // Blank key on Header row 3, no key column in Lookup.
    assert_eq!(report.unattributed_rows, 2);
}

#[test]
fn code_summary_distinguishes_clean_from_unevaluated() {
    let registry = registry();
    let report = report_for(&registry, RunOptions::default().with_workers(1));

    let clean = report.code("141").expect("141");
    assert_eq!(clean.status, CodeStatus::Evaluated);
    assert_eq!(clean.flagged_rows, 0);

    let int03 = report.code("INT03").expect("INT03");
    assert_eq!(int03.flagged_rows, 4);
    assert_eq!(int03.distinct_entities, 2);

    let unevaluated: Vec<_> = report.unevaluated().map(|c| c.code.as_str()).collect();
    assert_eq!(unevaluated, vec!["105", "BAD"]);
    assert_eq!(report.code("BAD").map(|c| c.status.label()), Some("failed"));
}

#[test]
fn unselected_codes_are_not_unevaluated() {
    let registry = registry();
    let report = report_for(
        &registry,
        RunOptions::default().with_workers(1).with_selection(["101"]),
    );

    assert_eq!(report.codes.len(), registry.len());
    assert_eq!(report.unevaluated().count(), 0);
    assert_eq!(
        report.code("INT03").map(|c| &c.status),
        Some(&CodeStatus::Skipped {
            reason: SkipReason::Selection
        })
    );
    assert_eq!(report.raw_locations().keys().collect::<Vec<_>>(), vec!["101"]);
}

#[test]
fn custom_entity_key() {
    let registry = registry();
    let tables = tables();
    let run = Orchestrator::new(&registry)
        .with_options(RunOptions::default().with_workers(1))
        .run(&tables);
    let report = ReportBuilder::new(&registry).entity_key("CODE").build(&run, &tables);

    assert_eq!(report.entity_key, "CODE");
    let entities: Vec<_> = report.entities.iter().map(|e| e.entity.as_str()).collect();
    assert_eq!(entities, vec!["B"]);
}

#[test]
fn report_serializes_to_json() {
    let registry = registry();
    let report = report_for(&registry, RunOptions::default().with_workers(1));
    let json = serde_json::to_value(&report).expect("serialize report");

    assert_eq!(json["version"], "test");
    assert_eq!(json["codes"][0]["code"], "101");
    assert_eq!(json["codes"][0]["status"], "evaluated");
    assert_eq!(json["codes"][5]["status"], "failed");
    assert_eq!(json["locations"]["INT03"]["Episodes"][1], 2);
    assert_eq!(json["issues"][0]["entity"], "101");
}

#[test]
fn metadata_skip_leaves_run_clean() {
    let registry = Registry::new(
        "clean",
        vec![
            entry("141", &["DECOM"], Locations::new()),
            RuleEntry::new(
                ErrorDefinition::new("105", "needs metadata", ["UASC"]),
                |tables: &TableSet| -> RuleResult {
                    tables.metadata_text("file_format")?;
                    Ok(Locations::new())
                },
            ),
        ],
    )
    .expect("registry");
    let report = report_for(&registry, RunOptions::default().with_workers(1));

    assert_eq!(report.unevaluated().count(), 1);
    assert!(!report.has_issues());
    assert!(report.is_clean());
}

#[test]
fn flagged_rows_or_failures_are_not_clean() {
    let flagged = Registry::new(
        "flagged",
        vec![entry("101", &["SEX"], Locations::single("Header", [0]))],
    )
    .expect("registry");
    assert!(!report_for(&flagged, RunOptions::default().with_workers(1)).is_clean());

    let failing = Registry::new(
        "failing",
        vec![RuleEntry::new(
            ErrorDefinition::new("BAD", "broken", ["CHILD"]),
            |_: &TableSet| -> RuleResult { Err(RuleError::unhandled("boom")) },
        )],
    )
    .expect("registry");
    let report = report_for(&failing, RunOptions::default().with_workers(1));
    assert!(!report.has_issues());
    assert!(!report.is_clean());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn code_counts_match_issue_listing(
        flags in proptest::collection::vec(
            (proptest::collection::vec(0usize..4, 0..6), proptest::collection::vec(0usize..4, 0..6)),
            1..12,
        ),
    ) {
        let entries = flags
            .iter()
            .enumerate()
            .map(|(i, (header_rows, episode_rows))| {
                let mut locations = Locations::single("Header", header_rows.clone());
                locations.insert("Episodes", episode_rows.clone());
                entry(&format!("R{i}"), &["CHILD"], locations)
            })
            .collect();
        let registry = Registry::new("prop", entries).expect("registry");
        let report = report_for(&registry, RunOptions::default().with_workers(3));

        for summary in &report.codes {
            prop_assert_eq!(summary.flagged_rows, report.issues_for(&summary.code).count());
        }
        let attributed: usize = report.entities.iter().map(|e| e.flagged_rows).sum();
        prop_assert_eq!(attributed + report.unattributed_rows, report.issues.len());
    }
}
