//! Builds a [`Report`] from a finished run.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use lac_common::ColumnReader;
use lac_model::{RuleStatus, TableSet};
use lac_validate::{Registry, RunResult};
use tracing::debug;

use crate::report::{CodeStatus, CodeSummary, EntitySummary, IssueRow, Report};

/// Column identifying a child across the SSDA903 tables.
pub const DEFAULT_ENTITY_KEY: &str = "CHILD";

/// Derives report views from a run and the registry it ran.
#[derive(Debug)]
pub struct ReportBuilder<'r> {
    registry: &'r Registry,
    entity_key: String,
}

impl<'r> ReportBuilder<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            entity_key: DEFAULT_ENTITY_KEY.to_string(),
        }
    }

    /// Column used to attribute flagged rows to an entity.
    #[must_use]
    pub fn entity_key(mut self, column: impl Into<String>) -> Self {
        self.entity_key = column.into();
        self
    }

    /// Build every view. Only reads the entity key column of `tables`.
    pub fn build(&self, run: &RunResult, tables: &TableSet) -> Report {
        let mut keys = EntityKeys::new(tables, &self.entity_key);
        let mut issues = Vec::new();
        let mut codes = Vec::with_capacity(run.outcomes.len());
        let mut locations = BTreeMap::new();

        for outcome in &run.outcomes {
            let definition = self.registry.definition(&outcome.code);
            let message = definition.map(|d| d.message.clone()).unwrap_or_default();
            let affected_fields = definition
                .map(|d| d.affected_fields.clone())
                .unwrap_or_default();

            let (status, flagged_rows, distinct_entities) = match &outcome.status {
                RuleStatus::Success { locations: flagged } => {
                    let mut entities = BTreeSet::new();
                    let mut count = 0;
                    for (table, rows) in flagged.iter() {
                        for &row in rows {
                            let entity = keys.lookup(table, row);
                            if let Some(entity) = &entity {
                                entities.insert(entity.clone());
                            }
                            count += 1;
                            issues.push(IssueRow {
                                code: outcome.code.clone(),
                                message: message.clone(),
                                affected_fields: affected_fields.clone(),
                                table: table.to_string(),
                                row,
                                entity,
                            });
                        }
                    }
                    locations.insert(outcome.code.clone(), flagged.clone());
                    (CodeStatus::Evaluated, count, entities.len())
                }
                RuleStatus::Skipped { reason } => (
                    CodeStatus::Skipped {
                        reason: reason.clone(),
                    },
                    0,
                    0,
                ),
                RuleStatus::Failed { kind, detail } => (
                    CodeStatus::Failed {
                        kind: *kind,
                        detail: detail.clone(),
                    },
                    0,
                    0,
                ),
            };

            codes.push(CodeSummary {
                code: outcome.code.clone(),
                message,
                status,
                flagged_rows,
                distinct_entities,
            });
        }

        let (entities, unattributed_rows) = summarize_entities(&issues);
        debug!(
            issues = issues.len(),
            entities = entities.len(),
            unattributed_rows,
            "built report"
        );

        Report {
            version: run.version.clone(),
            entity_key: self.entity_key.clone(),
            summary: run.summary,
            cancelled: run.cancelled,
            codes,
            issues,
            entities,
            unattributed_rows,
            locations,
        }
    }
}

/// Group issue rows by entity, sorted by entity value.
fn summarize_entities(issues: &[IssueRow]) -> (Vec<EntitySummary>, usize) {
    let mut grouped: BTreeMap<&str, EntitySummary> = BTreeMap::new();
    let mut unattributed = 0;

    for issue in issues {
        let Some(entity) = issue.entity.as_deref() else {
            unattributed += 1;
            continue;
        };
        let summary = grouped.entry(entity).or_insert_with(|| EntitySummary {
            entity: entity.to_string(),
            codes: BTreeSet::new(),
            flagged_rows: 0,
        });
        summary.codes.insert(issue.code.clone());
        summary.flagged_rows += 1;
    }

    (grouped.into_values().collect(), unattributed)
}

/// Lazily read entity key columns, one per table.
struct EntityKeys<'a> {
    tables: &'a TableSet,
    column: &'a str,
    cache: HashMap<String, Option<Vec<String>>>,
}

impl<'a> EntityKeys<'a> {
    fn new(tables: &'a TableSet, column: &'a str) -> Self {
        Self {
            tables,
            column,
            cache: HashMap::new(),
        }
    }

    fn lookup(&mut self, table: &str, row: usize) -> Option<String> {
        let (tables, column) = (self.tables, self.column);
        let values = self.cache.entry(table.to_string()).or_insert_with(|| {
            tables
                .table(table)
                .and_then(|df| ColumnReader::new(df).strings(column))
        });
        values
            .as_ref()?
            .get(row)
            .filter(|value| !value.is_empty())
            .cloned()
    }
}
