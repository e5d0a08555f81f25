//! Report types.

use std::collections::{BTreeMap, BTreeSet};

use lac_model::{FailureKind, Locations, SkipReason};
use lac_validate::{CancelReason, RunSummary};
use serde::Serialize;

/// One flagged row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueRow {
    pub code: String,
    pub message: String,
    pub affected_fields: Vec<String>,
    pub table: String,
    pub row: usize,
    /// Entity key value of the flagged row, when the table carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
}

/// Flagged rows attributed to one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntitySummary {
    pub entity: String,
    pub codes: BTreeSet<String>,
    pub flagged_rows: usize,
}

impl EntitySummary {
    pub fn distinct_codes(&self) -> usize {
        self.codes.len()
    }
}

/// Whether a code produced a usable result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CodeStatus {
    Evaluated,
    Skipped { reason: SkipReason },
    Failed { kind: FailureKind, detail: String },
}

impl CodeStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Evaluated => "evaluated",
            Self::Skipped { .. } => "skipped",
            Self::Failed { .. } => "failed",
        }
    }

    /// True when the code was requested but produced no usable result.
    ///
    /// Codes left out of the selection were never requested and do not count.
    pub fn is_unevaluated(&self) -> bool {
        match self {
            Self::Evaluated => false,
            Self::Skipped { reason } => *reason != SkipReason::Selection,
            Self::Failed { .. } => true,
        }
    }
}

/// Triage view of one code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeSummary {
    pub code: String,
    pub message: String,
    #[serde(flatten)]
    pub status: CodeStatus,
    pub flagged_rows: usize,
    pub distinct_entities: usize,
}

/// Aggregated views of one run.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub version: String,
    pub entity_key: String,
    pub summary: RunSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled: Option<CancelReason>,
    pub codes: Vec<CodeSummary>,
    pub issues: Vec<IssueRow>,
    pub entities: Vec<EntitySummary>,
    /// Flagged rows whose table lacks the entity key or whose key is blank.
    pub unattributed_rows: usize,
    pub(crate) locations: BTreeMap<String, Locations>,
}

impl Report {
    /// Location mappings of every evaluated code, keyed by code.
    pub fn raw_locations(&self) -> &BTreeMap<String, Locations> {
        &self.locations
    }

    /// True when any evaluated code flagged a row.
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    /// True when nothing was flagged, no rule failed and the run finished.
    ///
    /// Rules skipped for missing metadata do not count against a clean run;
    /// they are listed by [`Report::unevaluated`].
    pub fn is_clean(&self) -> bool {
        !self.has_issues() && self.summary.failed == 0 && self.cancelled.is_none()
    }

    /// Codes that were requested but could not be evaluated.
    pub fn unevaluated(&self) -> impl Iterator<Item = &CodeSummary> {
        self.codes
            .iter()
            .filter(|summary| summary.status.is_unevaluated())
    }

    pub fn code(&self, code: &str) -> Option<&CodeSummary> {
        self.codes.iter().find(|summary| summary.code == code)
    }

    /// Issue rows for a single code.
    pub fn issues_for<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a IssueRow> {
        self.issues.iter().filter(move |issue| issue.code == code)
    }

    pub fn entity(&self, entity: &str) -> Option<&EntitySummary> {
        self.entities
            .binary_search_by(|summary| summary.entity.as_str().cmp(entity))
            .ok()
            .map(|idx| &self.entities[idx])
    }
}
