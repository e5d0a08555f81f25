//! Per-rule results of one validation run.

use std::fmt;

use serde::Serialize;

use crate::Locations;

/// Why a rule was not evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// The code was outside the caller's selection.
    Selection,
    /// A metadata key the rule needs was not supplied.
    MissingMetadata { key: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Selection => write!(f, "not selected"),
            Self::MissingMetadata { key } => write!(f, "missing metadata '{key}'"),
        }
    }
}

/// How a rule failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The rule raised a fault or panicked.
    Unhandled,
    /// The rule returned a table or row that does not exist.
    InvalidResult,
}

impl FailureKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unhandled => "unhandled",
            Self::InvalidResult => "invalid-result",
        }
    }
}

/// Status of one rule against one table set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RuleStatus {
    Success { locations: Locations },
    Skipped { reason: SkipReason },
    Failed { kind: FailureKind, detail: String },
}

/// Outcome of one registry entry in a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleOutcome {
    pub code: String,
    #[serde(flatten)]
    pub status: RuleStatus,
}

impl RuleOutcome {
    pub fn success(code: impl Into<String>, locations: Locations) -> Self {
        Self {
            code: code.into(),
            status: RuleStatus::Success { locations },
        }
    }

    pub fn skipped(code: impl Into<String>, reason: SkipReason) -> Self {
        Self {
            code: code.into(),
            status: RuleStatus::Skipped { reason },
        }
    }

    pub fn failed(code: impl Into<String>, kind: FailureKind, detail: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            status: RuleStatus::Failed {
                kind,
                detail: detail.into(),
            },
        }
    }

    /// Flagged locations, if the rule ran to completion.
    pub fn locations(&self) -> Option<&Locations> {
        match &self.status {
            RuleStatus::Success { locations } => Some(locations),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, RuleStatus::Success { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.status, RuleStatus::Skipped { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, RuleStatus::Failed { .. })
    }

    /// True for outcomes skipped because of the code selection.
    pub fn is_unselected(&self) -> bool {
        matches!(
            self.status,
            RuleStatus::Skipped {
                reason: SkipReason::Selection
            }
        )
    }
}
