//! Faults a rule can signal while evaluating a table set.

use thiserror::Error;

use crate::Locations;

/// What a rule returns: flagged locations, or a reason it could not run.
pub type RuleResult = std::result::Result<Locations, RuleError>;

/// Errors raised from inside a rule body.
///
/// Rules never handle these themselves. The orchestrator downgrades them to
/// an outcome record so one bad rule cannot stop the batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// A metadata key the rule depends on was not supplied.
    #[error("missing metadata key '{key}'")]
    MissingMetadata { key: String },

    /// Any other fault during evaluation.
    #[error("{message}")]
    Unhandled { message: String },
}

impl RuleError {
    /// Creates a missing metadata error.
    pub fn missing_metadata(key: impl Into<String>) -> Self {
        Self::MissingMetadata { key: key.into() }
    }

    /// Creates an unhandled fault.
    pub fn unhandled(message: impl Into<String>) -> Self {
        Self::Unhandled {
            message: message.into(),
        }
    }

    /// A table the rule needs is present but lacks a column.
    pub fn missing_column(table: &str, column: &str) -> Self {
        Self::unhandled(format!("column '{column}' not found in table '{table}'"))
    }
}
