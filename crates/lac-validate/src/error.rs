//! Engine-level errors.
//!
//! Per-rule faults never show up here: they become outcome records. Only
//! registry construction and caller mistakes are errors.

use thiserror::Error;

/// Registry construction failures. These abort before any run starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Two entries share a code.
    #[error("duplicate rule code '{code}' in rule set '{version}'")]
    DuplicateCode { code: String, version: String },

    /// An entry has an empty code.
    #[error("rule at position {position} in rule set '{version}' has an empty code")]
    EmptyCode { position: usize, version: String },
}

/// Errors from the orchestrator's entry points.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidateError {
    /// Single-rule execution named a code the registry does not hold.
    #[error("unknown rule code '{code}' in rule set '{version}'")]
    UnknownCode { code: String, version: String },
}
