//! Rule-set loading errors.

use lac_validate::RegistryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RulesError {
    /// The tag names no known reporting year.
    #[error("unknown rule set '{tag}' (expected one of: {known})")]
    UnknownVersion { tag: String, known: String },

    /// The catalog for a known year failed registry construction.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}
