//! Data model shared by the rule engine, the rule catalog and the reports.

pub mod definition;
pub mod error;
pub mod locations;
pub mod metadata;
pub mod outcome;
pub mod table_set;

pub use definition::ErrorDefinition;
pub use error::{RuleError, RuleResult};
pub use locations::Locations;
pub use metadata::{Metadata, MetadataValue, keys};
pub use outcome::{FailureKind, RuleOutcome, RuleStatus, SkipReason};
pub use table_set::{TableSet, tables};
