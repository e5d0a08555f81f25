//! Report views over a validation run.
//!
//! A [`Report`] is derived from a [`RunResult`](lac_validate::RunResult) plus
//! the registry that produced it, and is never persisted:
//!
//! - **Issue listing** ([`IssueRow`]): one row per code, table and row index
//! - **Entity summary** ([`EntitySummary`]): flagged rows grouped by the entity key
//! - **Code summary** ([`CodeSummary`]): per-code status and counts for triage
//! - **Raw locations**: the unmodified per-code location mappings

mod builder;
mod report;

pub use builder::{DEFAULT_ENTITY_KEY, ReportBuilder};
pub use report::{CodeStatus, CodeSummary, EntitySummary, IssueRow, Report};
