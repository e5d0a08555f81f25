//! Rule execution engine.
//!
//! - **Rule contract** (`Rule`, `RuleEntry`): a pure evaluation over a
//!   [`TableSet`](lac_model::TableSet) paired with its error definition
//! - **Registry** (`Registry`): ordered, code-unique catalog for one rule-set
//!   version
//! - **Orchestrator** (`Orchestrator`): runs a registry against a table set
//!   on a bounded worker pool, isolating every rule behind a fault boundary
//!
//! # Example
//!
//! ```ignore
//! use lac_validate::{Orchestrator, RunOptions};
//!
//! let registry = lac_rules::load_registry("lac2022_23")?;
//! let run = Orchestrator::new(&registry)
//!     .with_options(RunOptions::default().with_selection(["101", "141"]))
//!     .run(&tables);
//!
//! println!("{} failed", run.summary.failed);
//! ```

mod error;
mod orchestrator;
mod registry;
mod rule;

pub use error::{RegistryError, ValidateError};
pub use orchestrator::{CancelFlag, CancelReason, Orchestrator, RunOptions, RunResult, RunSummary};
pub use registry::Registry;
pub use rule::{Rule, RuleEntry};
