//! Rule catalogs for the SSDA903 looked-after children return.
//!
//! Each reporting year has its own catalog. [`RuleSetVersion`] maps a year
//! tag such as `lac2022_23` to a constructed [`Registry`](lac_validate::Registry):
//!
//! ```ignore
//! let registry = lac_rules::load_registry("lac2024_25")?;
//! assert!(registry.contains("SW01bSTG1"));
//! ```

mod catalog;
mod error;
mod version;

pub use error::RulesError;
pub use version::{RuleSetVersion, load_registry};
