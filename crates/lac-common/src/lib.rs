//! Shared utilities for the LAC validator crates.
//!
//! Rules read cells through these helpers so that blank handling, numeric
//! coercion and date parsing behave the same way across the whole catalog.

pub mod column_reader;
pub mod dates;
pub mod values;

pub use column_reader::{ColumnReader, ColumnValueIter};
pub use dates::parse_uk_date;
pub use values::{any_to_string, parse_f64};
