//! Row-wise column access for rules.
//!
//! A `ColumnReader` borrows a `DataFrame` and hands out trimmed string views
//! and parsed dates as fresh vectors. Nothing is written back to the
//! frame, so concurrent rules can share one table set.
//!
//! # Example
//!
//! ```ignore
//! let reader = ColumnReader::new(episodes);
//!
//! let flagged = reader
//!     .rows_where("RNE", |v| !v.is_empty() && !CODES.contains(&v))
//!     .unwrap_or_default();
//! ```

use chrono::NaiveDate;
use polars::prelude::{AnyValue, Column, DataFrame};

use crate::dates::parse_uk_date;
use crate::values::any_to_string;

/// A reader for accessing DataFrame columns row by row.
#[derive(Debug, Clone, Copy)]
pub struct ColumnReader<'a> {
    df: &'a DataFrame,
}

impl<'a> ColumnReader<'a> {
    /// Create a new column reader for the given DataFrame.
    #[inline]
    pub fn new(df: &'a DataFrame) -> Self {
        Self { df }
    }

    /// Number of rows in the frame.
    #[inline]
    pub fn height(&self) -> usize {
        self.df.height()
    }

    #[inline]
    fn column(&self, name: &str) -> Option<&'a Column> {
        self.df.column(name).ok()
    }

    /// Check if a column exists.
    #[inline]
    pub fn has_column(&self, name: &str) -> bool {
        self.df.column(name).is_ok()
    }

    /// Iterate over `(row_index, trimmed_value)` pairs of a column.
    pub fn values(&self, column_name: &str) -> Option<ColumnValueIter<'a>> {
        let column = self.column(column_name)?;
        Some(ColumnValueIter {
            column,
            current: 0,
            len: self.df.height(),
        })
    }

    /// Collect every trimmed value of a column. Blank cells become `""`.
    pub fn strings(&self, column: &str) -> Option<Vec<String>> {
        Some(self.values(column)?.map(|(_, value)| value).collect())
    }

    /// Parse every cell of a column as a `dd/mm/YYYY` date.
    ///
    /// Blank and malformed cells both yield `None`; callers that need to tell
    /// them apart should pair this with [`ColumnReader::strings`].
    pub fn dates(&self, column: &str) -> Option<Vec<Option<NaiveDate>>> {
        Some(
            self.values(column)?
                .map(|(_, value)| parse_uk_date(&value))
                .collect(),
        )
    }

    /// Row indices whose trimmed value satisfies `predicate`.
    ///
    /// Blank cells are passed as `""` so the predicate decides whether a
    /// missing value is acceptable.
    pub fn rows_where<F>(&self, column: &str, predicate: F) -> Option<Vec<usize>>
    where
        F: Fn(&str) -> bool,
    {
        Some(
            self.values(column)?
                .filter(|(_, value)| predicate(value))
                .map(|(idx, _)| idx)
                .collect(),
        )
    }
}

/// Iterator over `(row_index, trimmed_value)` pairs of one column.
#[derive(Debug)]
pub struct ColumnValueIter<'a> {
    column: &'a Column,
    current: usize,
    len: usize,
}

impl Iterator for ColumnValueIter<'_> {
    type Item = (usize, String);

    fn next(&mut self) -> Option<Self::Item> {
        if self.current >= self.len {
            return None;
        }
        let idx = self.current;
        self.current += 1;

        let value = self.column.get(idx).unwrap_or(AnyValue::Null);
        Some((idx, any_to_string(value).trim().to_string()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len.saturating_sub(self.current);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ColumnValueIter<'_> {}
