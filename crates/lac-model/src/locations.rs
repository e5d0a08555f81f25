//! Flagged row locations returned by a rule.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

/// Mapping from table name to the set of flagged row indices.
///
/// Row indices are kept in a set: the same row reported twice by a join is
/// one location, and iteration order never depends on how a rule built it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Locations {
    inner: BTreeMap<String, BTreeSet<usize>>,
}

impl Locations {
    /// No flagged rows. This is also the vacuous pass for missing tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Locations in a single table.
    pub fn single<I>(table: impl Into<String>, rows: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        let mut locations = Self::new();
        locations.insert(table, rows);
        locations
    }

    /// Add rows for a table, merging with any rows already recorded.
    pub fn insert<I>(&mut self, table: impl Into<String>, rows: I)
    where
        I: IntoIterator<Item = usize>,
    {
        self.inner.entry(table.into()).or_default().extend(rows);
    }

    /// Table names present in the mapping, including tables with no rows.
    pub fn tables(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(String::as_str)
    }

    /// Flagged rows for a table.
    pub fn rows(&self, table: &str) -> Option<&BTreeSet<usize>> {
        self.inner.get(table)
    }

    /// Iterate over `(table, rows)` pairs in table-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<usize>)> {
        self.inner.iter().map(|(table, rows)| (table.as_str(), rows))
    }

    /// Total flagged rows across all tables.
    pub fn total_rows(&self) -> usize {
        self.inner.values().map(BTreeSet::len).sum()
    }

    /// True when no row is flagged.
    pub fn is_empty(&self) -> bool {
        self.inner.values().all(BTreeSet::is_empty)
    }
}
