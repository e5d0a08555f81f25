//! The complete input of one validation run.

use std::collections::BTreeMap;

use polars::prelude::DataFrame;

use crate::{Metadata, MetadataValue, RuleError};

/// Table names used by the SSDA903 return.
pub mod tables {
    pub const HEADER: &str = "Header";
    pub const EPISODES: &str = "Episodes";
    pub const REVIEWS: &str = "Reviews";
    pub const SW_EPISODES: &str = "SWEpisodes";
}

/// Named tables plus metadata.
///
/// Built once by ingress and shared read-only by every rule. Row indices are
/// positions in the underlying `DataFrame`; since nothing mutates the set
/// during a run, they stay stable for the reports.
#[derive(Debug, Clone, Default)]
pub struct TableSet {
    tables: BTreeMap<String, DataFrame>,
    metadata: Metadata,
}

impl TableSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a table.
    #[must_use]
    pub fn with_table(mut self, name: impl Into<String>, df: DataFrame) -> Self {
        self.tables.insert(name.into(), df);
        self
    }

    /// Add or replace a metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn insert_table(&mut self, name: impl Into<String>, df: DataFrame) {
        self.tables.insert(name.into(), df);
    }

    pub fn insert_metadata(&mut self, key: impl Into<String>, value: impl Into<MetadataValue>) {
        self.metadata.insert(key.into(), value.into());
    }

    pub fn table(&self, name: &str) -> Option<&DataFrame> {
        self.tables.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// True when every named table is present.
    pub fn has_tables(&self, names: &[&str]) -> bool {
        names.iter().all(|name| self.contains(name))
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Row count of a table, if present.
    pub fn height(&self, name: &str) -> Option<usize> {
        self.tables.get(name).map(DataFrame::height)
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Text metadata value, or `MissingMetadata` when the key is absent.
    pub fn metadata_text(&self, key: &str) -> Result<&str, RuleError> {
        match self.metadata.get(key) {
            Some(MetadataValue::Text(value)) => Ok(value),
            Some(MetadataValue::List(_)) => Err(RuleError::unhandled(format!(
                "metadata '{key}' is a list, expected text"
            ))),
            None => Err(RuleError::missing_metadata(key)),
        }
    }

    /// List metadata value, or `MissingMetadata` when the key is absent.
    pub fn metadata_list(&self, key: &str) -> Result<&[String], RuleError> {
        match self.metadata.get(key) {
            Some(MetadataValue::List(values)) => Ok(values),
            Some(MetadataValue::Text(_)) => Err(RuleError::unhandled(format!(
                "metadata '{key}' is text, expected a list"
            ))),
            None => Err(RuleError::missing_metadata(key)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }
}
