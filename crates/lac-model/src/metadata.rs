//! Submission metadata handed to rules alongside the tables.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Well-known metadata keys.
pub mod keys {
    /// Collection year of the return, e.g. `2023`.
    pub const COLLECTION_YEAR: &str = "collection_year";
    /// Local authority identifier, e.g. `E09000027`.
    pub const LOCAL_AUTHORITY: &str = "local_authority";
    /// Source format of the upload: `csv` or `xml`.
    pub const FILE_FORMAT: &str = "file_format";
    /// Reference list of valid postcodes.
    pub const POSTCODES: &str = "postcodes";
}

/// A single metadata entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Text(String),
    List(Vec<String>),
}

impl MetadataValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            Self::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(values) => Some(values),
            Self::Text(_) => None,
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for MetadataValue {
    fn from(values: Vec<String>) -> Self {
        Self::List(values)
    }
}

/// Arbitrary key to value metadata for one validation run.
pub type Metadata = BTreeMap<String, MetadataValue>;
