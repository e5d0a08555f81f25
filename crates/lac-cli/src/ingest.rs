//! Reading CSV extracts into a [`TableSet`].
//!
//! Every column is read as text. Rules coerce cells themselves, so the
//! ingress never guesses types from the first rows of a file.

use std::path::{Path, PathBuf};

use lac_common::ColumnReader;
use lac_model::{TableSet, keys, tables};
use polars::prelude::{CsvReadOptions, DataFrame, SerReader};
use thiserror::Error;
use tracing::{debug, warn};

/// Column holding the postcode in a postcode reference file.
pub const POSTCODE_COLUMN: &str = "pcd";

/// Tables the rule catalogs read.
pub const KNOWN_TABLES: &[&str] = &[
    tables::HEADER,
    tables::EPISODES,
    tables::REVIEWS,
    tables::SW_EPISODES,
];

/// Errors raised while building the input table set.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("CSV file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    #[error("CSV file has no columns: {path}")]
    EmptyCsv { path: PathBuf },

    #[error("expected {expected}, got '{arg}'")]
    InvalidAssignment { arg: String, expected: &'static str },

    #[error("table '{name}' given more than once")]
    DuplicateTable { name: String },
}

/// Result type for ingest operations.
pub type Result<T> = std::result::Result<T, IngestError>;

/// Split a `KEY=VALUE` argument. Both sides are trimmed and the key must not
/// be empty.
pub fn parse_assignment(arg: &str) -> Result<(String, String)> {
    let invalid = || IngestError::InvalidAssignment {
        arg: arg.to_string(),
        expected: "KEY=VALUE",
    };
    let (key, value) = arg.split_once('=').ok_or_else(invalid)?;
    let key = key.trim();
    if key.is_empty() {
        return Err(invalid());
    }
    Ok((key.to_string(), value.trim().to_string()))
}

/// Parse a `NAME=PATH` table argument.
pub fn parse_table_arg(arg: &str) -> Result<(String, PathBuf)> {
    let (name, path) = parse_assignment(arg).map_err(|_| IngestError::InvalidAssignment {
        arg: arg.to_string(),
        expected: "NAME=PATH",
    })?;
    if path.is_empty() {
        return Err(IngestError::InvalidAssignment {
            arg: arg.to_string(),
            expected: "NAME=PATH",
        });
    }
    Ok((name, PathBuf::from(path)))
}

/// Read a CSV file with a header row, keeping every column as text.
pub fn read_table(path: &Path) -> Result<DataFrame> {
    if !path.exists() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    if df.width() == 0 {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }
    debug!(path = %path.display(), rows = df.height(), columns = df.width(), "read table");
    Ok(df)
}

/// Read the postcode reference list.
///
/// Uses the `pcd` column when present and the first column otherwise. Blank
/// cells are dropped.
pub fn read_postcodes(path: &Path) -> Result<Vec<String>> {
    let df = read_table(path)?;
    let reader = ColumnReader::new(&df);
    let column = if reader.has_column(POSTCODE_COLUMN) {
        POSTCODE_COLUMN.to_string()
    } else {
        df.get_column_names()
            .first()
            .map(ToString::to_string)
            .ok_or_else(|| IngestError::EmptyCsv {
                path: path.to_path_buf(),
            })?
    };
    let postcodes: Vec<String> = reader
        .strings(&column)
        .unwrap_or_default()
        .into_iter()
        .filter(|value| !value.is_empty())
        .collect();
    debug!(path = %path.display(), count = postcodes.len(), "read postcodes");
    Ok(postcodes)
}

/// Assemble a [`TableSet`] from table files, metadata pairs and an optional
/// postcode list.
///
/// `file_format` defaults to `csv` because every table arrives as CSV.
pub fn build_table_set(
    table_files: &[(String, PathBuf)],
    metadata: &[(String, String)],
    postcodes: Option<&Path>,
) -> Result<TableSet> {
    let mut set = TableSet::new();

    for (name, path) in table_files {
        if set.contains(name) {
            return Err(IngestError::DuplicateTable { name: name.clone() });
        }
        if !KNOWN_TABLES.contains(&name.as_str()) {
            warn!(table = %name, "table is not read by any rule");
        }
        set.insert_table(name.clone(), read_table(path)?);
    }

    set.insert_metadata(keys::FILE_FORMAT, "csv");
    for (key, value) in metadata {
        set.insert_metadata(key.clone(), value.clone());
    }

    if let Some(path) = postcodes {
        set.insert_metadata(keys::POSTCODES, read_postcodes(path)?);
    }

    Ok(set)
}
