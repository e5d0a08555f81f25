//! Static descriptor of one rule.

use serde::Serialize;

/// Code, message and affected fields of one validation rule.
///
/// `code` is the only identifier the outside world sees. `affected_fields`
/// is documentation for the reports; nothing checks it against the rows a
/// rule actually flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDefinition {
    pub code: String,
    pub message: String,
    pub affected_fields: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_tables: Option<Vec<String>>,
}

impl ErrorDefinition {
    pub fn new<I, S>(code: impl Into<String>, message: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            code: code.into(),
            message: message.into(),
            affected_fields: fields.into_iter().map(Into::into).collect(),
            required_tables: None,
        }
    }

    /// Declare the tables this rule cannot run without.
    #[must_use]
    pub fn with_tables<I, S>(mut self, tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_tables = Some(tables.into_iter().map(Into::into).collect());
        self
    }

    /// Declared tables missing from `available`.
    pub fn missing_tables<'a>(&'a self, available: impl Fn(&str) -> bool) -> Vec<&'a str> {
        self.required_tables
            .iter()
            .flatten()
            .map(String::as_str)
            .filter(|table| !available(table))
            .collect()
    }
}
