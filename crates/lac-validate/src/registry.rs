//! Versioned rule catalog.

use std::collections::{BTreeSet, HashMap};

use lac_model::ErrorDefinition;

use crate::error::RegistryError;
use crate::rule::RuleEntry;

/// Ordered, code-unique set of rules for one rule-set version.
///
/// Immutable once built. Entry order is the order outcomes are reported in.
#[derive(Debug)]
pub struct Registry {
    version: String,
    entries: Vec<RuleEntry>,
    index: HashMap<String, usize>,
}

impl Registry {
    /// Build a registry, rejecting empty or duplicate codes.
    pub fn new(version: impl Into<String>, entries: Vec<RuleEntry>) -> Result<Self, RegistryError> {
        let version = version.into();
        let mut index = HashMap::with_capacity(entries.len());

        for (position, entry) in entries.iter().enumerate() {
            let code = entry.code();
            if code.trim().is_empty() {
                return Err(RegistryError::EmptyCode { position, version });
            }
            if index.insert(code.to_string(), position).is_some() {
                return Err(RegistryError::DuplicateCode {
                    code: code.to_string(),
                    version,
                });
            }
        }

        tracing::debug!(version = %version, rules = entries.len(), "built rule registry");
        Ok(Self {
            version,
            entries,
            index,
        })
    }

    /// Rule-set version tag, e.g. `lac2022_23`.
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by code.
    pub fn get(&self, code: &str) -> Option<&RuleEntry> {
        self.index.get(code).map(|&position| &self.entries[position])
    }

    pub fn definition(&self, code: &str) -> Option<&ErrorDefinition> {
        self.get(code).map(RuleEntry::definition)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.index.contains_key(code)
    }

    /// Position of a code in registry order.
    pub fn position(&self, code: &str) -> Option<usize> {
        self.index.get(code).copied()
    }

    /// Iterate over entries in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &RuleEntry> {
        self.entries.iter()
    }

    /// Codes in registry order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(RuleEntry::code)
    }

    /// Selected codes that name no rule in this registry.
    pub fn unknown_codes<'a>(&self, selection: &'a BTreeSet<String>) -> Vec<&'a str> {
        selection
            .iter()
            .map(String::as_str)
            .filter(|code| !self.contains(code))
            .collect()
    }

    pub(crate) fn entries(&self) -> &[RuleEntry] {
        &self.entries
    }
}
