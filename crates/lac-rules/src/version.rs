//! Reporting-year rule sets.

use std::fmt;
use std::str::FromStr;

use lac_validate::{Registry, RegistryError};

use crate::catalog;
use crate::error::RulesError;

/// A reporting year with its own rule catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RuleSetVersion {
    #[default]
    Lac2022_23,
    Lac2024_25,
}

impl RuleSetVersion {
    pub const ALL: [Self; 2] = [Self::Lac2022_23, Self::Lac2024_25];

    /// Canonical tag, e.g. `lac2022_23`.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Lac2022_23 => "lac2022_23",
            Self::Lac2024_25 => "lac2024_25",
        }
    }

    /// Build a fresh registry for this year.
    pub fn registry(self) -> Result<Registry, RegistryError> {
        Registry::new(self.tag(), catalog::entries(self))
    }
}

impl fmt::Display for RuleSetVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for RuleSetVersion {
    type Err = RulesError;

    /// Accepts the canonical tag and the `lac_2022_23` spelling.
    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        let normalized = tag.trim().to_ascii_lowercase().replacen("lac_", "lac", 1);
        Self::ALL
            .into_iter()
            .find(|version| version.tag() == normalized)
            .ok_or_else(|| RulesError::UnknownVersion {
                tag: tag.to_string(),
                known: Self::ALL.map(Self::tag).join(", "),
            })
    }
}

/// Resolve a year tag to its registry.
pub fn load_registry(tag: &str) -> Result<Registry, RulesError> {
    let version: RuleSetVersion = tag.parse()?;
    let registry = version.registry()?;
    tracing::info!(version = %version, rules = registry.len(), "loaded rule set");
    Ok(registry)
}
