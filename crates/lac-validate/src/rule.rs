//! The rule contract.

use std::fmt;

use lac_model::{ErrorDefinition, RuleResult, TableSet};

/// A pure check over a table set.
///
/// Implementations must not mutate shared state; any coercion (date parsing,
/// case folding) happens on rule-local copies. A rule whose tables are absent
/// returns empty locations. `RuleError::MissingMetadata` and
/// `RuleError::Unhandled` are for the orchestrator to catch, not for the rule
/// to recover from.
pub trait Rule: Send + Sync {
    fn evaluate(&self, tables: &TableSet) -> RuleResult;
}

impl<F> Rule for F
where
    F: Fn(&TableSet) -> RuleResult + Send + Sync,
{
    fn evaluate(&self, tables: &TableSet) -> RuleResult {
        self(tables)
    }
}

/// One registry entry: the definition and the rule that implements it.
pub struct RuleEntry {
    definition: ErrorDefinition,
    rule: Box<dyn Rule>,
}

impl RuleEntry {
    pub fn new(definition: ErrorDefinition, rule: impl Rule + 'static) -> Self {
        Self {
            definition,
            rule: Box::new(rule),
        }
    }

    pub fn code(&self) -> &str {
        &self.definition.code
    }

    pub fn definition(&self) -> &ErrorDefinition {
        &self.definition
    }

    /// Evaluate the rule directly, without the orchestrator's fault boundary.
    pub fn evaluate(&self, tables: &TableSet) -> RuleResult {
        self.rule.evaluate(tables)
    }
}

impl fmt::Debug for RuleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleEntry")
            .field("definition", &self.definition)
            .finish_non_exhaustive()
    }
}
