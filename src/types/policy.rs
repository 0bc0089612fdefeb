use std::fmt;

use super::error::FormatError;
use super::rule::Rule;
use crate::merge::MergeOutcome;

/// The ordered set of lifecycle rules attached to a bucket.
///
/// Rule order is whatever the store returned or the merge engine produced;
/// it is never sorted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Policy {
    pub rules: Vec<Rule>,
}

impl Policy {
    /// An empty policy, the stand-in for "no policy configured".
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_rules(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Fold `rule` into this policy. See [`merge::upsert`](crate::merge::upsert).
    pub fn upsert(&mut self, rule: Rule) -> MergeOutcome {
        crate::merge::upsert(self, rule)
    }

    /// Drop every rule whose id is `id`, returning how many were removed.
    pub fn remove(&mut self, id: &str) -> usize {
        crate::merge::remove(self, id)
    }

    /// Look up a rule by explicit id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id.as_deref() == Some(id))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Render every rule in the compact text form, in policy order.
    ///
    /// # Errors
    ///
    /// Returns the first [`FormatError`] encountered.
    pub fn to_text_lines(&self) -> Result<Vec<String>, FormatError> {
        self.rules.iter().map(Rule::to_text).collect()
    }
}

impl From<Vec<Rule>> for Policy {
    fn from(rules: Vec<Rule>) -> Self {
        Self::with_rules(rules)
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Policy({} rules)", self.rules.len())
    }
}
