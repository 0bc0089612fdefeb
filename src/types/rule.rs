use std::fmt;
use std::str::FromStr;

use crate::parse::{ParseError, ALL_OBJECTS, EFFECT_DELIMITER, ID_DELIMITER, VERSION_MARKER};

use super::error::FormatError;

/// When a lifecycle action fires: after a number of days, or at an absolute
/// date given in epoch milliseconds.
///
/// Noncurrent-version effects only accept [`Trigger::Days`], and dates must
/// not be negative. Both are representable so they can be reported, but are
/// rejected by [`format_rule`](crate::format_rule) and by [`Rule::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    Days(u32),
    Date(i64),
}

impl Trigger {
    #[must_use]
    pub fn days(&self) -> Option<u32> {
        match self {
            Trigger::Days(d) => Some(*d),
            Trigger::Date(_) => None,
        }
    }
}

/// Target tier for a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageClass {
    Glacier,
    StandardIa,
}

impl StorageClass {
    /// The storage-API name (`GLACIER`, `STANDARD_IA`).
    #[must_use]
    pub fn api_name(&self) -> &'static str {
        match self {
            StorageClass::Glacier => "GLACIER",
            StorageClass::StandardIa => "STANDARD_IA",
        }
    }

    /// The keyword used in the compact text form (`glacier`, `ia`).
    #[must_use]
    pub fn keyword(&self) -> &'static str {
        match self {
            StorageClass::Glacier => "glacier",
            StorageClass::StandardIa => "ia",
        }
    }
}

impl fmt::Display for StorageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RuleStatus {
    #[default]
    Enabled,
    Disabled,
}

/// A move of matching objects into another storage class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Transition {
    pub trigger: Trigger,
    pub storage_class: StorageClass,
}

/// One lifecycle rule: a prefix and the effects applied to objects under it.
///
/// Rules are usually produced by [`compile`](crate::compile) from the compact
/// text form, or assembled with the builder methods:
///
/// ```
/// use bucketlife::{Rule, StorageClass, Trigger};
///
/// let rule = Rule::new("logs/")
///     .with_id("logs")
///     .abort_multipart_after(1)
///     .expire(Trigger::Days(30))
///     .transition(Trigger::Days(7), StorageClass::StandardIa);
///
/// assert_eq!(
///     rule.to_text().unwrap(),
///     "logs: mpu logs/ 1d, expire logs/ 30d, transition logs/ ia 7d"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Rule {
    pub id: Option<String>,
    /// Object-key prefix; empty applies to every object.
    pub prefix: String,
    pub status: RuleStatus,
    /// Days after initiation before an incomplete multipart upload is aborted.
    pub abort_incomplete_multipart_upload: Option<u32>,
    pub expiration: Option<Trigger>,
    pub noncurrent_version_expiration: Option<Trigger>,
    pub transitions: Vec<Transition>,
    pub noncurrent_version_transitions: Vec<Transition>,
}

impl Rule {
    /// An enabled rule for `prefix` with no id and no effects.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: RuleStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn abort_multipart_after(mut self, days: u32) -> Self {
        self.abort_incomplete_multipart_upload = Some(days);
        self
    }

    #[must_use]
    pub fn expire(mut self, trigger: Trigger) -> Self {
        self.expiration = Some(trigger);
        self
    }

    #[must_use]
    pub fn expire_noncurrent(mut self, days: u32) -> Self {
        self.noncurrent_version_expiration = Some(Trigger::Days(days));
        self
    }

    /// Append a transition. Repeated calls keep every entry in call order.
    #[must_use]
    pub fn transition(mut self, trigger: Trigger, storage_class: StorageClass) -> Self {
        self.transitions.push(Transition {
            trigger,
            storage_class,
        });
        self
    }

    #[must_use]
    pub fn transition_noncurrent(mut self, days: u32, storage_class: StorageClass) -> Self {
        self.noncurrent_version_transitions.push(Transition {
            trigger: Trigger::Days(days),
            storage_class,
        });
        self
    }

    /// The explicit id, treating an empty string as absent.
    #[must_use]
    pub fn explicit_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// Returns `true` if the rule carries no effect at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.abort_incomplete_multipart_upload.is_none()
            && self.expiration.is_none()
            && self.noncurrent_version_expiration.is_none()
            && self.transitions.is_empty()
            && self.noncurrent_version_transitions.is_empty()
    }

    /// Check that the rule can be written in the compact text form and read
    /// back unchanged.
    ///
    /// Noncurrent-version effects must be expressed in days, dates must not
    /// be negative, and at least one effect must be present. The id must not
    /// contain `": "`. The prefix must not be the literal `*`, start with
    /// `version `, contain `": "` or `", "`, or end in `:` or `,`.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError`] naming the first offending part.
    pub fn validate(&self) -> Result<(), FormatError> {
        if matches!(self.noncurrent_version_expiration, Some(Trigger::Date(_))) {
            return Err(FormatError::NoncurrentExpirationDate);
        }
        if let Some(index) = self
            .noncurrent_version_transitions
            .iter()
            .position(|t| matches!(t.trigger, Trigger::Date(_)))
        {
            return Err(FormatError::NoncurrentTransitionDate { index });
        }
        let negative = self
            .expiration
            .iter()
            .chain(self.transitions.iter().map(|t| &t.trigger))
            .find_map(|trigger| match *trigger {
                Trigger::Date(millis) if millis < 0 => Some(millis),
                _ => None,
            });
        if let Some(millis) = negative {
            return Err(FormatError::NegativeDate { millis });
        }
        if self.is_empty() {
            return Err(FormatError::NoEffects);
        }
        if let Some(id) = self.explicit_id().filter(|id| id.contains(ID_DELIMITER)) {
            return Err(FormatError::UnrepresentableId { id: id.to_owned() });
        }
        if !prefix_is_representable(&self.prefix) {
            return Err(FormatError::UnrepresentablePrefix {
                prefix: self.prefix.clone(),
            });
        }
        Ok(())
    }

    /// Render this rule in the compact text form.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError`] if a noncurrent-version effect uses a date.
    pub fn to_text(&self) -> Result<String, FormatError> {
        crate::format::format_rule(self)
    }
}

// The prefix is always followed by a space in the text form, so a trailing
// `:` or `,` turns into a delimiter.
fn prefix_is_representable(prefix: &str) -> bool {
    prefix != ALL_OBJECTS
        && !prefix.starts_with(VERSION_MARKER)
        && !prefix.contains(ID_DELIMITER)
        && !prefix.contains(EFFECT_DELIMITER)
        && !prefix.ends_with(|c| c == ':' || c == ',')
}

impl FromStr for Rule {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parse::compile(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_effects_in_order() {
        let rule = Rule::new("p/")
            .transition(Trigger::Days(30), StorageClass::StandardIa)
            .transition(Trigger::Days(90), StorageClass::Glacier);
        assert_eq!(rule.transitions.len(), 2);
        assert_eq!(rule.transitions[0].storage_class, StorageClass::StandardIa);
        assert_eq!(rule.transitions[1].trigger, Trigger::Days(90));
        assert_eq!(rule.status, RuleStatus::Enabled);
        assert!(rule.id.is_none());
    }

    #[test]
    fn empty_id_is_not_explicit() {
        assert_eq!(Rule::new("p/").with_id("").explicit_id(), None);
        assert_eq!(Rule::new("p/").with_id("a").explicit_id(), Some("a"));
    }

    #[test]
    fn is_empty_tracks_effects() {
        assert!(Rule::new("p/").is_empty());
        assert!(!Rule::new("p/").abort_multipart_after(1).is_empty());
        assert!(!Rule::new("p/")
            .transition_noncurrent(1, StorageClass::Glacier)
            .is_empty());
    }

    #[test]
    fn validate_rejects_noncurrent_dates() {
        let mut rule = Rule::new("p/").expire_noncurrent(3);
        assert!(rule.validate().is_ok());

        rule.noncurrent_version_expiration = Some(Trigger::Date(1_458_432_000_000));
        assert!(matches!(
            rule.validate(),
            Err(FormatError::NoncurrentExpirationDate)
        ));

        let mut rule = Rule::new("p/")
            .transition_noncurrent(1, StorageClass::Glacier)
            .transition_noncurrent(2, StorageClass::Glacier);
        rule.noncurrent_version_transitions[1].trigger = Trigger::Date(0);
        assert!(matches!(
            rule.validate(),
            Err(FormatError::NoncurrentTransitionDate { index: 1 })
        ));
    }

    #[test]
    fn validate_rejects_negative_dates() {
        let rule = Rule::new("p/").abort_multipart_after(1).expire(Trigger::Date(-1));
        assert_eq!(rule.validate(), Err(FormatError::NegativeDate { millis: -1 }));

        let rule = Rule::new("p/")
            .transition(Trigger::Date(0), StorageClass::Glacier)
            .transition(Trigger::Date(-5), StorageClass::Glacier);
        assert_eq!(rule.validate(), Err(FormatError::NegativeDate { millis: -5 }));
    }

    #[test]
    fn validate_rejects_rule_without_effects() {
        assert_eq!(
            Rule::new("p/").with_id("r").validate(),
            Err(FormatError::NoEffects)
        );
    }

    #[test]
    fn validate_rejects_ambiguous_prefixes() {
        for prefix in ["*", "version x/", "a, b/", "a: b/", "logs:", "logs,"] {
            let rule = Rule::new(prefix).expire(Trigger::Days(1));
            assert_eq!(
                rule.validate(),
                Err(FormatError::UnrepresentablePrefix {
                    prefix: prefix.to_owned()
                }),
                "accepted {prefix:?}"
            );
        }
        for prefix in ["", "version", "versions/", "a b/", "a,b:c/"] {
            assert!(Rule::new(prefix).expire(Trigger::Days(1)).validate().is_ok());
        }
    }

    #[test]
    fn validate_rejects_id_with_delimiter() {
        let rule = Rule::new("p/").with_id("a: b").expire(Trigger::Days(1));
        assert_eq!(
            rule.validate(),
            Err(FormatError::UnrepresentableId { id: "a: b".into() })
        );
        assert!(Rule::new("p/").with_id("a, b:").expire(Trigger::Days(1)).validate().is_ok());
    }

    #[test]
    fn current_version_dates_are_valid() {
        let rule = Rule::new("p/")
            .expire(Trigger::Date(1_458_432_000_000))
            .transition(Trigger::Date(0), StorageClass::Glacier);
        assert!(rule.validate().is_ok());
    }

    #[test]
    fn storage_class_names() {
        assert_eq!(StorageClass::Glacier.api_name(), "GLACIER");
        assert_eq!(StorageClass::StandardIa.api_name(), "STANDARD_IA");
        assert_eq!(StorageClass::Glacier.keyword(), "glacier");
        assert_eq!(StorageClass::StandardIa.keyword(), "ia");
        assert_eq!(StorageClass::StandardIa.to_string(), "STANDARD_IA");
    }

    #[test]
    fn trigger_days() {
        assert_eq!(Trigger::Days(4).days(), Some(4));
        assert_eq!(Trigger::Date(4).days(), None);
    }
}
