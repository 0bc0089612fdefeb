use log::{debug, info, warn};

use crate::format::derive_id;
use crate::merge::MergeOutcome;
use crate::store::PolicyStore;
use crate::{LifecycleError, Policy, Rule};

/// Rule-level operations on bucket policies held by a [`PolicyStore`].
///
/// `put_rule` and `remove_rule` read the whole policy, apply the change in
/// memory and write the whole policy back. Nothing guards that sequence
/// against other writers: two concurrent updates to one bucket race and the
/// last write wins. Serialize updates per bucket if that matters.
///
/// ```
/// use bucketlife::{LifecycleClient, MemoryStore};
///
/// let client = LifecycleClient::new(MemoryStore::new().with_bucket("media"));
/// client.put_rule_text("media", "raw: expire raw/ 30d").unwrap();
/// client.put_rule_text("media", "archive: transition raw/ glacier 7d").unwrap();
///
/// assert_eq!(
///     client.render_policy("media").unwrap(),
///     vec!["raw: expire raw/ 30d, transition raw/ glacier 7d"]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct LifecycleClient<S> {
    store: S,
}

impl<S: PolicyStore> LifecycleClient<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The bucket's policy as stored, or `None` if none is configured.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Store`] if the read fails.
    pub fn read_policy(&self, bucket: &str) -> Result<Option<Policy>, LifecycleError> {
        Ok(self.store.read_policy(bucket)?)
    }

    /// Replace the bucket's whole policy.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Format`] if a rule fails
    /// [`Rule::validate`], or [`LifecycleError::Store`] if the write fails.
    pub fn put_policy(&self, bucket: &str, policy: &Policy) -> Result<(), LifecycleError> {
        for rule in &policy.rules {
            check_rule(bucket, rule)?;
        }
        self.store.write_policy(bucket, policy)?;
        info!("wrote lifecycle policy with {} rules to {bucket}", policy.len());
        Ok(())
    }

    /// Delete the bucket's whole policy.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Store`] if the delete fails.
    pub fn remove_policy(&self, bucket: &str) -> Result<(), LifecycleError> {
        self.store.delete_policy(bucket)?;
        info!("removed lifecycle policy from {bucket}");
        Ok(())
    }

    /// Add `rule` to the bucket's policy or fold it into a matching rule.
    ///
    /// A rule without an id is given the formatter's fingerprint id first.
    /// See [`merge::upsert`](crate::merge::upsert) for how the rule is merged.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Format`] if the rule is invalid, or
    /// [`LifecycleError::Store`] if reading or writing the policy fails.
    pub fn put_rule(&self, bucket: &str, mut rule: Rule) -> Result<MergeOutcome, LifecycleError> {
        check_rule(bucket, &rule)?;
        if rule.explicit_id().is_none() {
            rule.id = Some(derive_id(&rule)?);
        }

        let mut policy = self.current_policy(bucket)?;
        let id = rule.id.clone();
        let outcome = policy.upsert(rule);
        self.store.write_policy(bucket, &policy)?;
        info!("put lifecycle rule {id:?} on {bucket} ({outcome:?})");
        Ok(outcome)
    }

    /// Compile `text` and [`put_rule`](Self::put_rule) the result.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Parse`] if the text does not compile, or
    /// any error from [`put_rule`](Self::put_rule).
    pub fn put_rule_text(&self, bucket: &str, text: &str) -> Result<MergeOutcome, LifecycleError> {
        let rule = crate::parse::compile(text)?;
        self.put_rule(bucket, rule)
    }

    /// Remove the rule with `id` from the bucket's policy.
    ///
    /// Returns how many rules were removed. When nothing matches, the policy
    /// is left untouched and nothing is written.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Store`] if reading or writing the policy
    /// fails.
    pub fn remove_rule(&self, bucket: &str, id: &str) -> Result<usize, LifecycleError> {
        let mut policy = self.current_policy(bucket)?;
        let removed = policy.remove(id);
        if removed == 0 {
            debug!("rule {id:?} not present on {bucket}; nothing to write");
            return Ok(0);
        }
        self.store.write_policy(bucket, &policy)?;
        info!("removed lifecycle rule {id:?} from {bucket}");
        Ok(removed)
    }

    /// The bucket's rules in compact text form, one line per rule.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError`] if the read fails or a stored rule cannot
    /// be rendered.
    pub fn render_policy(&self, bucket: &str) -> Result<Vec<String>, LifecycleError> {
        Ok(self.current_policy(bucket)?.to_text_lines()?)
    }

    fn current_policy(&self, bucket: &str) -> Result<Policy, LifecycleError> {
        Ok(self.store.read_policy(bucket)?.unwrap_or_default())
    }
}

fn check_rule(bucket: &str, rule: &Rule) -> Result<(), LifecycleError> {
    rule.validate().map_err(|err| {
        warn!("rejecting lifecycle rule {:?} for {bucket}: {err}", rule.id);
        LifecycleError::from(err)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::fingerprint;
    use crate::store::{MemoryStore, StoreError};
    use crate::{FormatError, StorageClass, Trigger};

    fn client() -> LifecycleClient<MemoryStore> {
        LifecycleClient::new(MemoryStore::new().with_bucket("b"))
    }

    #[test]
    fn put_rule_on_absent_policy_creates_it() {
        let client = client();
        let rule = Rule::new("p/").with_id("p").expire(Trigger::Days(1));
        assert_eq!(client.put_rule("b", rule.clone()).unwrap(), MergeOutcome::Appended);
        assert_eq!(
            client.read_policy("b").unwrap(),
            Some(Policy::with_rules(vec![rule]))
        );
    }

    #[test]
    fn put_rule_assigns_derived_id() {
        let client = client();
        client.put_rule("b", Rule::new("p/").expire(Trigger::Days(1))).unwrap();
        let policy = client.read_policy("b").unwrap().unwrap();
        assert_eq!(policy.rules[0].id, Some(fingerprint("expire p/ 1d")));
    }

    #[test]
    fn put_rule_rejects_noncurrent_dates_before_writing() {
        let client = client();
        let mut rule = Rule::new("p/").with_id("p");
        rule.noncurrent_version_expiration = Some(Trigger::Date(1));
        assert!(matches!(
            client.put_rule("b", rule),
            Err(LifecycleError::Format(FormatError::NoncurrentExpirationDate))
        ));
        assert_eq!(client.read_policy("b").unwrap(), None);
    }

    #[test]
    fn put_rule_rejects_negative_dates_before_writing() {
        let client = client();
        let rule = Rule::new("p/")
            .with_id("p")
            .transition(Trigger::Date(-5), StorageClass::Glacier);
        assert!(matches!(
            client.put_rule("b", rule),
            Err(LifecycleError::Format(FormatError::NegativeDate { millis: -5 }))
        ));
        assert_eq!(client.read_policy("b").unwrap(), None);
    }

    #[test]
    fn put_rule_rejects_rule_without_effects() {
        let client = client();
        assert!(matches!(
            client.put_rule("b", Rule::new("p/").with_id("r")),
            Err(LifecycleError::Format(FormatError::NoEffects))
        ));
        assert!(client.render_policy("b").unwrap().is_empty());
    }

    #[test]
    fn put_policy_rejects_unrenderable_rules() {
        let client = client();
        let policy = Policy::with_rules(vec![Rule::new("version x/")
            .with_id("r")
            .expire(Trigger::Days(1))]);
        assert!(matches!(
            client.put_policy("b", &policy),
            Err(LifecycleError::Format(FormatError::UnrepresentablePrefix { .. }))
        ));
        assert_eq!(client.read_policy("b").unwrap(), None);
    }

    #[test]
    fn remove_missing_rule_writes_nothing() {
        let client = client();
        assert_eq!(client.remove_rule("b", "nope").unwrap(), 0);
        assert_eq!(client.read_policy("b").unwrap(), None);
    }

    #[test]
    fn remove_rule_writes_remaining_rules() {
        let client = client();
        client.put_rule_text("b", "a: expire a/ 1d").unwrap();
        client.put_rule_text("b", "c: expire c/ 1d").unwrap();
        assert_eq!(client.remove_rule("b", "a").unwrap(), 1);
        assert_eq!(client.render_policy("b").unwrap(), vec!["c: expire c/ 1d"]);
    }

    #[test]
    fn render_absent_policy_is_empty() {
        assert!(client().render_policy("b").unwrap().is_empty());
    }

    #[test]
    fn store_errors_propagate() {
        let client = client();
        assert!(matches!(
            client.put_rule_text("missing", "a: expire a/ 1d"),
            Err(LifecycleError::Store(StoreError::NoSuchBucket { .. }))
        ));
    }

    #[test]
    fn parse_errors_propagate() {
        assert!(matches!(
            client().put_rule_text("b", "a: expire a/ 1d, expire b/ 1d"),
            Err(LifecycleError::Parse(_))
        ));
    }

    #[test]
    fn remove_policy_clears_everything() {
        let client = client();
        client.put_rule_text("b", "a: expire a/ 1d").unwrap();
        client.remove_policy("b").unwrap();
        assert_eq!(client.read_policy("b").unwrap(), None);
    }
}
