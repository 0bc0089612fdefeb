//! Folding a single rule change into a full policy.
//!
//! Both operations work on an in-memory [`Policy`]; reading it from and
//! writing it back to a store is the caller's job (see
//! [`LifecycleClient`](crate::LifecycleClient)).

use log::debug;

use crate::{Policy, Rule};

/// Which branch of [`upsert`] was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// A rule with the same id was replaced wholesale.
    Replaced,
    /// The incoming effects were merged into a rule with the same prefix.
    Merged,
    /// The rule was appended to the end of the policy.
    Appended,
}

/// Add or update `rule` in `policy`.
///
/// 1. The first rule with the same explicit id is replaced by `rule`.
/// 2. Otherwise the first rule with the same prefix absorbs `rule`: its
///    abort-multipart, expiration and noncurrent expiration are overwritten
///    when `rule` sets them, and `rule`'s transitions are appended to its
///    lists. The existing rule keeps its id and status.
/// 3. Otherwise `rule` is appended.
///
/// Transitions are not de-duplicated, so repeating the same prefix upsert
/// grows the transition lists every time.
pub fn upsert(policy: &mut Policy, rule: Rule) -> MergeOutcome {
    if let Some(id) = rule.explicit_id() {
        if let Some(pos) = policy
            .rules
            .iter()
            .position(|r| r.explicit_id() == Some(id))
        {
            debug!("replacing lifecycle rule {id:?} at position {pos}");
            policy.rules[pos] = rule;
            return MergeOutcome::Replaced;
        }
    }

    if let Some(existing) = policy.rules.iter_mut().find(|r| r.prefix == rule.prefix) {
        debug!(
            "merging rule {:?} into rule {:?} on prefix {:?}",
            rule.id, existing.id, existing.prefix
        );
        merge_into(existing, rule);
        return MergeOutcome::Merged;
    }

    debug!("appending lifecycle rule {:?}", rule.id);
    policy.rules.push(rule);
    MergeOutcome::Appended
}

/// Remove every rule whose id is `id`, keeping the others in order.
///
/// Returns the number of rules removed; zero is not an error.
pub fn remove(policy: &mut Policy, id: &str) -> usize {
    let before = policy.rules.len();
    policy.rules.retain(|r| r.id.as_deref() != Some(id));
    let removed = before - policy.rules.len();
    if removed == 0 {
        debug!("no lifecycle rule with id {id:?} to remove");
    }
    removed
}

fn merge_into(existing: &mut Rule, incoming: Rule) {
    if incoming.abort_incomplete_multipart_upload.is_some() {
        existing.abort_incomplete_multipart_upload = incoming.abort_incomplete_multipart_upload;
    }
    if incoming.expiration.is_some() {
        existing.expiration = incoming.expiration;
    }
    if incoming.noncurrent_version_expiration.is_some() {
        existing.noncurrent_version_expiration = incoming.noncurrent_version_expiration;
    }
    existing.transitions.extend(incoming.transitions);
    existing
        .noncurrent_version_transitions
        .extend(incoming.noncurrent_version_transitions);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{StorageClass, Trigger};

    fn policy() -> Policy {
        Policy::with_rules(vec![
            Rule::new("a/").with_id("a").expire(Trigger::Days(1)),
            Rule::new("b/").with_id("b").expire(Trigger::Days(2)),
        ])
    }

    #[test]
    fn same_id_replaces_in_place() {
        let mut p = policy();
        let incoming = Rule::new("z/").with_id("a").abort_multipart_after(3);
        assert_eq!(upsert(&mut p, incoming.clone()), MergeOutcome::Replaced);
        assert_eq!(p.rules[0], incoming);
        assert_eq!(p.rules.len(), 2);
    }

    #[test]
    fn id_match_wins_over_earlier_prefix_match() {
        let mut p = policy();
        let incoming = Rule::new("a/").with_id("b").expire(Trigger::Days(9));
        assert_eq!(upsert(&mut p, incoming.clone()), MergeOutcome::Replaced);
        assert_eq!(p.rules[0].expiration, Some(Trigger::Days(1)));
        assert_eq!(p.rules[1], incoming);
    }

    #[test]
    fn same_prefix_merges_and_keeps_id() {
        let mut p = policy();
        let incoming = Rule::new("b/")
            .with_id("other")
            .abort_multipart_after(1)
            .transition(Trigger::Days(30), StorageClass::Glacier);
        assert_eq!(upsert(&mut p, incoming), MergeOutcome::Merged);

        let merged = &p.rules[1];
        assert_eq!(merged.id.as_deref(), Some("b"));
        assert_eq!(merged.expiration, Some(Trigger::Days(2)));
        assert_eq!(merged.abort_incomplete_multipart_upload, Some(1));
        assert_eq!(merged.transitions.len(), 1);
    }

    #[test]
    fn merge_without_incoming_effect_keeps_existing() {
        let mut existing = Rule::new("p/").with_id("p").expire_noncurrent(4);
        merge_into(&mut existing, Rule::new("p/").expire(Trigger::Days(8)));
        assert_eq!(existing.noncurrent_version_expiration, Some(Trigger::Days(4)));
        assert_eq!(existing.expiration, Some(Trigger::Days(8)));
    }

    #[test]
    fn unknown_rule_is_appended() {
        let mut p = policy();
        let incoming = Rule::new("c/").with_id("c").expire(Trigger::Days(3));
        assert_eq!(upsert(&mut p, incoming.clone()), MergeOutcome::Appended);
        assert_eq!(p.rules.last(), Some(&incoming));
    }

    #[test]
    fn rule_without_id_never_matches_by_id() {
        let mut p = Policy::with_rules(vec![Rule::new("a/").expire(Trigger::Days(1))]);
        let outcome = upsert(&mut p, Rule::new("b/").expire(Trigger::Days(2)));
        assert_eq!(outcome, MergeOutcome::Appended);
    }

    #[test]
    fn repeated_prefix_upserts_accumulate_transitions() {
        let mut p = policy();
        let incoming =
            Rule::new("a/").transition_noncurrent(10, StorageClass::StandardIa);
        upsert(&mut p, incoming.clone());
        upsert(&mut p, incoming);
        assert_eq!(p.rules[0].noncurrent_version_transitions.len(), 2);
    }

    #[test]
    fn remove_preserves_order() {
        let mut p = policy();
        p.rules.push(Rule::new("c/").with_id("c").expire(Trigger::Days(3)));
        assert_eq!(remove(&mut p, "b"), 1);
        let ids: Vec<_> = p.rules.iter().filter_map(|r| r.id.as_deref()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn remove_missing_is_noop() {
        let mut p = policy();
        assert_eq!(remove(&mut p, "nonexistent"), 0);
        assert_eq!(p, policy());
    }
}
