//! JSON rendering of rules and policies in the storage API's shape.
//!
//! ```text
//! {
//!   "Rules": [
//!     {
//!       "ID": "logs",
//!       "Prefix": "logs/",
//!       "Status": "Enabled",
//!       "AbortIncompleteMultipartUpload": { "DaysAfterInitiation": 1 },
//!       "Expiration": { "Days": 30 },
//!       "NoncurrentVersionExpiration": { "NoncurrentDays": 7 },
//!       "Transitions": [ { "Date": 1458432000000, "StorageClass": "GLACIER" } ],
//!       "NoncurrentVersionTransitions": [ { "NoncurrentDays": 3, "StorageClass": "STANDARD_IA" } ]
//!     }
//!   ]
//! }
//! ```
//!
//! Each trigger object must carry exactly one of its day field and `Date`.
//! Missing `Prefix` means the empty prefix; missing `Status` means `Enabled`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Policy, Rule, RuleStatus, StorageClass, Transition, Trigger};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when reading a rule or policy from JSON.
#[derive(Debug, Error)]
pub enum JsonError {
    #[error("invalid lifecycle JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{field} must specify either days or a date, not both")]
    AmbiguousTrigger { field: &'static str },

    #[error("{field} must specify days or a date")]
    MissingTrigger { field: &'static str },
}

// ---------------------------------------------------------------------------
// Serialized type hierarchy
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SerializedPolicy {
    #[serde(default)]
    rules: Vec<SerializedRule>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SerializedRule {
    #[serde(rename = "ID", default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default)]
    prefix: String,
    #[serde(default)]
    status: SerializedStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    abort_incomplete_multipart_upload: Option<SerializedAbort>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expiration: Option<SerializedTrigger>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    noncurrent_version_expiration: Option<SerializedNoncurrentTrigger>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    transitions: Vec<SerializedTransition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    noncurrent_version_transitions: Vec<SerializedNoncurrentTransition>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
enum SerializedStatus {
    #[default]
    Enabled,
    Disabled,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SerializedAbort {
    days_after_initiation: u32,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SerializedTrigger {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date: Option<i64>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SerializedNoncurrentTrigger {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    noncurrent_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SerializedTransition {
    #[serde(flatten)]
    trigger: SerializedTrigger,
    storage_class: SerializedStorageClass,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SerializedNoncurrentTransition {
    #[serde(flatten)]
    trigger: SerializedNoncurrentTrigger,
    storage_class: SerializedStorageClass,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
enum SerializedStorageClass {
    #[serde(rename = "GLACIER")]
    Glacier,
    #[serde(rename = "STANDARD_IA")]
    StandardIa,
}

// ---------------------------------------------------------------------------
// Trigger conversion
// ---------------------------------------------------------------------------

fn encode_trigger(trigger: Trigger) -> SerializedTrigger {
    match trigger {
        Trigger::Days(d) => SerializedTrigger {
            days: Some(d),
            date: None,
        },
        Trigger::Date(ms) => SerializedTrigger {
            days: None,
            date: Some(ms),
        },
    }
}

fn encode_noncurrent_trigger(trigger: Trigger) -> SerializedNoncurrentTrigger {
    match trigger {
        Trigger::Days(d) => SerializedNoncurrentTrigger {
            noncurrent_days: Some(d),
            date: None,
        },
        Trigger::Date(ms) => SerializedNoncurrentTrigger {
            noncurrent_days: None,
            date: Some(ms),
        },
    }
}

fn decode_trigger(
    days: Option<u32>,
    date: Option<i64>,
    field: &'static str,
) -> Result<Trigger, JsonError> {
    match (days, date) {
        (Some(d), None) => Ok(Trigger::Days(d)),
        (None, Some(ms)) => Ok(Trigger::Date(ms)),
        (Some(_), Some(_)) => Err(JsonError::AmbiguousTrigger { field }),
        (None, None) => Err(JsonError::MissingTrigger { field }),
    }
}

// ---------------------------------------------------------------------------
// Enum conversion
// ---------------------------------------------------------------------------

fn encode_class(class: StorageClass) -> SerializedStorageClass {
    match class {
        StorageClass::Glacier => SerializedStorageClass::Glacier,
        StorageClass::StandardIa => SerializedStorageClass::StandardIa,
    }
}

fn decode_class(class: SerializedStorageClass) -> StorageClass {
    match class {
        SerializedStorageClass::Glacier => StorageClass::Glacier,
        SerializedStorageClass::StandardIa => StorageClass::StandardIa,
    }
}

fn encode_status(status: RuleStatus) -> SerializedStatus {
    match status {
        RuleStatus::Enabled => SerializedStatus::Enabled,
        RuleStatus::Disabled => SerializedStatus::Disabled,
    }
}

fn decode_status(status: SerializedStatus) -> RuleStatus {
    match status {
        SerializedStatus::Enabled => RuleStatus::Enabled,
        SerializedStatus::Disabled => RuleStatus::Disabled,
    }
}

// ---------------------------------------------------------------------------
// Rule conversion
// ---------------------------------------------------------------------------

fn encode_rule(rule: &Rule) -> SerializedRule {
    SerializedRule {
        id: rule.id.clone(),
        prefix: rule.prefix.clone(),
        status: encode_status(rule.status),
        abort_incomplete_multipart_upload: rule
            .abort_incomplete_multipart_upload
            .map(|days| SerializedAbort {
                days_after_initiation: days,
            }),
        expiration: rule.expiration.map(encode_trigger),
        noncurrent_version_expiration: rule
            .noncurrent_version_expiration
            .map(encode_noncurrent_trigger),
        transitions: rule
            .transitions
            .iter()
            .map(|t| SerializedTransition {
                trigger: encode_trigger(t.trigger),
                storage_class: encode_class(t.storage_class),
            })
            .collect(),
        noncurrent_version_transitions: rule
            .noncurrent_version_transitions
            .iter()
            .map(|t| SerializedNoncurrentTransition {
                trigger: encode_noncurrent_trigger(t.trigger),
                storage_class: encode_class(t.storage_class),
            })
            .collect(),
    }
}

fn decode_rule(rule: SerializedRule) -> Result<Rule, JsonError> {
    let expiration = rule
        .expiration
        .map(|t| decode_trigger(t.days, t.date, "Expiration"))
        .transpose()?;
    let noncurrent_version_expiration = rule
        .noncurrent_version_expiration
        .map(|t| decode_trigger(t.noncurrent_days, t.date, "NoncurrentVersionExpiration"))
        .transpose()?;
    let transitions = rule
        .transitions
        .into_iter()
        .map(|t| {
            Ok(Transition {
                trigger: decode_trigger(t.trigger.days, t.trigger.date, "Transitions")?,
                storage_class: decode_class(t.storage_class),
            })
        })
        .collect::<Result<Vec<_>, JsonError>>()?;
    let noncurrent_version_transitions = rule
        .noncurrent_version_transitions
        .into_iter()
        .map(|t| {
            Ok(Transition {
                trigger: decode_trigger(
                    t.trigger.noncurrent_days,
                    t.trigger.date,
                    "NoncurrentVersionTransitions",
                )?,
                storage_class: decode_class(t.storage_class),
            })
        })
        .collect::<Result<Vec<_>, JsonError>>()?;

    Ok(Rule {
        id: rule.id,
        prefix: rule.prefix,
        status: decode_status(rule.status),
        abort_incomplete_multipart_upload: rule
            .abort_incomplete_multipart_upload
            .map(|a| a.days_after_initiation),
        expiration,
        noncurrent_version_expiration,
        transitions,
        noncurrent_version_transitions,
    })
}

fn encode_policy(policy: &Policy) -> SerializedPolicy {
    SerializedPolicy {
        rules: policy.rules.iter().map(encode_rule).collect(),
    }
}

fn decode_policy(policy: SerializedPolicy) -> Result<Policy, JsonError> {
    policy
        .rules
        .into_iter()
        .map(decode_rule)
        .collect::<Result<Vec<_>, _>>()
        .map(Policy::with_rules)
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

impl Rule {
    /// Read a single rule from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`JsonError`] if the JSON is malformed or a trigger object
    /// carries both or neither of its fields.
    pub fn from_json(input: &str) -> Result<Self, JsonError> {
        let rule: SerializedRule = serde_json::from_str(input)?;
        decode_rule(rule)
    }

    /// Render this rule as compact JSON.
    ///
    /// # Errors
    ///
    /// Returns [`JsonError`] if serialization fails.
    pub fn to_json(&self) -> Result<String, JsonError> {
        Ok(serde_json::to_string(&encode_rule(self))?)
    }
}

impl Policy {
    /// Read a policy (`{ "Rules": [...] }`) from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`JsonError`] if the JSON is malformed or any rule is invalid.
    pub fn from_json(input: &str) -> Result<Self, JsonError> {
        let policy: SerializedPolicy = serde_json::from_str(input)?;
        decode_policy(policy)
    }

    /// Render this policy as indented JSON.
    ///
    /// # Errors
    ///
    /// Returns [`JsonError`] if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, JsonError> {
        Ok(serde_json::to_string_pretty(&encode_policy(self))?)
    }
}
