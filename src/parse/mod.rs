mod error;
mod grammar;
mod parser;

use log::debug;

pub use error::ParseError;

use crate::fingerprint::fingerprint;
use crate::{Rule, RuleStatus, Transition, Trigger};

use self::parser::{Effect, Numeral};

/// Separates an explicit id from the effect list.
pub(crate) const ID_DELIMITER: &str = ": ";
/// Separates effect clauses.
pub(crate) const EFFECT_DELIMITER: &str = ", ";
/// Text spelling of the empty prefix.
pub(crate) const ALL_OBJECTS: &str = "*";
/// Marks an effect on noncurrent object versions.
pub(crate) const VERSION_MARKER: &str = "version ";

/// Compile a rule from its compact text form.
///
/// ```
/// use bucketlife::{compile, StorageClass, Trigger};
///
/// let rule = compile("logs: expire logs/ 30d, transition logs/ glacier 7d").unwrap();
/// assert_eq!(rule.id.as_deref(), Some("logs"));
/// assert_eq!(rule.prefix, "logs/");
/// assert_eq!(rule.expiration, Some(Trigger::Days(30)));
/// assert_eq!(rule.transitions[0].storage_class, StorageClass::Glacier);
/// ```
///
/// Without an explicit `id: ` the id is the [`fingerprint`] of the whole
/// input. Clauses that match no effect pattern are skipped.
///
/// # Errors
///
/// Returns [`ParseError`] if clauses disagree on the prefix, a noncurrent
/// effect uses a date, a number does not fit, or no clause matched.
pub fn compile(text: &str) -> Result<Rule, ParseError> {
    let segments: Vec<&str> = text.split(ID_DELIMITER).collect();
    let (id, body) = match segments.as_slice() {
        [id, body] => ((*id).to_owned(), *body),
        _ => (fingerprint(text), text),
    };

    let mut rule = Rule {
        id: Some(id),
        status: RuleStatus::Enabled,
        ..Rule::default()
    };
    let mut prefix: Option<&str> = None;

    for clause in body.split(EFFECT_DELIMITER) {
        let Some(token) = grammar::effect_token(clause) else {
            debug!("skipping unrecognized effect clause {clause:?}");
            continue;
        };

        match prefix {
            None => prefix = Some(token.prefix),
            Some(expected) if expected != token.prefix => {
                return Err(ParseError::PrefixMismatch {
                    expected: expected.to_owned(),
                    found: token.prefix.to_owned(),
                });
            }
            Some(_) => {}
        }

        apply_effect(&mut rule, token.effect)?;
    }

    let prefix = prefix.ok_or(ParseError::NoEffects)?;
    rule.prefix = if prefix == ALL_OBJECTS {
        String::new()
    } else {
        prefix.to_owned()
    };
    Ok(rule)
}

fn apply_effect(rule: &mut Rule, effect: Effect<'_>) -> Result<(), ParseError> {
    match effect {
        Effect::AbortMultipart { days } => {
            rule.abort_incomplete_multipart_upload = Some(parse_days(days)?);
        }
        Effect::Expire {
            noncurrent: false,
            when,
        } => {
            rule.expiration = Some(trigger(when)?);
        }
        Effect::Expire {
            noncurrent: true,
            when,
        } => {
            rule.noncurrent_version_expiration = Some(noncurrent_trigger(when)?);
        }
        Effect::Transition {
            noncurrent: false,
            storage_class,
            when,
        } => {
            rule.transitions.push(Transition {
                trigger: trigger(when)?,
                storage_class,
            });
        }
        Effect::Transition {
            noncurrent: true,
            storage_class,
            when,
        } => {
            rule.noncurrent_version_transitions.push(Transition {
                trigger: noncurrent_trigger(when)?,
                storage_class,
            });
        }
    }
    Ok(())
}

fn trigger(when: Numeral<'_>) -> Result<Trigger, ParseError> {
    match when {
        Numeral::Days(days) => parse_days(days).map(Trigger::Days),
        Numeral::Date(millis) => millis
            .parse::<i64>()
            .map(Trigger::Date)
            .map_err(|_| out_of_range(millis)),
    }
}

fn noncurrent_trigger(when: Numeral<'_>) -> Result<Trigger, ParseError> {
    match when {
        Numeral::Days(days) => parse_days(days).map(Trigger::Days),
        Numeral::Date(_) => Err(ParseError::NoncurrentDate),
    }
}

fn parse_days(digits: &str) -> Result<u32, ParseError> {
    digits.parse::<u32>().map_err(|_| out_of_range(digits))
}

fn out_of_range(digits: &str) -> ParseError {
    ParseError::NumberOutOfRange {
        value: digits.to_owned(),
    }
}
