use crate::fingerprint::fingerprint;
use crate::parse::{ALL_OBJECTS, EFFECT_DELIMITER, ID_DELIMITER};
use crate::{FormatError, Rule, Transition, Trigger};

/// Render a rule in the compact text form.
///
/// Effects are emitted in a fixed order: `mpu`, `expire`, `expire version`,
/// then transitions and noncurrent transitions in list order. Without an
/// explicit id, the id is the [`fingerprint`] of the rendered effect list
/// (not of the full line), so it differs from the id [`compile`](crate::compile)
/// would derive for the same text.
///
/// Only rules that pass [`Rule::validate`] are rendered, so every line this
/// returns compiles back to the same rule.
///
/// # Errors
///
/// Returns [`FormatError`] if the rule fails [`Rule::validate`].
pub fn format_rule(rule: &Rule) -> Result<String, FormatError> {
    let effects = render_effects(rule)?;
    let id = match rule.explicit_id() {
        Some(id) => id.to_owned(),
        None => fingerprint(&effects),
    };
    Ok(format!("{id}{ID_DELIMITER}{effects}"))
}

/// The id a rule is stored under: its explicit id, or the fingerprint the
/// formatter would print for it.
///
/// # Errors
///
/// Returns [`FormatError`] if the id has to be derived and the rule cannot
/// be rendered.
pub fn derive_id(rule: &Rule) -> Result<String, FormatError> {
    match rule.explicit_id() {
        Some(id) => Ok(id.to_owned()),
        None => render_effects(rule).map(|effects| fingerprint(&effects)),
    }
}

fn render_effects(rule: &Rule) -> Result<String, FormatError> {
    rule.validate()?;

    let prefix = if rule.prefix.is_empty() {
        ALL_OBJECTS
    } else {
        rule.prefix.as_str()
    };
    let mut effects = Vec::new();

    if let Some(days) = rule.abort_incomplete_multipart_upload {
        effects.push(format!("mpu {prefix} {days}d"));
    }
    if let Some(trigger) = rule.expiration {
        effects.push(format!("expire {prefix} {}", numeral(trigger)));
    }
    if let Some(trigger) = rule.noncurrent_version_expiration {
        effects.push(format!("expire version {prefix} {}", numeral(trigger)));
    }
    for t in &rule.transitions {
        effects.push(format!("transition {prefix} {}", transition(t)));
    }
    for t in &rule.noncurrent_version_transitions {
        effects.push(format!("transition version {prefix} {}", transition(t)));
    }

    Ok(effects.join(EFFECT_DELIMITER))
}

fn transition(t: &Transition) -> String {
    format!("{} {}", t.storage_class.keyword(), numeral(t.trigger))
}

fn numeral(trigger: Trigger) -> String {
    match trigger {
        Trigger::Days(days) => format!("{days}d"),
        Trigger::Date(millis) => millis.to_string(),
    }
}
