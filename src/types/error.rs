use thiserror::Error;

/// Errors produced when a [`Rule`](crate::Rule) cannot be rendered in the
/// compact text form.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("noncurrent version expiration must specify days, not a date")]
    NoncurrentExpirationDate,

    #[error("noncurrent version transition {index} must specify days, not a date")]
    NoncurrentTransitionDate { index: usize },

    #[error("date {millis} is before the epoch; the text form has no sign")]
    NegativeDate { millis: i64 },

    #[error("rule has no effects")]
    NoEffects,

    #[error("rule id '{id}' contains the id delimiter ': '")]
    UnrepresentableId { id: String },

    #[error("prefix '{prefix}' would read back as a different rule")]
    UnrepresentablePrefix { prefix: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noncurrent_expiration_message() {
        assert_eq!(
            FormatError::NoncurrentExpirationDate.to_string(),
            "noncurrent version expiration must specify days, not a date"
        );
    }

    #[test]
    fn noncurrent_transition_message() {
        let err = FormatError::NoncurrentTransitionDate { index: 2 };
        assert_eq!(
            err.to_string(),
            "noncurrent version transition 2 must specify days, not a date"
        );
    }

    #[test]
    fn negative_date_message() {
        let err = FormatError::NegativeDate { millis: -5 };
        assert_eq!(
            err.to_string(),
            "date -5 is before the epoch; the text form has no sign"
        );
    }

    #[test]
    fn unrepresentable_prefix_message() {
        let err = FormatError::UnrepresentablePrefix {
            prefix: "version x/".into(),
        };
        assert_eq!(
            err.to_string(),
            "prefix 'version x/' would read back as a different rule"
        );
    }
}
