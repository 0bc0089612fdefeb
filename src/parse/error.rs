use thiserror::Error;

/// Errors produced when compiling a rule from its compact text form.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error(
        "invalid rule string: all effects must share the same prefix \
         (expected '{expected}', found '{found}')"
    )]
    PrefixMismatch { expected: String, found: String },

    #[error("invalid rule string: noncurrent version effects must specify days")]
    NoncurrentDate,

    #[error("invalid rule string: number '{value}' is out of range")]
    NumberOutOfRange { value: String },

    #[error("could not parse rule string")]
    NoEffects,
}
