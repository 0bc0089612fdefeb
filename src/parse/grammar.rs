use winnow::ascii::digit1;
use winnow::combinator::{alt, opt};
use winnow::error::ModalResult;
use winnow::prelude::*;

use crate::StorageClass;

use super::parser::{Effect, EffectToken, Numeral};
use super::VERSION_MARKER;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keyword {
    Mpu,
    Expire,
    Transition,
}

// -- Clause pieces ----------------------------------------------------------

fn keyword(input: &mut &str) -> ModalResult<Keyword> {
    alt((
        "mpu ".value(Keyword::Mpu),
        "expire ".value(Keyword::Expire),
        "transition ".value(Keyword::Transition),
    ))
    .parse_next(input)
}

fn version_marker(input: &mut &str) -> ModalResult<bool> {
    opt(VERSION_MARKER).map(|v| v.is_some()).parse_next(input)
}

fn storage_class(input: &mut &str) -> ModalResult<StorageClass> {
    alt((
        "glacier".value(StorageClass::Glacier),
        "ia".value(StorageClass::StandardIa),
    ))
    .parse_next(input)
}

fn numeral<'i>(input: &mut &'i str) -> ModalResult<Numeral<'i>> {
    (digit1, opt('d'))
        .map(|(digits, unit): (&'i str, Option<char>)| match unit {
            Some(_) => Numeral::Days(digits),
            None => Numeral::Date(digits),
        })
        .parse_next(input)
}

/// Strip a leading `version ` marker. The marker only counts when it is
/// followed by the prefix, so a bare `version` is itself the prefix.
fn split_version(head: &str) -> (bool, &str) {
    let mut rest = head;
    match version_marker.parse_next(&mut rest) {
        Ok(true) => (true, rest),
        _ => (false, head),
    }
}

// -- Effect clauses ---------------------------------------------------------

/// Match one effect clause such as `transition version logs/ ia 30d`.
///
/// The prefix is the greedy middle of the clause: the numeral (and, for
/// transitions, the storage class) are taken from the end, so prefixes may
/// contain single spaces. Returns `None` when the clause fits no pattern.
pub(crate) fn effect_token(token: &str) -> Option<EffectToken<'_>> {
    let mut rest = token;
    let keyword = keyword.parse_next(&mut rest).ok()?;
    let (head, last) = rest.rsplit_once(' ')?;
    let when = numeral.parse(last).ok()?;

    match keyword {
        Keyword::Mpu => match when {
            Numeral::Days(days) => Some(EffectToken {
                prefix: head,
                effect: Effect::AbortMultipart { days },
            }),
            Numeral::Date(_) => None,
        },
        Keyword::Expire => {
            let (noncurrent, prefix) = split_version(head);
            Some(EffectToken {
                prefix,
                effect: Effect::Expire { noncurrent, when },
            })
        }
        Keyword::Transition => {
            let (head, class) = head.rsplit_once(' ')?;
            let storage_class = storage_class.parse(class).ok()?;
            let (noncurrent, prefix) = split_version(head);
            Some(EffectToken {
                prefix,
                effect: Effect::Transition {
                    noncurrent,
                    storage_class,
                    when,
                },
            })
        }
    }
}
