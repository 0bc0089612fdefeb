use crate::StorageClass;

/// A numeral as written: digits with a `d` suffix are a day count, bare
/// digits are an epoch-millisecond date. Conversion happens at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Numeral<'i> {
    Days(&'i str),
    Date(&'i str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Effect<'i> {
    AbortMultipart {
        days: &'i str,
    },
    Expire {
        noncurrent: bool,
        when: Numeral<'i>,
    },
    Transition {
        noncurrent: bool,
        storage_class: StorageClass,
        when: Numeral<'i>,
    },
}

/// One effect clause with its raw prefix token (`*` not yet normalized).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EffectToken<'i> {
    pub prefix: &'i str,
    pub effect: Effect<'i>,
}
