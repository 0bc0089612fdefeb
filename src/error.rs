use thiserror::Error;

use crate::parse::ParseError;
use crate::store::StoreError;
use crate::FormatError;

/// Unified error type covering parsing, formatting, JSON and store access.
///
/// Returned by [`LifecycleClient`](crate::LifecycleClient) operations.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[cfg(feature = "json")]
    #[error(transparent)]
    Json(#[from] crate::json::JsonError),
}
