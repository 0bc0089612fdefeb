//! The storage service seam: read, write and delete a bucket's whole policy.

#[cfg(feature = "json")]
mod file;
mod memory;

use std::sync::Arc;

use thiserror::Error;

use crate::Policy;

#[cfg(feature = "json")]
pub use file::FileStore;
pub use memory::MemoryStore;

/// Errors reported by a [`PolicyStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("bucket '{bucket}' does not exist")]
    NoSuchBucket { bucket: String },

    #[error("'{bucket}' is not a valid bucket name")]
    InvalidBucket { bucket: String },

    #[error("I/O error in policy store: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "json")]
    #[error("stored policy for bucket '{bucket}' is corrupt: {source}")]
    Corrupt {
        bucket: String,
        #[source]
        source: crate::json::JsonError,
    },

    #[error("policy store lock poisoned")]
    Poisoned,
}

/// Whole-policy access to a storage service.
///
/// Writes always replace the full policy; there is no partial update.
/// Implementations are not expected to guard against concurrent writers.
pub trait PolicyStore {
    /// Fetch the bucket's policy, or `None` if no policy is configured.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the bucket is unknown or the read fails.
    fn read_policy(&self, bucket: &str) -> Result<Option<Policy>, StoreError>;

    /// Replace the bucket's policy with `policy`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the bucket is unknown or the write fails.
    fn write_policy(&self, bucket: &str, policy: &Policy) -> Result<(), StoreError>;

    /// Remove the bucket's policy. Deleting a missing policy succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the bucket is unknown or the delete fails.
    fn delete_policy(&self, bucket: &str) -> Result<(), StoreError>;
}

impl<T: PolicyStore + ?Sized> PolicyStore for &T {
    fn read_policy(&self, bucket: &str) -> Result<Option<Policy>, StoreError> {
        (**self).read_policy(bucket)
    }

    fn write_policy(&self, bucket: &str, policy: &Policy) -> Result<(), StoreError> {
        (**self).write_policy(bucket, policy)
    }

    fn delete_policy(&self, bucket: &str) -> Result<(), StoreError> {
        (**self).delete_policy(bucket)
    }
}

impl<T: PolicyStore + ?Sized> PolicyStore for Arc<T> {
    fn read_policy(&self, bucket: &str) -> Result<Option<Policy>, StoreError> {
        (**self).read_policy(bucket)
    }

    fn write_policy(&self, bucket: &str, policy: &Policy) -> Result<(), StoreError> {
        (**self).write_policy(bucket, policy)
    }

    fn delete_policy(&self, bucket: &str) -> Result<(), StoreError> {
        (**self).delete_policy(bucket)
    }
}
