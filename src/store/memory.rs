use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use super::{PolicyStore, StoreError};
use crate::Policy;

/// An in-process [`PolicyStore`]. Thread-safe; share it behind `Arc`.
///
/// Buckets must be registered with [`with_bucket`](Self::with_bucket) or
/// [`create_bucket`](Self::create_bucket) before use.
#[derive(Debug, Default)]
pub struct MemoryStore {
    buckets: Mutex<HashMap<String, Option<Policy>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an empty bucket (no policy configured).
    #[must_use]
    pub fn with_bucket(mut self, bucket: &str) -> Self {
        self.buckets
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(bucket.to_owned())
            .or_insert(None);
        self
    }

    /// Register an empty bucket on a shared store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Poisoned`] if another thread panicked while
    /// holding the store lock.
    pub fn create_bucket(&self, bucket: &str) -> Result<(), StoreError> {
        let mut buckets = self.buckets.lock().map_err(|_| StoreError::Poisoned)?;
        buckets.entry(bucket.to_owned()).or_insert(None);
        Ok(())
    }
}

impl PolicyStore for MemoryStore {
    fn read_policy(&self, bucket: &str) -> Result<Option<Policy>, StoreError> {
        let buckets = self.buckets.lock().map_err(|_| StoreError::Poisoned)?;
        buckets.get(bucket).cloned().ok_or_else(|| no_such_bucket(bucket))
    }

    fn write_policy(&self, bucket: &str, policy: &Policy) -> Result<(), StoreError> {
        let mut buckets = self.buckets.lock().map_err(|_| StoreError::Poisoned)?;
        let slot = buckets.get_mut(bucket).ok_or_else(|| no_such_bucket(bucket))?;
        *slot = Some(policy.clone());
        Ok(())
    }

    fn delete_policy(&self, bucket: &str) -> Result<(), StoreError> {
        let mut buckets = self.buckets.lock().map_err(|_| StoreError::Poisoned)?;
        let slot = buckets.get_mut(bucket).ok_or_else(|| no_such_bucket(bucket))?;
        *slot = None;
        Ok(())
    }
}

fn no_such_bucket(bucket: &str) -> StoreError {
    StoreError::NoSuchBucket {
        bucket: bucket.to_owned(),
    }
}
