use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::debug;

use super::{PolicyStore, StoreError};
use crate::Policy;

const POLICY_FILE: &str = "lifecycle.json";
const POLICY_TMP_FILE: &str = ".lifecycle.json.tmp";

/// A [`PolicyStore`] backed by a directory tree.
///
/// Each bucket is a subdirectory of the root; its policy is kept as JSON in
/// `<root>/<bucket>/lifecycle.json`. A bucket without that file has no policy.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the directory for `bucket` if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the name is invalid or the directory
    /// cannot be created.
    pub fn create_bucket(&self, bucket: &str) -> Result<(), StoreError> {
        check_bucket_name(bucket)?;
        fs::create_dir_all(self.root.join(bucket))?;
        Ok(())
    }

    fn bucket_dir(&self, bucket: &str) -> Result<PathBuf, StoreError> {
        check_bucket_name(bucket)?;
        let dir = self.root.join(bucket);
        if dir.is_dir() {
            Ok(dir)
        } else {
            Err(StoreError::NoSuchBucket {
                bucket: bucket.to_owned(),
            })
        }
    }
}

fn check_bucket_name(bucket: &str) -> Result<(), StoreError> {
    if bucket.is_empty() || bucket == "." || bucket == ".." || bucket.contains(['/', '\\']) {
        return Err(StoreError::InvalidBucket {
            bucket: bucket.to_owned(),
        });
    }
    Ok(())
}

impl PolicyStore for FileStore {
    fn read_policy(&self, bucket: &str) -> Result<Option<Policy>, StoreError> {
        let path = self.bucket_dir(bucket)?.join(POLICY_FILE);
        match fs::read_to_string(&path) {
            Ok(text) => Policy::from_json(&text)
                .map(Some)
                .map_err(|source| StoreError::Corrupt {
                    bucket: bucket.to_owned(),
                    source,
                }),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write_policy(&self, bucket: &str, policy: &Policy) -> Result<(), StoreError> {
        let dir = self.bucket_dir(bucket)?;
        let text = policy
            .to_json_pretty()
            .map_err(|source| StoreError::Corrupt {
                bucket: bucket.to_owned(),
                source,
            })?;
        let tmp = dir.join(POLICY_TMP_FILE);
        fs::write(&tmp, text)?;
        fs::rename(&tmp, dir.join(POLICY_FILE))?;
        debug!("wrote {} rules to {}", policy.len(), dir.display());
        Ok(())
    }

    fn delete_policy(&self, bucket: &str) -> Result<(), StoreError> {
        let path = self.bucket_dir(bucket)?.join(POLICY_FILE);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
