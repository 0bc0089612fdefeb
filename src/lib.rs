mod client;
mod error;
mod fingerprint;
mod format;
#[cfg(feature = "json")]
mod json;
pub mod merge;
pub mod parse;
pub mod store;
mod types;

pub use client::LifecycleClient;
pub use error::LifecycleError;
pub use fingerprint::fingerprint;
pub use format::{derive_id, format_rule};
#[cfg(feature = "json")]
pub use json::JsonError;
pub use merge::MergeOutcome;
pub use parse::{compile, ParseError};
#[cfg(feature = "json")]
pub use store::FileStore;
pub use store::{MemoryStore, PolicyStore, StoreError};
pub use types::{FormatError, Policy, Rule, RuleStatus, StorageClass, Transition, Trigger};
