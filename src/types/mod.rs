mod error;
mod policy;
mod rule;

pub use error::FormatError;
pub use policy::Policy;
pub use rule::{Rule, RuleStatus, StorageClass, Transition, Trigger};
