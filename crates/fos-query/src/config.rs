//! Wrapper configuration

use serde::{Deserialize, Serialize};

/// What a mutating pass does when a node rejects the operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Finish the pass and report every failure afterwards
    #[default]
    Isolate,
    /// Stop at the first failure
    Abort,
}

/// Configuration shared by every wrapper a registry creates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub failure_policy: FailurePolicy,
}

impl Config {
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }
}
