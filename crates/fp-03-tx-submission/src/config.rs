//! Submitter configuration.

use serde::{Deserialize, Serialize};
use shared_types::BlockTag;
use std::env;

/// Retry budget and nonce source for a [`TransactionSubmitter`](crate::TransactionSubmitter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmitterConfig {
    /// Send attempts before a nonce conflict is fatal (at least 1)
    pub max_attempts: u32,

    /// Block tag used to seed an empty nonce cache
    pub nonce_block_tag: BlockTag,
}

impl Default for SubmitterConfig {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            nonce_block_tag: BlockTag::Pending,
        }
    }
}

impl SubmitterConfig {
    /// Create configuration from environment variables.
    ///
    /// - `FP_SUBMIT_MAX_ATTEMPTS`: attempts per submission (default: 10)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            max_attempts: lookup("FP_SUBMIT_MAX_ATTEMPTS")
                .and_then(|v| v.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.max_attempts),
            ..defaults
        }
    }
}
