//! # Error Classification
//!
//! The single place raw node errors are inspected. Everything downstream
//! switches on [`ChainErrorKind`].

use super::errors::RpcError;
use serde::{Deserialize, Serialize};

/// Closed classification of a failed send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChainErrorKind {
    /// Node decoded a revert. Permanent.
    Revert { reason: String },
    /// Local nonce is ahead of chain state. Transient.
    NonceTooHigh,
    /// Nonce consumed already, or the replacement was underpriced. Transient.
    NonceAlreadyUsed,
    /// Anything else. Not retried.
    Unknown,
}

impl ChainErrorKind {
    /// Whether a retry with a fresh nonce can succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::NonceTooHigh | Self::NonceAlreadyUsed)
    }

    /// Whether the nonce cache must be discarded.
    pub fn resets_nonce(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

// Both historical spellings of "too high" map to one kind.
const NONCE_TOO_HIGH: &[&str] = &["nonce too high", "nonce to high", "nonce is too high"];

const NONCE_ALREADY_USED: &[&str] = &[
    "nonce too low",
    "nonce has already been used",
    "already known",
    "replacement transaction underpriced",
    "replacement fee too low",
    "nonce expired",
];

const EXECUTION_REVERTED: &str = "execution reverted";

/// Classify a node error.
pub fn classify(err: &RpcError) -> ChainErrorKind {
    if let Some(reason) = &err.revert_reason {
        return ChainErrorKind::Revert {
            reason: reason.clone(),
        };
    }

    let message = err.message.to_ascii_lowercase();
    if message.starts_with(EXECUTION_REVERTED) {
        let reason = err.message[EXECUTION_REVERTED.len()..]
            .trim_start_matches(':')
            .trim();
        return ChainErrorKind::Revert {
            reason: reason.to_string(),
        };
    }

    let haystack = match &err.data {
        Some(data) => format!("{message} {}", data.to_ascii_lowercase()),
        None => message,
    };
    if NONCE_TOO_HIGH.iter().any(|m| haystack.contains(m)) {
        ChainErrorKind::NonceTooHigh
    } else if NONCE_ALREADY_USED.iter().any(|m| haystack.contains(m)) {
        ChainErrorKind::NonceAlreadyUsed
    } else {
        ChainErrorKind::Unknown
    }
}
