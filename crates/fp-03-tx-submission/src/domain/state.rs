//! # Submission State Machine
//!
//! `Attempting -> Success | Retry | Fatal`, `Retry -> Attempting`.
//! [`transition`] is pure so every edge is testable without a network.

use super::classify::{classify, ChainErrorKind};
use super::errors::{RpcError, SubmitError};
use shared_types::Hash;

/// Where a submission is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitState {
    /// About to send with a fresh nonce. Attempts count from 1.
    Attempting { attempt: u32 },
    /// Nonce conflict; reset the cache and attempt again.
    Retry { attempt: u32, kind: ChainErrorKind },
    /// Node accepted the transaction.
    Success { tx_hash: Hash },
    /// Give up.
    Fatal { reset_nonce: bool, error: SubmitError },
}

impl SubmitState {
    /// Initial state.
    pub fn start() -> Self {
        Self::Attempting { attempt: 1 }
    }

    /// Whether the machine has stopped.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success { .. } | Self::Fatal { .. })
    }
}

/// Next state after the send for `attempt` returned `result`.
pub fn transition(attempt: u32, max_attempts: u32, result: Result<Hash, RpcError>) -> SubmitState {
    let err = match result {
        Ok(tx_hash) => return SubmitState::Success { tx_hash },
        Err(err) => err,
    };

    match classify(&err) {
        ChainErrorKind::Revert { reason } => SubmitState::Fatal {
            reset_nonce: true,
            error: SubmitError::Reverted { reason },
        },
        kind @ (ChainErrorKind::NonceTooHigh | ChainErrorKind::NonceAlreadyUsed) => {
            if attempt >= max_attempts {
                SubmitState::Fatal {
                    reset_nonce: true,
                    error: SubmitError::NonceConflictUnresolved { attempts: attempt },
                }
            } else {
                SubmitState::Retry { attempt, kind }
            }
        }
        ChainErrorKind::Unknown => SubmitState::Fatal {
            reset_nonce: false,
            error: SubmitError::Rejected(err),
        },
    }
}

/// State after a retry's nonce reset.
pub fn after_retry(attempt: u32) -> SubmitState {
    SubmitState::Attempting {
        attempt: attempt + 1,
    }
}
