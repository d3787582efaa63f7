//! # Submission Errors

use shared_types::AbiError;
use std::fmt;
use thiserror::Error;

/// Raw error reported by the ledger node.
///
/// Only [`classify`](super::classify::classify) looks inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcError {
    /// JSON-RPC error code.
    pub code: i64,
    /// Node message.
    pub message: String,
    /// Raw `data` field, if any.
    pub data: Option<String>,
    /// Revert reason, when the node decoded one.
    pub revert_reason: Option<String>,
}

impl RpcError {
    /// Error with a code and message only.
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
            revert_reason: None,
        }
    }

    /// Execution reverted with a decoded reason.
    pub fn reverted(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self {
            code: 3,
            message: format!("execution reverted: {reason}"),
            data: None,
            revert_reason: Some(reason),
        }
    }
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rpc error {}: {}", self.code, self.message)
    }
}

impl std::error::Error for RpcError {}

/// Final outcome of a failed submission.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmitError {
    /// The call is logically invalid; never retried.
    #[error("transaction reverted: {reason}")]
    Reverted { reason: String },

    /// Node rejected the call for a reason outside the retry set.
    #[error("transaction rejected: {0}")]
    Rejected(RpcError),

    /// Every attempt hit a nonce conflict.
    #[error("failed to execute transaction without resolving nonce conflict (after {attempts} attempts)")]
    NonceConflictUnresolved { attempts: u32 },

    /// Pending transaction count could not be read.
    #[error("failed to fetch nonce: {0}")]
    NonceFetch(RpcError),
}

impl SubmitError {
    /// Metric label for this outcome.
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::Reverted { .. } => "reverted",
            Self::NonceConflictUnresolved { .. } => "exhausted",
            Self::Rejected(_) | Self::NonceFetch(_) => "rejected",
        }
    }
}

/// Errors from the contract facade.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContractError {
    /// A mutating call failed to submit.
    #[error(transparent)]
    Submit(#[from] SubmitError),

    /// A view call failed at the node.
    #[error("view call failed: {0}")]
    Rpc(RpcError),

    /// Calldata or return data did not match the interface.
    #[error(transparent)]
    Abi(#[from] AbiError),

    /// Investor signature is not hex.
    #[error("invalid signature encoding: {0}")]
    InvalidSignature(String),
}
