//! # Status Errors

use fp_03_tx_submission::RpcError;
use thiserror::Error;

/// Failure to observe a status. None of these are on-chain failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StatusError {
    /// Node call failed.
    #[error("status check failed: {0}")]
    Rpc(RpcError),

    /// Receipt names a block the node does not know.
    #[error("block {0} not found")]
    BlockNotFound(u64),

    /// Still pending after the polling budget.
    #[error("operation still pending after {attempts} status checks")]
    Timeout { attempts: u32 },
}
