//! # Status Transitions
//!
//! `Pending -> Completed | Failed`. Both right-hand states are terminal.

use shared_types::{to_0x_hex, Hash, OperationStatus, Receipt};

/// Error code carried by every `Failed` status.
pub const FAILED_CODE: u32 = 1;

/// Message for a mined, successful transaction with no operator event.
pub const PARSE_FAILURE: &str = "failed to parse receipt";

/// Message for a revert the node gave no reason for.
pub const UNKNOWN_REVERT: &str = "transaction reverted";

/// What one status check saw on chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Observation {
    /// No receipt yet.
    NotMined,
    /// Mined with failure status.
    Reverted { reason: Option<String> },
    /// Mined with success status; `receipt` is the parser's result.
    Mined { receipt: Option<Receipt> },
}

/// Status for an observation of `tx_hash`.
pub fn resolve(tx_hash: &Hash, observation: Observation) -> OperationStatus {
    match observation {
        Observation::NotMined => OperationStatus::Pending {
            tx_hash: to_0x_hex(tx_hash),
        },
        Observation::Mined {
            receipt: Some(receipt),
        } => OperationStatus::Completed { receipt },
        Observation::Mined { receipt: None } => OperationStatus::Failed {
            code: FAILED_CODE,
            message: PARSE_FAILURE.to_string(),
        },
        Observation::Reverted { reason } => OperationStatus::Failed {
            code: FAILED_CODE,
            message: reason
                .filter(|r| !r.is_empty())
                .unwrap_or_else(|| UNKNOWN_REVERT.to_string()),
        },
    }
}

/// Metric label for a terminal status.
pub fn status_label(status: &OperationStatus) -> &'static str {
    match status {
        OperationStatus::Pending { .. } => "pending",
        OperationStatus::Completed { .. } => "completed",
        OperationStatus::Failed { .. } => "failed",
    }
}
