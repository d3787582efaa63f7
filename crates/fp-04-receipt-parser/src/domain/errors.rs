//! # Parse Errors

use shared_types::{AbiError, TypeError};
use thiserror::Error;

/// Why a single log did not decode.
///
/// The parser skips such logs; these never reach callers of
/// [`ReceiptParser::parse`](crate::ReceiptParser::parse).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// Log has no topic 0 (anonymous event).
    #[error("log has no topics")]
    MissingTopic,

    /// Topic 0 is not an operator-contract event.
    #[error("unknown event topic {0}")]
    UnknownTopic(String),

    /// Emitted by a different contract.
    #[error("log emitted by foreign contract {0}")]
    ForeignContract(String),

    /// Event data did not match its signature.
    #[error("malformed event data: {0}")]
    Abi(#[from] AbiError),

    /// A FinID field was not a valid FinID.
    #[error("invalid FinID in event: {0}")]
    FinId(#[from] TypeError),
}
