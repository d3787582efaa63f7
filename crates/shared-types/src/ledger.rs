//! # Ledger Entities
//!
//! The EVM-side view of a mined transaction, as returned by the
//! ledger-access collaborator.

use crate::entities::{Address, Hash};
use serde::{Deserialize, Serialize};

/// Block tag for nonce queries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockTag {
    /// Include transactions still in the pool.
    #[default]
    Pending,
    /// Mined transactions only.
    Latest,
}

/// An event log emitted during execution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Log {
    /// Contract address that emitted the log.
    pub address: Address,
    /// Indexed topics (up to 4). Topic 0 is the event signature hash.
    pub topics: Vec<Hash>,
    /// Non-indexed data.
    pub data: Vec<u8>,
}

impl Log {
    /// Creates a new log.
    #[must_use]
    pub fn new(address: Address, topics: Vec<Hash>, data: Vec<u8>) -> Self {
        Self {
            address,
            topics,
            data,
        }
    }
}

/// Receipt of a mined transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    /// Transaction hash.
    pub transaction_hash: Hash,
    /// Block the transaction was mined in.
    pub block_number: u64,
    /// `true` for status 1, `false` for a reverted execution.
    pub success: bool,
    /// Logs in emission order.
    pub logs: Vec<Log>,
    /// Revert reason, when the node decodes one.
    pub revert_reason: Option<String>,
}

/// Block metadata needed by receipt parsing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockInfo {
    /// Block number.
    pub number: u64,
    /// Unix timestamp (seconds).
    pub timestamp: u64,
}
