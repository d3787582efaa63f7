//! # Inbound Ports (Driving Ports / API)

use shared_types::{Hash, Log, Receipt, TransactionReceipt};

/// Turns a mined transaction's logs into a receipt.
///
/// Implementations are pure: no network calls.
pub trait ReceiptDecoder: Send + Sync {
    /// Receipt from the first recognised event, or `None` if no log
    /// decodes. `None` is not a revert.
    fn parse(&self, tx_hash: &Hash, logs: &[Log], timestamp: u64) -> Option<Receipt>;

    /// Convenience over a whole transaction receipt.
    fn parse_receipt(&self, receipt: &TransactionReceipt, timestamp: u64) -> Option<Receipt> {
        self.parse(&receipt.transaction_hash, &receipt.logs, timestamp)
    }
}
