//! # Receipt Parser
//!
//! Scans logs in emission order and builds a receipt from the first one
//! that decodes to an operator-contract event. Token-contract logs in the
//! same transaction (ERC-20 `Transfer`, `Approval`) are skipped.

use crate::domain::events::AdapterEvent;
use crate::ports::inbound::ReceiptDecoder;
use fp_telemetry::{metric_inc, RECEIPTS_PARSED};
use shared_types::{to_0x_hex, Address, Hash, Log, Receipt};
use tracing::{debug, trace};

/// Receipt parser, optionally restricted to one emitting contract.
#[derive(Debug, Clone, Default)]
pub struct ReceiptParser {
    contract: Option<Address>,
}

impl ReceiptParser {
    /// Accept operator events from any emitter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept operator events only from `contract`.
    pub fn for_contract(contract: Address) -> Self {
        Self {
            contract: Some(contract),
        }
    }
}

impl ReceiptDecoder for ReceiptParser {
    fn parse(&self, tx_hash: &Hash, logs: &[Log], timestamp: u64) -> Option<Receipt> {
        let tx = to_0x_hex(tx_hash);
        let event = logs.iter().enumerate().find_map(|(index, log)| {
            match AdapterEvent::decode(log, self.contract.as_ref()) {
                Ok(event) => Some(event),
                Err(reason) => {
                    trace!(tx_hash = %tx, index, reason = %reason, "[fp-04] skipping log");
                    None
                }
            }
        });

        match event {
            Some(event) => {
                debug!(
                    tx_hash = %tx,
                    event = event.kind().name(),
                    asset_id = %event.asset().asset_id,
                    "[fp-04] decoded operator event"
                );
                metric_inc!(RECEIPTS_PARSED, &["parsed"]);
                Some(event.into_receipt(tx_hash, timestamp))
            }
            None => {
                debug!(tx_hash = %tx, logs = logs.len(), "[fp-04] no operator event in transaction");
                metric_inc!(RECEIPTS_PARSED, &["no_receipt"]);
                None
            }
        }
    }
}
