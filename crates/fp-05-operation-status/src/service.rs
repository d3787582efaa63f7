//! # Operation Status Poller

use crate::config::PollerConfig;
use crate::domain::errors::StatusError;
use crate::domain::status::{resolve, status_label, Observation};
use crate::ports::inbound::OperationStatusApi;
use async_trait::async_trait;
use fp_03_tx_submission::LedgerClient;
use fp_04_receipt_parser::{ReceiptDecoder, ReceiptParser};
use fp_telemetry::{metric_inc, OPERATION_STATUSES};
use shared_types::{to_0x_hex, Hash, OperationStatus};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Pull-based status tracker.
pub struct OperationStatusPoller<L: LedgerClient, P: ReceiptDecoder = ReceiptParser> {
    ledger: Arc<L>,
    parser: P,
    config: PollerConfig,
}

impl<L: LedgerClient, P: ReceiptDecoder> OperationStatusPoller<L, P> {
    /// Create a poller.
    pub fn new(ledger: Arc<L>, parser: P, config: PollerConfig) -> Self {
        Self {
            ledger,
            parser,
            config,
        }
    }

    async fn observe(&self, tx_hash: Hash) -> Result<Observation, StatusError> {
        let Some(receipt) = self
            .ledger
            .get_transaction_receipt(tx_hash)
            .await
            .map_err(StatusError::Rpc)?
        else {
            return Ok(Observation::NotMined);
        };

        if !receipt.success {
            return Ok(Observation::Reverted {
                reason: receipt.revert_reason,
            });
        }

        let block = self
            .ledger
            .get_block(receipt.block_number)
            .await
            .map_err(StatusError::Rpc)?
            .ok_or(StatusError::BlockNotFound(receipt.block_number))?;

        Ok(Observation::Mined {
            receipt: self.parser.parse_receipt(&receipt, block.timestamp),
        })
    }
}

#[async_trait]
impl<L: LedgerClient, P: ReceiptDecoder> OperationStatusApi for OperationStatusPoller<L, P> {
    async fn poll_status(&self, tx_hash: Hash) -> Result<OperationStatus, StatusError> {
        let status = resolve(&tx_hash, self.observe(tx_hash).await?);
        debug!(
            tx_hash = %to_0x_hex(&tx_hash),
            status = status_label(&status),
            "[fp-05] status checked"
        );
        if status.is_terminal() {
            metric_inc!(OPERATION_STATUSES, &[status_label(&status)]);
            info!(
                tx_hash = %to_0x_hex(&tx_hash),
                status = status_label(&status),
                "[fp-05] operation finished"
            );
        }
        Ok(status)
    }

    async fn wait_for_completion(&self, tx_hash: Hash) -> Result<OperationStatus, StatusError> {
        let attempts = self.config.attempts();
        for attempt in 1..=attempts {
            let status = self.poll_status(tx_hash).await?;
            if status.is_terminal() {
                return Ok(status);
            }
            if attempt < attempts {
                tokio::time::sleep(self.config.interval()).await;
            }
        }

        metric_inc!(OPERATION_STATUSES, &["timeout"]);
        warn!(
            tx_hash = %to_0x_hex(&tx_hash),
            attempts,
            "[fp-05] gave up waiting for operation"
        );
        Err(StatusError::Timeout { attempts })
    }
}
