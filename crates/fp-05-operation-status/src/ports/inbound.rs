//! # Inbound Ports (Driving Ports / API)

use crate::domain::errors::StatusError;
use async_trait::async_trait;
use shared_types::{Hash, OperationStatus};

/// Operation status API.
#[async_trait]
pub trait OperationStatusApi: Send + Sync {
    /// One status check. Callers repeat until the status is terminal.
    async fn poll_status(&self, tx_hash: Hash) -> Result<OperationStatus, StatusError>;

    /// Repeat [`poll_status`](Self::poll_status) at a fixed interval until
    /// the status is terminal or the budget runs out.
    ///
    /// Running out is [`StatusError::Timeout`], never a `Failed` status:
    /// the transaction may still be mined later.
    async fn wait_for_completion(&self, tx_hash: Hash) -> Result<OperationStatus, StatusError>;
}
