//! # Transaction Submitter
//!
//! Drives the submission state machine against a [`LedgerClient`].
//!
//! One submitter owns the nonce cache of one signing account. Concurrent
//! `submit` calls on the same submitter are allowed: each takes its own
//! nonce, and any collision is resolved by the nonce-conflict retry path.

use crate::config::SubmitterConfig;
use crate::domain::errors::{RpcError, SubmitError};
use crate::domain::nonce::NonceCache;
use crate::domain::state::{after_retry, transition, SubmitState};
use crate::ports::outbound::{LedgerClient, TransactionRequest};
use fp_telemetry::{
    metric_inc, HistogramTimer, NONCE_RESETS, SUBMISSIONS, SUBMIT_ATTEMPTS, SUBMIT_DURATION,
};
use shared_types::{to_0x_hex, Address, Hash};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Nonce-safe submitter for one signing account.
pub struct TransactionSubmitter<L: LedgerClient> {
    ledger: Arc<L>,
    nonces: NonceCache,
    config: SubmitterConfig,
}

impl<L: LedgerClient> TransactionSubmitter<L> {
    /// Create a submitter for `signer` with an empty nonce cache.
    pub fn new(ledger: Arc<L>, signer: Address, config: SubmitterConfig) -> Self {
        Self::with_nonce_cache(ledger, NonceCache::new(signer), config)
    }

    /// Create a submitter around an existing cache.
    pub fn with_nonce_cache(ledger: Arc<L>, nonces: NonceCache, config: SubmitterConfig) -> Self {
        Self {
            ledger,
            nonces,
            config,
        }
    }

    /// Underlying ledger client.
    pub fn ledger(&self) -> &Arc<L> {
        &self.ledger
    }

    /// Signing account.
    pub fn signer(&self) -> Address {
        self.nonces.signer()
    }

    /// Nonce cache (for inspection).
    pub fn nonces(&self) -> &NonceCache {
        &self.nonces
    }

    /// Run `call` with successive nonces until it is accepted or fails for
    /// good.
    ///
    /// `call` receives the nonce to use and performs the send. It is
    /// invoked once per attempt; only nonce conflicts lead to another
    /// invocation.
    pub async fn submit<F, Fut>(&self, mut call: F) -> Result<Hash, SubmitError>
    where
        F: FnMut(u64) -> Fut,
        Fut: Future<Output = Result<Hash, RpcError>>,
    {
        let _timer = HistogramTimer::new(&SUBMIT_DURATION);
        let signer = to_0x_hex(&self.signer());
        let mut state = SubmitState::start();

        loop {
            state = match state {
                SubmitState::Attempting { attempt } => {
                    let nonce = self.acquire_nonce().await?;
                    metric_inc!(SUBMIT_ATTEMPTS);
                    debug!(signer = %signer, nonce, attempt, "[fp-03] sending transaction");
                    transition(attempt, self.config.max_attempts, call(nonce).await)
                }
                SubmitState::Retry { attempt, kind } => {
                    warn!(
                        signer = %signer,
                        attempt,
                        kind = ?kind,
                        "[fp-03] nonce conflict, resetting nonce and retrying"
                    );
                    self.reset_nonce();
                    after_retry(attempt)
                }
                SubmitState::Success { tx_hash } => {
                    metric_inc!(SUBMISSIONS, &["accepted"]);
                    info!(
                        signer = %signer,
                        tx_hash = %to_0x_hex(&tx_hash),
                        "[fp-03] transaction accepted"
                    );
                    return Ok(tx_hash);
                }
                SubmitState::Fatal { reset_nonce, error } => {
                    if reset_nonce {
                        self.reset_nonce();
                    }
                    metric_inc!(SUBMISSIONS, &[error.outcome()]);
                    match &error {
                        SubmitError::Reverted { .. } | SubmitError::NonceConflictUnresolved { .. } => {
                            error!(signer = %signer, error = %error, "[fp-03] submission failed")
                        }
                        _ => warn!(signer = %signer, error = %error, "[fp-03] submission rejected"),
                    }
                    return Err(error);
                }
            };
        }
    }

    /// Submit calldata to `to` from the signing account.
    pub async fn submit_call(&self, to: Address, data: Vec<u8>) -> Result<Hash, SubmitError> {
        let from = self.signer();
        let ledger = Arc::clone(&self.ledger);
        self.submit(move |nonce| {
            let ledger = Arc::clone(&ledger);
            let tx = TransactionRequest {
                from,
                to,
                nonce,
                data: data.clone(),
            };
            async move { ledger.send_transaction(tx).await }
        })
        .await
    }

    async fn acquire_nonce(&self) -> Result<u64, SubmitError> {
        loop {
            if let Some(nonce) = self.nonces.take() {
                return Ok(nonce);
            }
            let pending = self
                .ledger
                .get_transaction_count(self.signer(), self.config.nonce_block_tag)
                .await
                .map_err(SubmitError::NonceFetch)?;
            if let Some(nonce) = self.nonces.seed(pending) {
                return Ok(nonce);
            }
        }
    }

    fn reset_nonce(&self) {
        self.nonces.reset();
        metric_inc!(NONCE_RESETS);
        warn!(signer = %to_0x_hex(&self.signer()), "[fp-03] nonce cache reset");
    }
}
