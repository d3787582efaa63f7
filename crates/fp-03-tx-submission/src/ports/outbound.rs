//! # Outbound Ports (Driven Ports / SPI)
//!
//! The ledger-access collaborator. Signing of the raw transaction and
//! transport are its concern; this crate only hands it calldata and a nonce.

use crate::domain::errors::RpcError;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use shared_types::{keccak256, Address, BlockInfo, BlockTag, Hash, TransactionReceipt};
use std::collections::{HashMap, VecDeque};

/// An unsigned contract call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRequest {
    /// Sending account.
    pub from: Address,
    /// Target contract.
    pub to: Address,
    /// Sender nonce.
    pub nonce: u64,
    /// ABI calldata.
    pub data: Vec<u8>,
}

/// Ledger RPC - outbound port.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Transaction count of `address` at `tag`.
    async fn get_transaction_count(&self, address: Address, tag: BlockTag)
        -> Result<u64, RpcError>;

    /// Sign and broadcast; returns the transaction hash.
    async fn send_transaction(&self, tx: TransactionRequest) -> Result<Hash, RpcError>;

    /// Receipt of a mined transaction, `None` while pending.
    async fn get_transaction_receipt(
        &self,
        tx_hash: Hash,
    ) -> Result<Option<TransactionReceipt>, RpcError>;

    /// Block metadata, `None` if unknown.
    async fn get_block(&self, number: u64) -> Result<Option<BlockInfo>, RpcError>;

    /// Read-only call; returns raw return data.
    async fn call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>, RpcError>;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

#[derive(Default)]
struct MockState {
    pending_nonce: u64,
    nonce_fetches: usize,
    send_results: VecDeque<Result<Hash, RpcError>>,
    sent: Vec<TransactionRequest>,
    receipts: HashMap<Hash, TransactionReceipt>,
    receipt_lookups: usize,
    blocks: HashMap<u64, BlockInfo>,
    call_results: VecDeque<Result<Vec<u8>, RpcError>>,
    calls: Vec<(Address, Vec<u8>)>,
}

/// Scripted ledger client for testing.
///
/// Sends pop queued results; when the queue is empty a send succeeds with
/// a hash derived from the request. Views pop queued results the same way.
#[derive(Default)]
pub struct MockLedgerClient {
    state: Mutex<MockState>,
}

impl MockLedgerClient {
    /// Create an empty mock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pending count returned by `get_transaction_count`.
    pub fn set_pending_nonce(&self, nonce: u64) {
        self.state.lock().pending_nonce = nonce;
    }

    /// Queue the result of the next send.
    pub fn push_send_result(&self, result: Result<Hash, RpcError>) {
        self.state.lock().send_results.push_back(result);
    }

    /// Queue the result of the next view call.
    pub fn push_call_result(&self, result: Result<Vec<u8>, RpcError>) {
        self.state.lock().call_results.push_back(result);
    }

    /// Make a receipt available.
    pub fn insert_receipt(&self, receipt: TransactionReceipt) {
        self.state
            .lock()
            .receipts
            .insert(receipt.transaction_hash, receipt);
    }

    /// Make a block available.
    pub fn insert_block(&self, block: BlockInfo) {
        self.state.lock().blocks.insert(block.number, block);
    }

    /// Every send attempted so far, in order.
    pub fn sent(&self) -> Vec<TransactionRequest> {
        self.state.lock().sent.clone()
    }

    /// Every view call made so far, in order.
    pub fn calls(&self) -> Vec<(Address, Vec<u8>)> {
        self.state.lock().calls.clone()
    }

    /// How often the nonce was read from the chain.
    pub fn nonce_fetches(&self) -> usize {
        self.state.lock().nonce_fetches
    }

    /// How often a receipt was requested.
    pub fn receipt_lookups(&self) -> usize {
        self.state.lock().receipt_lookups
    }
}

#[async_trait]
impl LedgerClient for MockLedgerClient {
    async fn get_transaction_count(
        &self,
        _address: Address,
        _tag: BlockTag,
    ) -> Result<u64, RpcError> {
        let mut state = self.state.lock();
        state.nonce_fetches += 1;
        Ok(state.pending_nonce)
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<Hash, RpcError> {
        let mut state = self.state.lock();
        let mut preimage = tx.nonce.to_be_bytes().to_vec();
        preimage.extend_from_slice(&tx.data);
        state.sent.push(tx);
        state
            .send_results
            .pop_front()
            .unwrap_or_else(|| Ok(keccak256(&preimage)))
    }

    async fn get_transaction_receipt(
        &self,
        tx_hash: Hash,
    ) -> Result<Option<TransactionReceipt>, RpcError> {
        let mut state = self.state.lock();
        state.receipt_lookups += 1;
        Ok(state.receipts.get(&tx_hash).cloned())
    }

    async fn get_block(&self, number: u64) -> Result<Option<BlockInfo>, RpcError> {
        Ok(self.state.lock().blocks.get(&number).copied())
    }

    async fn call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>, RpcError> {
        let mut state = self.state.lock();
        state.calls.push((to, data));
        state
            .call_results
            .pop_front()
            .unwrap_or_else(|| Err(RpcError::new(-32000, "no call result scripted")))
    }
}
