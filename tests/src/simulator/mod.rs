//! # In-Memory Ledger
//!
//! A single-node EVM stand-in that runs the operator contract in process.
//! It enforces sender nonces the way a node does, mines one transaction
//! per block and can be told to misbehave (injected node errors, unmined
//! transactions, mined reverts).


use async_trait::async_trait;
use contract::OperatorContract;
use fp_03_tx_submission::{LedgerClient, RpcError, TransactionRequest};
use parking_lot::Mutex;
use shared_types::abi::{decode, encode, split_selector};
use shared_types::{
    keccak256, to_0x_hex, Address, BlockInfo, BlockTag, ContractFunction, FinId, Hash,
    TransactionReceipt,
};
use std::collections::{HashMap, VecDeque};

/// Timestamp of block 0.
pub const GENESIS_TIMESTAMP: u64 = 1_700_000_000;
/// Seconds between blocks.
pub const BLOCK_TIME: u64 = 12;

struct LedgerState {
    contract: OperatorContract,
    nonces: HashMap<Address, u64>,
    height: u64,
    mined: HashMap<Hash, TransactionReceipt>,
    unmined: Vec<TransactionReceipt>,
    auto_mine: bool,
    mine_reverts: bool,
    injected: VecDeque<RpcError>,
    sends: usize,
    calls: usize,
}

impl LedgerState {
    fn mine(&mut self, mut receipt: TransactionReceipt) {
        self.height += 1;
        receipt.block_number = self.height;
        self.mined.insert(receipt.transaction_hash, receipt);
    }

    fn record(&mut self, receipt: TransactionReceipt) {
        if self.auto_mine {
            self.mine(receipt);
        } else {
            self.unmined.push(receipt);
        }
    }
}

/// Ledger simulator implementing [`LedgerClient`].
pub struct InMemoryLedger {
    contract_address: Address,
    chain_id: u64,
    state: Mutex<LedgerState>,
}

impl InMemoryLedger {
    /// Ledger with the operator contract deployed at `contract_address`.
    pub fn new(contract_address: Address, chain_id: u64) -> Self {
        Self {
            contract_address,
            chain_id,
            state: Mutex::new(LedgerState {
                contract: OperatorContract::new(contract_address, chain_id),
                nonces: HashMap::new(),
                height: 0,
                mined: HashMap::new(),
                unmined: Vec::new(),
                auto_mine: true,
                mine_reverts: false,
                injected: VecDeque::new(),
                sends: 0,
                calls: 0,
            }),
        }
    }

    /// Chain id the contract hashes under.
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Make the next send fail with `error` before it reaches the contract.
    pub fn inject_send_error(&self, error: RpcError) {
        self.state.lock().injected.push_back(error);
    }

    /// When off, accepted transactions wait for [`mine_pending`](Self::mine_pending).
    pub fn set_auto_mine(&self, enabled: bool) {
        self.state.lock().auto_mine = enabled;
    }

    /// Mine every waiting transaction, one block each.
    pub fn mine_pending(&self) -> usize {
        let mut state = self.state.lock();
        let waiting = std::mem::take(&mut state.unmined);
        let count = waiting.len();
        for receipt in waiting {
            state.mine(receipt);
        }
        count
    }

    /// When on, reverting transactions are mined as failed instead of being
    /// rejected at submission.
    pub fn set_mine_reverts(&self, enabled: bool) {
        self.state.lock().mine_reverts = enabled;
    }

    /// Overwrite an account nonce, as if another client had used it.
    pub fn set_nonce(&self, address: Address, nonce: u64) {
        self.state.lock().nonces.insert(address, nonce);
    }

    /// Nonce the node expects next from `address`.
    pub fn nonce_of(&self, address: Address) -> u64 {
        self.state.lock().nonces.get(&address).copied().unwrap_or_default()
    }

    /// `send_transaction` invocations, including rejected ones.
    pub fn send_count(&self) -> usize {
        self.state.lock().sends
    }

    /// `call` invocations.
    pub fn call_count(&self) -> usize {
        self.state.lock().calls
    }

    /// Current block height.
    pub fn height(&self) -> u64 {
        self.state.lock().height
    }

    /// Balance in base units, bypassing the RPC surface.
    pub fn units_of(&self, asset_id: &str, owner: &FinId) -> u128 {
        self.state.lock().contract.units_of(asset_id, owner)
    }
}

fn nonce_error(expected: u64, tx: &TransactionRequest) -> Option<RpcError> {
    let detail = format!("address {}, tx: {} state: {}", to_0x_hex(&tx.from), tx.nonce, expected);
    if tx.nonce > expected {
        Some(RpcError::new(-32000, format!("nonce too high: {detail}")))
    } else if tx.nonce < expected {
        Some(RpcError::new(-32000, format!("nonce too low: {detail}")))
    } else {
        None
    }
}

#[async_trait]
impl LedgerClient for InMemoryLedger {
    async fn get_transaction_count(&self, address: Address, _tag: BlockTag) -> Result<u64, RpcError> {
        Ok(self.nonce_of(address))
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<Hash, RpcError> {
        let mut state = self.state.lock();
        state.sends += 1;

        if let Some(error) = state.injected.pop_front() {
            return Err(error);
        }
        let expected = state.nonces.get(&tx.from).copied().unwrap_or_default();
        if let Some(error) = nonce_error(expected, &tx) {
            return Err(error);
        }
        if tx.to != self.contract_address {
            return Err(RpcError::new(-32000, "no contract at target address"));
        }

        let (selector, body) =
            split_selector(&tx.data).map_err(|e| RpcError::new(-32602, e.to_string()))?;
        let function =
            ContractFunction::from_selector(selector).map_err(|e| RpcError::new(-32602, e.to_string()))?;
        let args =
            decode(&function.inputs(), body).map_err(|e| RpcError::new(-32602, e.to_string()))?;

        let outcome = state.contract.execute(function, &args);
        if let Err(reason) = &outcome {
            if !state.mine_reverts {
                return Err(RpcError::reverted(reason.clone()));
            }
        }

        let mut preimage = tx.from.to_vec();
        preimage.extend_from_slice(&tx.nonce.to_be_bytes());
        preimage.extend_from_slice(&tx.data);
        let tx_hash = keccak256(&preimage);
        state.nonces.insert(tx.from, expected + 1);

        let receipt = match outcome {
            Ok(logs) => TransactionReceipt {
                transaction_hash: tx_hash,
                block_number: 0,
                success: true,
                logs,
                revert_reason: None,
            },
            Err(reason) => TransactionReceipt {
                transaction_hash: tx_hash,
                block_number: 0,
                success: false,
                logs: Vec::new(),
                revert_reason: Some(reason),
            },
        };
        state.record(receipt);
        Ok(tx_hash)
    }

    async fn get_transaction_receipt(
        &self,
        tx_hash: Hash,
    ) -> Result<Option<TransactionReceipt>, RpcError> {
        Ok(self.state.lock().mined.get(&tx_hash).cloned())
    }

    async fn get_block(&self, number: u64) -> Result<Option<BlockInfo>, RpcError> {
        let height = self.state.lock().height;
        Ok((number <= height).then_some(BlockInfo {
            number,
            timestamp: GENESIS_TIMESTAMP + number * BLOCK_TIME,
        }))
    }

    async fn call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>, RpcError> {
        let mut state = self.state.lock();
        state.calls += 1;
        if to != self.contract_address {
            return Ok(Vec::new());
        }
        let (selector, body) =
            split_selector(&data).map_err(|e| RpcError::new(-32602, e.to_string()))?;
        let function =
            ContractFunction::from_selector(selector).map_err(|e| RpcError::new(-32602, e.to_string()))?;
        let args =
            decode(&function.inputs(), body).map_err(|e| RpcError::new(-32602, e.to_string()))?;
        let out = state
            .contract
            .view(function, &args)
            .map_err(RpcError::reverted)?;
        Ok(encode(&out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTRACT: Address = [0xf1; 20];
    const SENDER: Address = [0x0a; 20];

    fn associate(nonce: u64) -> TransactionRequest {
        TransactionRequest {
            from: SENDER,
            to: CONTRACT,
            nonce,
            data: shared_types::abi::encode_call(
                &ContractFunction::AssociateAsset.signature(),
                &[
                    shared_types::AbiValue::string(format!("asset-{nonce}")),
                    shared_types::AbiValue::Address([0x77; 20]),
                ],
            ),
        }
    }

    #[tokio::test]
    async fn test_nonce_enforced_like_a_node() {
        let ledger = InMemoryLedger::new(CONTRACT, 1337);

        let err = ledger.send_transaction(associate(3)).await.unwrap_err();
        assert!(err.message.starts_with("nonce too high"));

        ledger.send_transaction(associate(0)).await.unwrap();
        let err = ledger.send_transaction(associate(0)).await.unwrap_err();
        assert!(err.message.starts_with("nonce too low"));

        assert_eq!(ledger.nonce_of(SENDER), 1);
        assert_eq!(ledger.height(), 1);
    }

    #[tokio::test]
    async fn test_revert_does_not_consume_nonce() {
        let ledger = InMemoryLedger::new(CONTRACT, 1337);
        ledger.send_transaction(associate(0)).await.unwrap();

        // Same asset id again
        let duplicate = TransactionRequest {
            nonce: 1,
            ..associate(0)
        };
        let err = ledger.send_transaction(duplicate).await.unwrap_err();
        assert_eq!(err.revert_reason.as_deref(), Some("Asset already exists"));
        assert_eq!(ledger.nonce_of(SENDER), 1);
    }

    #[tokio::test]
    async fn test_unmined_until_mined() {
        let ledger = InMemoryLedger::new(CONTRACT, 1337);
        ledger.set_auto_mine(false);
        let hash = ledger.send_transaction(associate(0)).await.unwrap();
        assert!(ledger.get_transaction_receipt(hash).await.unwrap().is_none());

        assert_eq!(ledger.mine_pending(), 1);
        let receipt = ledger.get_transaction_receipt(hash).await.unwrap().unwrap();
        assert!(receipt.success);
        let block = ledger.get_block(receipt.block_number).await.unwrap().unwrap();
        assert_eq!(block.timestamp, GENESIS_TIMESTAMP + BLOCK_TIME);
    }

    #[tokio::test]
    async fn test_injected_error_precedes_execution() {
        let ledger = InMemoryLedger::new(CONTRACT, 1337);
        ledger.inject_send_error(RpcError::new(-32005, "rate limited"));
        assert!(ledger.send_transaction(associate(0)).await.is_err());
        assert!(ledger.send_transaction(associate(0)).await.is_ok());
        assert_eq!(ledger.send_count(), 2);
    }
}
