//! # Transaction Submission
//!
//! Submits ledger calls from one signing account with a self-managed nonce.
//!
//! ## Retry Policy
//!
//! | Node error | Kind | Action |
//! |------------|------|--------|
//! | decoded revert reason | [`ChainErrorKind::Revert`] | reset nonce, fail |
//! | nonce too high | [`ChainErrorKind::NonceTooHigh`] | reset nonce, retry |
//! | nonce used / replacement underpriced | [`ChainErrorKind::NonceAlreadyUsed`] | reset nonce, retry |
//! | anything else | [`ChainErrorKind::Unknown`] | fail |
//!
//! Retries are bounded by [`SubmitterConfig::max_attempts`].
//!
//! ## Architecture
//!
//! - `domain/` - classification, [`NonceCache`], submission state machine
//! - `ports/` - [`LedgerClient`] and a scripted [`MockLedgerClient`]
//! - `service.rs` - [`TransactionSubmitter`]
//! - `adapters/` - [`FinP2PContract`] bindings for the operator contract

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::contract::FinP2PContract;
pub use config::SubmitterConfig;
pub use domain::classify::{classify, ChainErrorKind};
pub use domain::errors::{ContractError, RpcError, SubmitError};
pub use domain::nonce::NonceCache;
pub use domain::state::{transition, SubmitState};
pub use ports::outbound::{LedgerClient, MockLedgerClient, TransactionRequest};
pub use service::TransactionSubmitter;
