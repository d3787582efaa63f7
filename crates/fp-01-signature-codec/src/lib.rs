//! # Signature Codec Subsystem (FP-01)
//!
//! Builds, hashes, signs and verifies the EIP-712 typed-data messages that
//! authorize FinP2P operations.
//!
//! ## Architecture
//!
//! This subsystem follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): typed-data engine, per-primary-type
//!   schemas, secp256k1 signing and recovery
//! - **Ports Layer** (`ports/`): the inbound API trait
//! - **Service Layer** (`service.rs`): wires domain logic to the port
//!
//! ## Guarantees
//!
//! - The digest matches the operator contract's on-chain computation for the
//!   same field values, so a stale or malformed signature is caught before
//!   gas is spent.
//! - A signature is accepted only if it recovers to the address derived from
//!   the claimed signer's FinID.

pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use domain::ecdsa::{
    address_from_pubkey, fin_id_from_signing_key, fin_id_to_address, sign_hash, verify,
};
pub use domain::errors::SignatureError;
pub use domain::messages::{
    build_message, receipt_proof, InvestmentMessage, Loan, MessageFields, PrimarySale, Redemption,
    Trade,
};
pub use domain::signed::SignedMessage;
pub use domain::typed_data::{Eip712Domain, TypedField, TypedPayload, Types};
pub use ports::inbound::SignatureCodecApi;
pub use service::SignatureCodecService;
