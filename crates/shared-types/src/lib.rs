//! # Shared Types Crate
//!
//! Domain entities, ledger-side types and the operator-contract interface
//! shared by every adapter subsystem.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Decimal strings**: Amounts never pass through floating point.
//! - **Hex conventions**: Ledger-facing hashes carry `0x`; FinIDs and
//!   signatures do not.

pub mod abi;
pub mod contract;
pub mod entities;
pub mod errors;
pub mod hashing;
pub mod ledger;

pub use abi::{AbiType, AbiValue};
pub use contract::{ContractEvent, ContractFunction};
pub use entities::*;
pub use errors::*;
pub use hashing::{decode_hash, decode_hex, keccak256, to_0x_hex};
pub use ledger::*;
