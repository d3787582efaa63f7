//! # Hashing & Hex Helpers
//!
//! Keccak256 and the hex conventions used on both sides of the bridge:
//! ledger-facing values carry a `0x` prefix, network-facing values do not.

use crate::entities::Hash;
use crate::errors::TypeError;
use sha3::{Digest, Keccak256};

/// Keccak256 hash function.
pub fn keccak256(data: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Lowercase hex with a `0x` prefix.
pub fn to_0x_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Decode hex with or without a `0x` prefix.
pub fn decode_hex(value: &str) -> Result<Vec<u8>, TypeError> {
    let stripped = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);
    hex::decode(stripped).map_err(|e| TypeError::InvalidHex(format!("{value}: {e}")))
}

/// Decode a 32-byte hash from hex.
pub fn decode_hash(value: &str) -> Result<Hash, TypeError> {
    let bytes = decode_hex(value)?;
    bytes
        .try_into()
        .map_err(|_| TypeError::InvalidHex(format!("{value}: expected 32 bytes")))
}
