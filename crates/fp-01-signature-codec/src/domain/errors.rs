//! # Signature Codec Errors

use shared_types::{Address, TypeError};
use thiserror::Error;

/// Errors raised while building, hashing, signing or verifying typed data.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignatureError {
    /// Primary type has no message schema
    #[error("Unsupported primary type: {0}")]
    UnsupportedPrimaryType(String),

    /// Domain lacks a field required for hashing
    #[error("EIP-712 domain is missing {0}")]
    MissingDomainField(&'static str),

    /// A type referenced by the schema is neither atomic nor defined
    #[error("Unknown typed-data type: {0}")]
    UnknownType(String),

    /// Message lacks a field declared by its struct type
    #[error("Message field {struct_name}.{field} is missing")]
    MissingField { struct_name: String, field: String },

    /// Message field does not fit its declared type
    #[error("Message field {field} is not a valid {expected}")]
    InvalidFieldValue { field: String, expected: String },

    /// The signature format is invalid (wrong length, invalid encoding)
    #[error("Invalid signature format")]
    InvalidFormat,

    /// Signature has high S value (EIP-2 malleability protection)
    #[error("Malleable signature (high S value)")]
    MalleableSignature,

    /// Invalid recovery ID (v must be 0, 1, 27, or 28)
    #[error("Invalid recovery ID: {0}")]
    InvalidRecoveryId(u8),

    /// Failed to recover public key from signature
    #[error("Failed to recover public key")]
    RecoveryFailed,

    /// FinID bytes are not a point on secp256k1
    #[error("FinID is not a valid secp256k1 public key: {0}")]
    InvalidPublicKey(String),

    /// Recovered signer does not match expected signer
    #[error("Signer mismatch: expected 0x{}, got 0x{}", hex::encode(expected), hex::encode(actual))]
    SignerMismatch { expected: Address, actual: Address },

    /// Signing key rejected the digest
    #[error("Signing failed: {0}")]
    SigningFailed(String),

    /// Data-model value was malformed
    #[error(transparent)]
    Type(#[from] TypeError),
}
