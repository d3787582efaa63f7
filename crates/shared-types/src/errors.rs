//! # Error Types
//!
//! Defines error types used across subsystems.

use thiserror::Error;

/// Errors raised while constructing or parsing data-model values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TypeError {
    /// Hex string could not be decoded.
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    /// FinID is not a 33-byte compressed public key in hex.
    #[error("Invalid FinID: {0}")]
    InvalidFinId(String),

    /// Amount is not a non-negative decimal string.
    #[error("Invalid amount: {0:?}")]
    InvalidAmount(String),

    /// Amount carries more fractional digits than the asset allows.
    #[error("Amount {amount} exceeds precision of {decimals} decimals")]
    PrecisionExceeded { amount: String, decimals: u32 },

    /// Unknown asset type label or code.
    #[error("Unknown asset type: {0}")]
    UnknownAssetType(String),

    /// Unknown primary type label or code.
    #[error("Unsupported primary type: {0}")]
    UnknownPrimaryType(String),

    /// Unknown enum code for leg, phase or release type.
    #[error("Unknown {kind} code: {code}")]
    UnknownCode { kind: &'static str, code: u8 },
}

/// Errors raised by the ABI codec.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AbiError {
    /// Input ended before the expected word.
    #[error("ABI data truncated at offset {offset}")]
    Truncated { offset: usize },

    /// An offset or length word points outside the input.
    #[error("ABI offset out of bounds: {0}")]
    OffsetOutOfBounds(String),

    /// Value does not fit the declared type.
    #[error("ABI value out of range for {ty}")]
    ValueOutOfRange { ty: String },

    /// String payload was not UTF-8.
    #[error("ABI string is not valid UTF-8")]
    InvalidUtf8,

    /// Decoded values do not have the expected shape.
    #[error("Unexpected ABI layout: {0}")]
    UnexpectedLayout(String),

    /// Calldata is shorter than a selector.
    #[error("Calldata too short for a function selector")]
    MissingSelector,

    /// Selector is not part of the known interface.
    #[error("Unknown function selector: {0}")]
    UnknownSelector(String),
}
