//! # Ethereum ABI Codec
//!
//! Head/tail encoding of the subset of Solidity types the operator contract
//! uses: unsigned integers, `address`, `bool`, `bytes32`, `string`, `bytes`
//! and (nested) tuples.
//!
//! Decoding never panics: every offset and length read from the input is
//! bounds-checked against the buffer.

use crate::entities::{Address, Hash, U256};
use crate::errors::AbiError;
use crate::hashing::keccak256;

const WORD: usize = 32;

/// A Solidity parameter type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AbiType {
    /// `uintN`, N in bits.
    Uint(usize),
    /// `address`
    Address,
    /// `bool`
    Bool,
    /// `bytes32`
    FixedBytes32,
    /// `string`
    String,
    /// `bytes`
    Bytes,
    /// `(T1,T2,...)`
    Tuple(Vec<AbiType>),
}

impl AbiType {
    /// Whether values of this type are encoded in the tail.
    pub fn is_dynamic(&self) -> bool {
        match self {
            Self::String | Self::Bytes => true,
            Self::Tuple(inner) => inner.iter().any(AbiType::is_dynamic),
            _ => false,
        }
    }

    /// Size of this type's head slot.
    fn head_size(&self) -> usize {
        match self {
            Self::Tuple(inner) if !self.is_dynamic() => inner.iter().map(Self::head_size).sum(),
            _ => WORD,
        }
    }

    /// Canonical type string used in signatures.
    pub fn canonical(&self) -> String {
        match self {
            Self::Uint(bits) => format!("uint{bits}"),
            Self::Address => "address".to_string(),
            Self::Bool => "bool".to_string(),
            Self::FixedBytes32 => "bytes32".to_string(),
            Self::String => "string".to_string(),
            Self::Bytes => "bytes".to_string(),
            Self::Tuple(inner) => format!(
                "({})",
                inner.iter().map(Self::canonical).collect::<Vec<_>>().join(",")
            ),
        }
    }
}

/// A Solidity value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AbiValue {
    /// Unsigned integer.
    Uint(U256),
    /// 20-byte address.
    Address(Address),
    /// Boolean.
    Bool(bool),
    /// 32 raw bytes.
    FixedBytes32(Hash),
    /// UTF-8 string.
    String(String),
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// Tuple of values.
    Tuple(Vec<AbiValue>),
}

impl AbiValue {
    /// Shorthand for a `uint` from a `u64`.
    pub fn uint(value: u64) -> Self {
        Self::Uint(U256::from(value))
    }

    /// Shorthand for a `string`.
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    fn is_dynamic(&self) -> bool {
        match self {
            Self::String(_) | Self::Bytes(_) => true,
            Self::Tuple(inner) => inner.iter().any(AbiValue::is_dynamic),
            _ => false,
        }
    }

    /// Borrow as a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Read as a `u64`, if it fits.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Uint(v) if v.bits() <= 64 => Some(v.low_u64()),
            _ => None,
        }
    }

    /// Borrow tuple members.
    pub fn as_tuple(&self) -> Option<&[AbiValue]> {
        match self {
            Self::Tuple(values) => Some(values),
            _ => None,
        }
    }
}

// =============================================================================
// ENCODING
// =============================================================================

/// ABI-encode a parameter list.
pub fn encode(values: &[AbiValue]) -> Vec<u8> {
    encode_sequence(values)
}

/// 4-byte function selector of a canonical signature.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Selector followed by the encoded arguments.
pub fn encode_call(signature: &str, args: &[AbiValue]) -> Vec<u8> {
    let mut out = selector(signature).to_vec();
    out.extend(encode(args));
    out
}

fn encode_sequence(values: &[AbiValue]) -> Vec<u8> {
    let head_len: usize = values
        .iter()
        .map(|v| if v.is_dynamic() { WORD } else { static_size(v) })
        .sum();

    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();
    for value in values {
        if value.is_dynamic() {
            head.extend_from_slice(&usize_word(head_len + tail.len()));
            tail.extend(encode_value(value));
        } else {
            head.extend(encode_value(value));
        }
    }
    head.extend(tail);
    head
}

fn static_size(value: &AbiValue) -> usize {
    match value {
        AbiValue::Tuple(inner) => inner.iter().map(static_size).sum(),
        _ => WORD,
    }
}

fn encode_value(value: &AbiValue) -> Vec<u8> {
    match value {
        AbiValue::Uint(v) => {
            let mut word = [0u8; WORD];
            v.to_big_endian(&mut word);
            word.to_vec()
        }
        AbiValue::Address(addr) => {
            let mut word = [0u8; WORD];
            word[12..].copy_from_slice(addr);
            word.to_vec()
        }
        AbiValue::Bool(b) => usize_word(usize::from(*b)).to_vec(),
        AbiValue::FixedBytes32(h) => h.to_vec(),
        AbiValue::String(s) => encode_bytes(s.as_bytes()),
        AbiValue::Bytes(b) => encode_bytes(b),
        AbiValue::Tuple(inner) => encode_sequence(inner),
    }
}

fn encode_bytes(bytes: &[u8]) -> Vec<u8> {
    let padded = bytes.len().div_ceil(WORD) * WORD;
    let mut out = Vec::with_capacity(WORD + padded);
    out.extend_from_slice(&usize_word(bytes.len()));
    out.extend_from_slice(bytes);
    out.resize(WORD + padded, 0);
    out
}

fn usize_word(value: usize) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[24..].copy_from_slice(&(value as u64).to_be_bytes());
    word
}

// =============================================================================
// DECODING
// =============================================================================

/// Decode a parameter list of the given types.
pub fn decode(types: &[AbiType], data: &[u8]) -> Result<Vec<AbiValue>, AbiError> {
    decode_sequence(types, data, 0)
}

/// Split calldata into selector and argument bytes.
pub fn split_selector(calldata: &[u8]) -> Result<([u8; 4], &[u8]), AbiError> {
    if calldata.len() < 4 {
        return Err(AbiError::MissingSelector);
    }
    let mut sel = [0u8; 4];
    sel.copy_from_slice(&calldata[..4]);
    Ok((sel, &calldata[4..]))
}

fn decode_sequence(types: &[AbiType], data: &[u8], base: usize) -> Result<Vec<AbiValue>, AbiError> {
    let mut values = Vec::with_capacity(types.len());
    let mut cursor = base;
    for ty in types {
        if ty.is_dynamic() {
            let relative = read_usize(data, cursor)?;
            let target = base
                .checked_add(relative)
                .ok_or_else(|| AbiError::OffsetOutOfBounds(format!("{base}+{relative}")))?;
            values.push(decode_value(ty, data, target)?);
        } else {
            values.push(decode_value(ty, data, cursor)?);
        }
        cursor += ty.head_size();
    }
    Ok(values)
}

fn decode_value(ty: &AbiType, data: &[u8], at: usize) -> Result<AbiValue, AbiError> {
    match ty {
        AbiType::Uint(bits) => {
            let value = U256::from_big_endian(read_word(data, at)?);
            if value.bits() > *bits {
                return Err(AbiError::ValueOutOfRange { ty: ty.canonical() });
            }
            Ok(AbiValue::Uint(value))
        }
        AbiType::Address => {
            let word = read_word(data, at)?;
            if word[..12].iter().any(|b| *b != 0) {
                return Err(AbiError::ValueOutOfRange { ty: ty.canonical() });
            }
            let mut addr = [0u8; 20];
            addr.copy_from_slice(&word[12..]);
            Ok(AbiValue::Address(addr))
        }
        AbiType::Bool => {
            let value = U256::from_big_endian(read_word(data, at)?);
            if value.bits() > 1 {
                return Err(AbiError::ValueOutOfRange { ty: ty.canonical() });
            }
            Ok(AbiValue::Bool(!value.is_zero()))
        }
        AbiType::FixedBytes32 => {
            let mut hash = [0u8; WORD];
            hash.copy_from_slice(read_word(data, at)?);
            Ok(AbiValue::FixedBytes32(hash))
        }
        AbiType::String => {
            let bytes = read_bytes(data, at)?;
            String::from_utf8(bytes)
                .map(AbiValue::String)
                .map_err(|_| AbiError::InvalidUtf8)
        }
        AbiType::Bytes => read_bytes(data, at).map(AbiValue::Bytes),
        AbiType::Tuple(inner) => decode_sequence(inner, data, at).map(AbiValue::Tuple),
    }
}

fn read_word(data: &[u8], at: usize) -> Result<&[u8], AbiError> {
    let end = at
        .checked_add(WORD)
        .ok_or(AbiError::Truncated { offset: at })?;
    data.get(at..end).ok_or(AbiError::Truncated { offset: at })
}

fn read_usize(data: &[u8], at: usize) -> Result<usize, AbiError> {
    let value = U256::from_big_endian(read_word(data, at)?);
    if value.bits() > 64 || value.low_u64() as usize > data.len() {
        return Err(AbiError::OffsetOutOfBounds(value.to_string()));
    }
    Ok(value.low_u64() as usize)
}

fn read_bytes(data: &[u8], at: usize) -> Result<Vec<u8>, AbiError> {
    let len = read_usize(data, at)?;
    let start = at + WORD;
    data.get(start..start + len)
        .map(<[u8]>::to_vec)
        .ok_or_else(|| AbiError::OffsetOutOfBounds(format!("bytes of length {len} at {start}")))
}
