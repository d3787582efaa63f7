//! # EIP-712 Typed Data
//!
//! A schema-driven implementation of `hashStruct` and the domain-separated
//! signing digest:
//!
//! ```text
//! encodeType(S)  = S(t1 n1,...) ‖ sorted(dependencies of S)
//! hashStruct(s)  = keccak256(keccak256(encodeType(S)) ‖ encodeData(s))
//! digest         = keccak256(0x19 ‖ 0x01 ‖ domainSeparator ‖ hashStruct(message))
//! ```
//!
//! Atomic types: `string`, `bytes`, `bytes32`, `address`, `bool`, `uintN`.
//! Struct types and `T[]` arrays of either are resolved through [`Types`].

use super::errors::SignatureError;
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared_types::{decode_hex, keccak256, Address, Hash};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Domain name shared by every FinP2P authorization.
pub const DOMAIN_NAME: &str = "FinP2P";

/// Domain version shared by every FinP2P authorization.
pub const DOMAIN_VERSION: &str = "1";

const DOMAIN_TYPE: &str =
    "EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

/// One member of a struct type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedField {
    /// Member name.
    pub name: String,
    /// Member type.
    #[serde(rename = "type")]
    pub type_name: String,
}

impl TypedField {
    /// Create a member.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// Struct definitions keyed by type name.
pub type Types = BTreeMap<String, Vec<TypedField>>;

/// Build a struct definition from `(name, type)` pairs.
pub fn struct_type(fields: &[(&str, &str)]) -> Vec<TypedField> {
    fields
        .iter()
        .map(|(name, ty)| TypedField::new(*name, *ty))
        .collect()
}

/// Signing domain.
///
/// `chain_id` and `verifying_contract` are optional only so an incomplete
/// domain can be represented and rejected at hashing time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Eip712Domain {
    /// Domain name.
    pub name: String,
    /// Domain version.
    pub version: String,
    /// Chain id of the ledger.
    pub chain_id: Option<u64>,
    /// Operator contract that verifies the signature.
    pub verifying_contract: Option<Address>,
}

impl Eip712Domain {
    /// The FinP2P domain for a given chain and contract.
    pub fn new(chain_id: u64, verifying_contract: Address) -> Self {
        Self {
            name: DOMAIN_NAME.to_string(),
            version: DOMAIN_VERSION.to_string(),
            chain_id: Some(chain_id),
            verifying_contract: Some(verifying_contract),
        }
    }

    /// `hashStruct(domain)`.
    pub fn separator(&self) -> Result<Hash, SignatureError> {
        let chain_id = self
            .chain_id
            .ok_or(SignatureError::MissingDomainField("chainId"))?;
        let verifying_contract = self
            .verifying_contract
            .ok_or(SignatureError::MissingDomainField("verifyingContract"))?;

        let mut encoded = Vec::with_capacity(5 * 32);
        encoded.extend_from_slice(&keccak256(DOMAIN_TYPE.as_bytes()));
        encoded.extend_from_slice(&keccak256(self.name.as_bytes()));
        encoded.extend_from_slice(&keccak256(self.version.as_bytes()));
        encoded.extend_from_slice(&uint_word(U256::from(chain_id)));
        encoded.extend_from_slice(&address_word(&verifying_contract));
        Ok(keccak256(&encoded))
    }
}

/// A message ready for hashing: what `buildMessage` hands upstream.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedPayload {
    /// Name of the top-level struct.
    pub primary_type: String,
    /// Struct definitions (without `EIP712Domain`).
    pub types: Types,
    /// Message values.
    pub message: Value,
}

impl TypedPayload {
    /// `hashStruct(message)`.
    pub fn struct_hash(&self) -> Result<Hash, SignatureError> {
        hash_struct(&self.primary_type, &self.types, &self.message)
    }

    /// Domain-separated signing digest.
    pub fn signing_hash(&self, domain: &Eip712Domain) -> Result<Hash, SignatureError> {
        let separator = domain.separator()?;
        let struct_hash = self.struct_hash()?;

        let mut preimage = Vec::with_capacity(66);
        preimage.extend_from_slice(&[0x19, 0x01]);
        preimage.extend_from_slice(&separator);
        preimage.extend_from_slice(&struct_hash);
        let digest = keccak256(&preimage);

        debug!(
            primary_type = %self.primary_type,
            digest = %hex::encode(digest),
            "[fp-01] typed-data hash computed"
        );
        Ok(digest)
    }
}

/// `encodeType(primary)`.
pub fn encode_type(primary: &str, types: &Types) -> Result<String, SignatureError> {
    let mut deps = BTreeSet::new();
    collect_dependencies(primary, types, &mut deps)?;
    deps.remove(primary);

    let mut out = render_struct(primary, types)?;
    for dep in &deps {
        out.push_str(&render_struct(dep, types)?);
    }
    Ok(out)
}

/// `keccak256(encodeType(primary))`.
pub fn type_hash(primary: &str, types: &Types) -> Result<Hash, SignatureError> {
    Ok(keccak256(encode_type(primary, types)?.as_bytes()))
}

/// `hashStruct(value)` for a value of struct type `primary`.
pub fn hash_struct(primary: &str, types: &Types, value: &Value) -> Result<Hash, SignatureError> {
    Ok(keccak256(&encode_data(primary, types, value)?))
}

/// `typeHash ‖ enc(member1) ‖ ... ‖ enc(memberN)`.
pub fn encode_data(primary: &str, types: &Types, value: &Value) -> Result<Vec<u8>, SignatureError> {
    let fields = types
        .get(primary)
        .ok_or_else(|| SignatureError::UnknownType(primary.to_string()))?;

    let mut out = Vec::with_capacity(32 * (fields.len() + 1));
    out.extend_from_slice(&type_hash(primary, types)?);
    for field in fields {
        let member = value
            .get(&field.name)
            .ok_or_else(|| SignatureError::MissingField {
                struct_name: primary.to_string(),
                field: field.name.clone(),
            })?;
        out.extend_from_slice(&encode_member(&field.type_name, &field.name, types, member)?);
    }
    Ok(out)
}

fn collect_dependencies(
    name: &str,
    types: &Types,
    found: &mut BTreeSet<String>,
) -> Result<(), SignatureError> {
    let fields = types
        .get(name)
        .ok_or_else(|| SignatureError::UnknownType(name.to_string()))?;
    for field in fields {
        let base = field.type_name.trim_end_matches("[]");
        if types.contains_key(base) && found.insert(base.to_string()) {
            collect_dependencies(base, types, found)?;
        }
    }
    Ok(())
}

fn render_struct(name: &str, types: &Types) -> Result<String, SignatureError> {
    let fields = types
        .get(name)
        .ok_or_else(|| SignatureError::UnknownType(name.to_string()))?;
    let members: Vec<String> = fields
        .iter()
        .map(|f| format!("{} {}", f.type_name, f.name))
        .collect();
    Ok(format!("{name}({})", members.join(",")))
}

fn encode_member(
    type_name: &str,
    field: &str,
    types: &Types,
    value: &Value,
) -> Result<[u8; 32], SignatureError> {
    let invalid = || SignatureError::InvalidFieldValue {
        field: field.to_string(),
        expected: type_name.to_string(),
    };

    if let Some(inner) = type_name.strip_suffix("[]") {
        let items = value.as_array().ok_or_else(invalid)?;
        let mut concatenated = Vec::with_capacity(items.len() * 32);
        for item in items {
            concatenated.extend_from_slice(&encode_member(inner, field, types, item)?);
        }
        return Ok(keccak256(&concatenated));
    }

    if types.contains_key(type_name) {
        return hash_struct(type_name, types, value);
    }

    match type_name {
        "string" => Ok(keccak256(value.as_str().ok_or_else(invalid)?.as_bytes())),
        "bytes" => {
            let bytes = decode_hex(value.as_str().ok_or_else(invalid)?).map_err(|_| invalid())?;
            Ok(keccak256(&bytes))
        }
        "bytes32" => {
            let bytes = decode_hex(value.as_str().ok_or_else(invalid)?).map_err(|_| invalid())?;
            bytes.try_into().map_err(|_| invalid())
        }
        "address" => {
            let bytes = decode_hex(value.as_str().ok_or_else(invalid)?).map_err(|_| invalid())?;
            let address: Address = bytes.try_into().map_err(|_| invalid())?;
            Ok(address_word(&address))
        }
        "bool" => Ok(uint_word(U256::from(u8::from(
            value.as_bool().ok_or_else(invalid)?,
        )))),
        t if t.starts_with("uint") => {
            let bits: usize = t[4..].parse().map_err(|_| SignatureError::UnknownType(t.to_string()))?;
            if bits == 0 || bits > 256 || bits % 8 != 0 {
                return Err(SignatureError::UnknownType(t.to_string()));
            }
            let number = parse_uint(value).ok_or_else(invalid)?;
            if number.bits() > bits {
                return Err(invalid());
            }
            Ok(uint_word(number))
        }
        other => Err(SignatureError::UnknownType(other.to_string())),
    }
}

/// Integers may arrive as JSON numbers, decimal strings or `0x` hex strings.
fn parse_uint(value: &Value) -> Option<U256> {
    match value {
        Value::Number(n) => n.as_u64().map(U256::from),
        Value::String(s) if s.starts_with("0x") || s.starts_with("0X") => {
            let bytes = decode_hex(s).ok()?;
            (bytes.len() <= 32).then(|| U256::from_big_endian(&bytes))
        }
        Value::String(s) => U256::from_dec_str(s).ok(),
        _ => None,
    }
}

fn uint_word(value: U256) -> [u8; 32] {
    let mut word = [0u8; 32];
    value.to_big_endian(&mut word);
    word
}

fn address_word(address: &Address) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(address);
    word
}
