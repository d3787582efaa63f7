//! # ECDSA (secp256k1)
//!
//! Signing and signer recovery over a 32-byte typed-data digest.
//!
//! ## Wire format
//!
//! Signatures travel as hex `r ‖ s` (64 bytes, no `0x`). The recovery id is
//! not carried, so verification tries both candidates. A 65-byte
//! `r ‖ s ‖ v` form is also accepted, with `v` in {0, 1, 27, 28}.
//!
//! ## Security Notes
//!
//! - **Malleability Prevention (EIP-2)**: high-S signatures are rejected, as
//!   the verifying contract rejects them.
//! - Signing always emits the low-S form.

use super::errors::SignatureError;
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use shared_types::{decode_hex, keccak256, Address, FinId, Hash};
use tracing::warn;

/// Derive Ethereum address from public key.
pub fn address_from_pubkey(public_key: &VerifyingKey) -> Address {
    let pubkey_bytes = public_key.to_encoded_point(false);

    // Keccak256 hash of public key (without 0x04 prefix)
    let hash = keccak256(&pubkey_bytes.as_bytes()[1..]);

    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    address
}

/// Public key named by a FinID.
pub fn verifying_key_from_fin_id(fin_id: &FinId) -> Result<VerifyingKey, SignatureError> {
    VerifyingKey::from_sec1_bytes(&fin_id.to_bytes())
        .map_err(|_| SignatureError::InvalidPublicKey(fin_id.to_string()))
}

/// Ledger address controlled by the holder of a FinID.
pub fn fin_id_to_address(fin_id: &FinId) -> Result<Address, SignatureError> {
    Ok(address_from_pubkey(&verifying_key_from_fin_id(fin_id)?))
}

/// FinID (compressed public key) of a signing key.
pub fn fin_id_from_signing_key(key: &SigningKey) -> Result<FinId, SignatureError> {
    let compressed = key.verifying_key().to_encoded_point(true);
    Ok(FinId::parse(&hex::encode(compressed.as_bytes()))?)
}

/// Sign a digest, returning hex `r ‖ s`.
pub fn sign_hash(digest: &Hash, key: &SigningKey) -> Result<String, SignatureError> {
    let (signature, _) = key
        .sign_prehash_recoverable(digest)
        .map_err(|e| SignatureError::SigningFailed(e.to_string()))?;
    let signature = signature.normalize_s().unwrap_or(signature);
    Ok(hex::encode(signature.to_bytes()))
}

/// Parse a wire signature into its scalar pair and optional recovery id.
pub fn parse_signature(encoded: &str) -> Result<(Signature, Option<RecoveryId>), SignatureError> {
    let bytes = decode_hex(encoded).map_err(|_| SignatureError::InvalidFormat)?;
    let (rs, v) = match bytes.len() {
        64 => (&bytes[..], None),
        65 => (&bytes[..64], Some(parse_recovery_id(bytes[64])?)),
        _ => return Err(SignatureError::InvalidFormat),
    };

    let signature = Signature::from_slice(rs).map_err(|_| SignatureError::InvalidFormat)?;
    if signature.normalize_s().is_some() {
        return Err(SignatureError::MalleableSignature);
    }
    Ok((signature, v))
}

/// Every address the signature could have come from (one per recovery id).
pub fn recover_candidates(
    digest: &Hash,
    encoded: &str,
) -> Result<Vec<Address>, SignatureError> {
    let (signature, v) = parse_signature(encoded)?;
    let ids: Vec<RecoveryId> = match v {
        Some(id) => vec![id],
        None => [0u8, 1]
            .into_iter()
            .filter_map(RecoveryId::from_byte)
            .collect(),
    };

    let candidates: Vec<Address> = ids
        .into_iter()
        .filter_map(|id| VerifyingKey::recover_from_prehash(digest, &signature, id).ok())
        .map(|key| address_from_pubkey(&key))
        .collect();

    if candidates.is_empty() {
        warn!(digest = %hex::encode(digest), "[fp-01] signature recovery failed");
        return Err(SignatureError::RecoveryFailed);
    }
    Ok(candidates)
}

/// Check that `encoded` is a signature of `digest` by `expected`.
///
/// Malformed signatures are errors; a well-formed signature by someone else
/// is `Ok(false)`.
pub fn verify(digest: &Hash, encoded: &str, expected: &Address) -> Result<bool, SignatureError> {
    Ok(recover_candidates(digest, encoded)?.contains(expected))
}

/// Like [`verify`], but a mismatch is a [`SignatureError::SignerMismatch`].
pub fn verify_signer(digest: &Hash, encoded: &str, expected: Address) -> Result<(), SignatureError> {
    let candidates = recover_candidates(digest, encoded)?;
    if candidates.contains(&expected) {
        return Ok(());
    }
    Err(SignatureError::SignerMismatch {
        expected,
        actual: candidates[0],
    })
}

/// Parse recovery ID from v value.
fn parse_recovery_id(v: u8) -> Result<RecoveryId, SignatureError> {
    let normalized = match v {
        0 | 1 => v,
        27 | 28 => v - 27,
        _ => return Err(SignatureError::InvalidRecoveryId(v)),
    };
    RecoveryId::from_byte(normalized).ok_or(SignatureError::InvalidRecoveryId(v))
}
