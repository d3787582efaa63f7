//! # Inbound Ports (Driving Ports / API)
//!
//! The typed-data API exposed to upstream collaborators (HTTP routes,
//! settlement orchestration).

use crate::domain::errors::SignatureError;
use crate::domain::messages::MessageFields;
use crate::domain::signed::SignedMessage;
use crate::domain::typed_data::{Eip712Domain, TypedPayload};
use k256::ecdsa::SigningKey;
use shared_types::{Address, FinId, Hash, Receipt};

/// Primary Signature Codec API.
///
/// Implementations must be thread-safe (`Send + Sync`).
pub trait SignatureCodecApi: Send + Sync {
    /// Build `{primaryType, types, message}` for a primary type given by name.
    ///
    /// # Errors
    /// `UnsupportedPrimaryType` for names outside the supported set.
    fn build_message(
        &self,
        primary_type: &str,
        fields: MessageFields,
    ) -> Result<TypedPayload, SignatureError>;

    /// Domain-separated digest of a payload.
    fn hash(&self, domain: &Eip712Domain, payload: &TypedPayload) -> Result<Hash, SignatureError>;

    /// Sign a payload; returns hex `r ‖ s`.
    fn sign(
        &self,
        domain: &Eip712Domain,
        payload: &TypedPayload,
        key: &SigningKey,
    ) -> Result<String, SignatureError>;

    /// Check a payload signature against a ledger address.
    fn verify(
        &self,
        domain: &Eip712Domain,
        payload: &TypedPayload,
        signer: &Address,
        signature: &str,
    ) -> Result<bool, SignatureError>;

    /// Check a signed authorization against the claimed signer's FinID.
    fn verify_signed(&self, signed: &SignedMessage, signer: &FinId) -> Result<(), SignatureError>;

    /// Attestation payload for a completed receipt.
    fn receipt_proof(&self, receipt: &Receipt) -> TypedPayload;
}
