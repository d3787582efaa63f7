//! # Signature Codec Service
//!
//! Implements [`SignatureCodecApi`] on top of the domain layer and records
//! verification outcomes.

use crate::domain::ecdsa;
use crate::domain::errors::SignatureError;
use crate::domain::messages::{self, MessageFields};
use crate::domain::signed::SignedMessage;
use crate::domain::typed_data::{Eip712Domain, TypedPayload};
use crate::ports::inbound::SignatureCodecApi;
use fp_telemetry::{metric_inc, SIGNATURE_VERIFICATIONS};
use k256::ecdsa::SigningKey;
use shared_types::{Address, FinId, Hash, Receipt};
use tracing::warn;

/// Stateless signature codec.
#[derive(Debug, Clone, Default)]
pub struct SignatureCodecService;

impl SignatureCodecService {
    /// Create a new codec.
    pub fn new() -> Self {
        Self
    }
}

fn record<T>(result: &Result<T, SignatureError>, valid: impl FnOnce(&T) -> bool) {
    let label = match result {
        Ok(value) if valid(value) => "valid",
        Ok(_) | Err(SignatureError::SignerMismatch { .. }) => "invalid",
        Err(_) => "malformed",
    };
    metric_inc!(SIGNATURE_VERIFICATIONS, &[label]);
}

impl SignatureCodecApi for SignatureCodecService {
    fn build_message(
        &self,
        primary_type: &str,
        fields: MessageFields,
    ) -> Result<TypedPayload, SignatureError> {
        messages::build_message(primary_type, fields)
    }

    fn hash(&self, domain: &Eip712Domain, payload: &TypedPayload) -> Result<Hash, SignatureError> {
        payload.signing_hash(domain)
    }

    fn sign(
        &self,
        domain: &Eip712Domain,
        payload: &TypedPayload,
        key: &SigningKey,
    ) -> Result<String, SignatureError> {
        ecdsa::sign_hash(&payload.signing_hash(domain)?, key)
    }

    fn verify(
        &self,
        domain: &Eip712Domain,
        payload: &TypedPayload,
        signer: &Address,
        signature: &str,
    ) -> Result<bool, SignatureError> {
        let result = payload
            .signing_hash(domain)
            .and_then(|digest| ecdsa::verify(&digest, signature, signer));
        record(&result, |ok| *ok);
        result
    }

    fn verify_signed(&self, signed: &SignedMessage, signer: &FinId) -> Result<(), SignatureError> {
        let result = signed.verify_signer(signer);
        if let Err(e) = &result {
            warn!(
                primary_type = %signed.message.primary_type(),
                signer = %signer,
                error = %e,
                "[fp-01] signed message rejected"
            );
        }
        record(&result, |_| true);
        result
    }

    fn receipt_proof(&self, receipt: &Receipt) -> TypedPayload {
        messages::receipt_proof(receipt)
    }
}
