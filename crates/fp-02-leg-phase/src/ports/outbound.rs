//! # Outbound Ports (Driven Ports / SPI)

use fp_01_signature_codec::{SignatureCodecApi, SignatureError, SignedMessage};
use shared_types::FinId;

/// Checks that a signed authorization was made by a given party.
pub trait SignatureVerifier: Send + Sync {
    /// `Ok(())` when `signer` produced the signature.
    fn verify_signed(&self, signed: &SignedMessage, signer: &FinId) -> Result<(), SignatureError>;
}

impl<T: SignatureCodecApi> SignatureVerifier for T {
    fn verify_signed(&self, signed: &SignedMessage, signer: &FinId) -> Result<(), SignatureError> {
        SignatureCodecApi::verify_signed(self, signed, signer)
    }
}
