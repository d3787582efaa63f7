//! # Signed Messages
//!
//! An investor authorization together with the domain it was signed under
//! and the wire signature.

use super::ecdsa;
use super::errors::SignatureError;
use super::messages::InvestmentMessage;
use super::typed_data::Eip712Domain;
use shared_types::{FinId, Hash};

/// A signed investor authorization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedMessage {
    /// Domain the signature was produced under.
    pub domain: Eip712Domain,
    /// The authorization.
    pub message: InvestmentMessage,
    /// Hex `r ‖ s`, no `0x`.
    pub signature: String,
}

impl SignedMessage {
    /// Bundle a message with its signature.
    pub fn new(domain: Eip712Domain, message: InvestmentMessage, signature: impl Into<String>) -> Self {
        Self {
            domain,
            message,
            signature: signature.into(),
        }
    }

    /// Digest the signature covers.
    pub fn hash(&self) -> Result<Hash, SignatureError> {
        self.message.typed_payload().signing_hash(&self.domain)
    }

    /// Check the signature was made by the key behind `signer`.
    pub fn verify_signer(&self, signer: &FinId) -> Result<(), SignatureError> {
        let expected = ecdsa::fin_id_to_address(signer)?;
        ecdsa::verify_signer(&self.hash()?, &self.signature, expected)
    }

    /// Signature with the `0x` marker the ledger expects.
    pub fn signature_for_ledger(&self) -> String {
        format!("0x{}", self.signature.trim_start_matches("0x"))
    }
}
