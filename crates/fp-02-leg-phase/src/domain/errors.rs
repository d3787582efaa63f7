//! # Validation Errors

use crate::domain::entities::PartyRole;
use fp_01_signature_codec::SignatureError;
use shared_types::{AssetType, FinId};
use thiserror::Error;

/// A request does not match the authorization it claims.
///
/// Raised before any chain call is made.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Requested asset is neither the asset nor the settlement term
    #[error("asset not found in signed message: {asset_id} ({asset_type:?})")]
    AssetNotFound {
        asset_id: String,
        asset_type: AssetType,
    },

    /// Signature was not made by the party the table requires
    #[error("signer mismatch: expected signature by {role} {fin_id}: {cause}")]
    SignerMismatch {
        role: PartyRole,
        fin_id: FinId,
        cause: SignatureError,
    },

    /// Signature could not be checked at all
    #[error("invalid signature: {0}")]
    Signature(SignatureError),

    /// Request source differs from the signed source
    #[error("source mismatch: expected {expected}, got {actual}")]
    SourceMismatch { expected: FinId, actual: FinId },

    /// Request destination differs from the signed destination
    #[error("destination mismatch: expected {expected}, got {actual}")]
    DestinationMismatch { expected: FinId, actual: FinId },

    /// Request quantity differs from the signed amount
    #[error("quantity mismatch: expected {expected}, got {actual}")]
    QuantityMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Name of the first mismatched field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::AssetNotFound { .. } => "asset",
            Self::SignerMismatch { .. } | Self::Signature(_) => "signer",
            Self::SourceMismatch { .. } => "source",
            Self::DestinationMismatch { .. } => "destination",
            Self::QuantityMismatch { .. } => "quantity",
        }
    }
}
