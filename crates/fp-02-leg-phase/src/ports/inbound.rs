//! # Inbound Ports (Driving Ports / API)

use crate::domain::entities::{LegPhase, LegPhaseRequest};
use crate::domain::errors::ValidationError;
use fp_01_signature_codec::SignedMessage;
use shared_types::Asset;

/// Leg/phase resolution API.
pub trait LegPhaseApi: Send + Sync {
    /// Resolve which leg and phase `request` concerns and check it against
    /// the signed authorization.
    ///
    /// Checks run in a fixed order: asset, signer, source, destination,
    /// quantity. The first failure is returned.
    fn resolve_leg_phase(
        &self,
        asset: &Asset,
        signed: &SignedMessage,
        request: &LegPhaseRequest,
    ) -> Result<LegPhase, ValidationError>;
}
