//! # Leg/Phase Service
//!
//! Runs resolution, signer verification and request validation in order
//! and records every rejection.

use crate::domain::entities::{LegPhase, LegPhaseRequest};
use crate::domain::errors::ValidationError;
use crate::domain::resolver;
use crate::ports::inbound::LegPhaseApi;
use crate::ports::outbound::SignatureVerifier;
use fp_01_signature_codec::{SignatureCodecService, SignatureError, SignedMessage};
use fp_telemetry::{metric_inc, VALIDATION_REJECTIONS};
use shared_types::Asset;
use tracing::{debug, warn};

/// Leg/phase resolver backed by a signature verifier.
#[derive(Debug, Clone, Default)]
pub struct LegPhaseService<V = SignatureCodecService> {
    verifier: V,
}

impl<V: SignatureVerifier> LegPhaseService<V> {
    /// Create a service around `verifier`.
    pub fn new(verifier: V) -> Self {
        Self { verifier }
    }

    fn resolve(
        &self,
        asset: &Asset,
        signed: &SignedMessage,
        request: &LegPhaseRequest,
    ) -> Result<LegPhase, ValidationError> {
        let (resolved, rule) = resolver::resolve(asset, &signed.message, request)?;

        let signer = &resolved.expected_signer;
        self.verifier
            .verify_signed(signed, &signer.fin_id)
            .map_err(|cause| match cause {
                SignatureError::SignerMismatch { .. } => ValidationError::SignerMismatch {
                    role: signer.role,
                    fin_id: signer.fin_id.clone(),
                    cause,
                },
                other => ValidationError::Signature(other),
            })?;

        resolver::validate_request(&signed.message, &rule, request)?;
        Ok(resolved)
    }
}

impl<V: SignatureVerifier> LegPhaseApi for LegPhaseService<V> {
    fn resolve_leg_phase(
        &self,
        asset: &Asset,
        signed: &SignedMessage,
        request: &LegPhaseRequest,
    ) -> Result<LegPhase, ValidationError> {
        let primary_type = signed.message.primary_type();
        match self.resolve(asset, signed, request) {
            Ok(resolved) => {
                debug!(
                    primary_type = %primary_type,
                    leg = ?resolved.leg,
                    phase = ?resolved.phase,
                    signer = %resolved.expected_signer.role,
                    "[fp-02] leg/phase resolved"
                );
                Ok(resolved)
            }
            Err(e) => {
                metric_inc!(VALIDATION_REJECTIONS, &[e.field()]);
                warn!(
                    primary_type = %primary_type,
                    asset_id = %asset.asset_id,
                    field = e.field(),
                    error = %e,
                    "[fp-02] request rejected"
                );
                Err(e)
            }
        }
    }
}
