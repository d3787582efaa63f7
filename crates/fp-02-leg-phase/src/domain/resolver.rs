//! # Leg/Phase Resolution
//!
//! Pure functions: no signature checks and no I/O. The service layer runs
//! them in order and verifies the signature between [`resolve`] and
//! [`validate_request`].

use super::entities::{LegPhase, LegPhaseRequest, Party, PartyRole, Slot};
use super::errors::ValidationError;
use super::table::{expected_rule, AmountSource, LegRule};
use fp_01_signature_codec::InvestmentMessage;
use shared_types::{Asset, AssetType, FinId, Leg, OperationParams, Phase, PrimaryType, Term};

/// Compare an asset to a term, treating fiat USD and crypto USDC as equal.
pub fn same_asset(asset: &Asset, term: &Term) -> bool {
    fn canonical(id: &str, ty: AssetType) -> (String, AssetType) {
        match ty {
            AssetType::Fiat if id.eq_ignore_ascii_case("USD") => ("USD".to_string(), AssetType::Fiat),
            AssetType::Cryptocurrency if id.eq_ignore_ascii_case("USDC") => {
                ("USD".to_string(), AssetType::Fiat)
            }
            _ => (id.to_string(), ty),
        }
    }
    canonical(&asset.asset_id, asset.asset_type) == canonical(&term.asset_id, term.asset_type)
}

/// Asset term first, then settlement; first match wins.
pub fn detect_leg(asset: &Asset, message: &InvestmentMessage) -> Result<Leg, ValidationError> {
    if same_asset(asset, message.asset()) {
        Ok(Leg::Asset)
    } else if same_asset(asset, message.settlement()) {
        Ok(Leg::Settlement)
    } else {
        Err(ValidationError::AssetNotFound {
            asset_id: asset.asset_id.clone(),
            asset_type: asset.asset_type,
        })
    }
}

/// Party occupying a slot.
pub fn slot_party(message: &InvestmentMessage, slot: Slot) -> &FinId {
    match slot {
        Slot::Buyer => message.buyer(),
        Slot::Seller => message.seller(),
    }
}

/// Explicit phase, else for Loan the first phase whose source matches the
/// request, else Initiate.
pub fn resolve_phase(message: &InvestmentMessage, leg: Leg, request: &LegPhaseRequest) -> Phase {
    if let Some(phase) = request.phase {
        return phase;
    }
    if message.primary_type() != PrimaryType::Loan {
        return Phase::Initiate;
    }
    [Phase::Initiate, Phase::Close]
        .into_iter()
        .find(|phase| {
            let rule = expected_rule(PrimaryType::Loan, leg, *phase);
            slot_party(message, rule.source) == &request.source
        })
        .unwrap_or(Phase::Initiate)
}

/// Determine leg, phase and expected signer.
pub fn resolve(
    asset: &Asset,
    message: &InvestmentMessage,
    request: &LegPhaseRequest,
) -> Result<(LegPhase, LegRule), ValidationError> {
    let primary_type = message.primary_type();
    let leg = detect_leg(asset, message)?;
    let phase = resolve_phase(message, leg, request);
    let rule = expected_rule(primary_type, leg, phase);

    let resolved = LegPhase {
        leg,
        phase,
        expected_signer: Party {
            role: PartyRole::of(primary_type, rule.signer),
            fin_id: slot_party(message, rule.signer).clone(),
        },
        params: OperationParams {
            leg,
            primary_type,
            phase,
            operation_id: request.operation_id.clone().unwrap_or_default(),
            release_type: request.release_type,
        },
    };
    Ok((resolved, rule))
}

/// Signed amount a rule refers to.
pub fn expected_amount(message: &InvestmentMessage, amount: AmountSource) -> &str {
    match (amount, message.loan_terms()) {
        (AmountSource::Asset, _) => message.asset().amount.as_str(),
        (AmountSource::Borrowed, Some(loan)) => loan.borrowed_money_amount.as_str(),
        (AmountSource::Returned, Some(loan)) => loan.returned_money_amount.as_str(),
        (AmountSource::Settlement | AmountSource::Borrowed | AmountSource::Returned, _) => {
            message.settlement().amount.as_str()
        }
    }
}

/// Check source, destination (if given) and quantity, in that order.
pub fn validate_request(
    message: &InvestmentMessage,
    rule: &LegRule,
    request: &LegPhaseRequest,
) -> Result<(), ValidationError> {
    let source = slot_party(message, rule.source);
    if source != &request.source {
        return Err(ValidationError::SourceMismatch {
            expected: source.clone(),
            actual: request.source.clone(),
        });
    }

    if let Some(destination) = &request.destination {
        let expected = slot_party(message, rule.destination);
        if expected != destination {
            return Err(ValidationError::DestinationMismatch {
                expected: expected.clone(),
                actual: destination.clone(),
            });
        }
    }

    let amount = expected_amount(message, rule.amount);
    if amount != request.quantity {
        return Err(ValidationError::QuantityMismatch {
            expected: amount.to_string(),
            actual: request.quantity.clone(),
        });
    }
    Ok(())
}
