//! # Leg/Phase Entities

use serde::{Deserialize, Serialize};
use shared_types::{FinId, Leg, OperationParams, Phase, PrimaryType, ReleaseType};
use std::fmt;

/// Positional counterparty slot of a signed message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    /// Buyer slot (buyer, lender, or issuer for Redemption).
    Buyer,
    /// Seller slot (seller, borrower, or issuer for PrimarySale).
    Seller,
}

/// Name a primary type's schema gives to a party.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartyRole {
    Buyer,
    Seller,
    Issuer,
    Borrower,
    Lender,
}

impl PartyRole {
    /// Role occupying `slot` under `primary_type`.
    pub fn of(primary_type: PrimaryType, slot: Slot) -> Self {
        match (primary_type, slot) {
            (PrimaryType::PrimarySale, Slot::Seller) => Self::Issuer,
            (PrimaryType::Redemption, Slot::Buyer) => Self::Issuer,
            (PrimaryType::Loan, Slot::Buyer) => Self::Lender,
            (PrimaryType::Loan, Slot::Seller) => Self::Borrower,
            (_, Slot::Buyer) => Self::Buyer,
            (_, Slot::Seller) => Self::Seller,
        }
    }
}

impl fmt::Display for PartyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Buyer => "buyer",
            Self::Seller => "seller",
            Self::Issuer => "issuer",
            Self::Borrower => "borrower",
            Self::Lender => "lender",
        };
        f.write_str(label)
    }
}

/// A resolved party.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    /// Role under the message's primary type.
    pub role: PartyRole,
    /// Identity.
    pub fin_id: FinId,
}

/// What the caller intends to do with the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegPhaseRequest {
    /// Owner the asset leaves.
    pub source: FinId,
    /// Owner the asset reaches, if the operation has one.
    #[serde(default)]
    pub destination: Option<FinId>,
    /// Decimal quantity.
    pub quantity: String,
    /// Explicit phase. When absent, a Loan's phase is inferred from the
    /// source; every other primary type defaults to Initiate.
    #[serde(default)]
    pub phase: Option<Phase>,
    /// Hold operation id, for hold/release flows.
    #[serde(default)]
    pub operation_id: Option<String>,
    /// Release behaviour, for hold/release flows.
    #[serde(default)]
    pub release_type: ReleaseType,
}

/// Outcome of a successful resolution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegPhase {
    /// Leg the request concerns.
    pub leg: Leg,
    /// Lifecycle phase.
    pub phase: Phase,
    /// Party whose signature authorizes this leg and phase.
    pub expected_signer: Party,
    /// Parameters to pass to the operator contract.
    pub params: OperationParams,
}
