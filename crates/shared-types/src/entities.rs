//! # Core Domain Entities
//!
//! The FinP2P data model as it crosses subsystem boundaries.
//!
//! ## Clusters
//!
//! - **Identity**: `FinId`
//! - **Terms**: `AssetType`, `Asset`, `Term`, `LoanTerms`, `ExecutionContext`
//! - **Operation parameters**: `Leg`, `Phase`, `PrimaryType`, `ReleaseType`, `OperationParams`
//! - **Outcomes**: `Receipt`, `OperationStatus`
//!
//! Amounts are decimal strings end to end; nothing in this crate converts
//! them to floating point.

use crate::errors::TypeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Re-export U256 from primitive-types for use across all subsystems
pub use primitive_types::U256;

/// A 32-byte hash (keccak256 digests, transaction hashes).
pub type Hash = [u8; 32];

/// A 20-byte Ethereum-style address.
pub type Address = [u8; 20];

// =============================================================================
// IDENTITY
// =============================================================================

/// A participant's identity on the network: a compressed secp256k1 public
/// key, stored as lowercase hex without a `0x` prefix.
///
/// Only the encoding is validated here. Whether the bytes are a point on the
/// curve is checked when the key is used (see `fp-01-signature-codec`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FinId(String);

impl FinId {
    /// Parse a FinID from hex (with or without `0x`).
    pub fn parse(value: &str) -> Result<Self, TypeError> {
        let stripped = value.strip_prefix("0x").unwrap_or(value).to_ascii_lowercase();
        let bytes = hex::decode(&stripped).map_err(|_| TypeError::InvalidFinId(value.to_string()))?;
        if bytes.len() != 33 || !matches!(bytes[0], 0x02 | 0x03) {
            return Err(TypeError::InvalidFinId(value.to_string()));
        }
        Ok(Self(stripped))
    }

    /// Build from compressed SEC1 bytes.
    pub fn from_compressed(bytes: &[u8; 33]) -> Result<Self, TypeError> {
        Self::parse(&hex::encode(bytes))
    }

    /// Hex form (no prefix).
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compressed public key bytes.
    pub fn to_bytes(&self) -> [u8; 33] {
        let mut out = [0u8; 33];
        // Length and encoding were validated in `parse`.
        if let Ok(bytes) = hex::decode(&self.0) {
            out.copy_from_slice(&bytes);
        }
        out
    }
}

impl fmt::Display for FinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for FinId {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<FinId> for String {
    fn from(value: FinId) -> Self {
        value.0
    }
}

impl FromStr for FinId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// =============================================================================
// TERMS
// =============================================================================

/// Kind of asset a term refers to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetType {
    /// Asset registered on the FinP2P network.
    #[default]
    #[serde(rename = "finp2p")]
    FinP2P,
    /// Fiat currency (ISO code as asset id).
    #[serde(rename = "fiat")]
    Fiat,
    /// Cryptocurrency (ticker as asset id).
    #[serde(rename = "cryptocurrency")]
    Cryptocurrency,
}

impl AssetType {
    /// Label used in typed-data messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FinP2P => "finp2p",
            Self::Fiat => "fiat",
            Self::Cryptocurrency => "cryptocurrency",
        }
    }

    /// `uint8` code used by the operator contract.
    pub fn code(&self) -> u8 {
        match self {
            Self::FinP2P => 0,
            Self::Fiat => 1,
            Self::Cryptocurrency => 2,
        }
    }

    /// Inverse of [`AssetType::code`].
    pub fn from_code(code: u8) -> Result<Self, TypeError> {
        match code {
            0 => Ok(Self::FinP2P),
            1 => Ok(Self::Fiat),
            2 => Ok(Self::Cryptocurrency),
            _ => Err(TypeError::UnknownAssetType(code.to_string())),
        }
    }
}

impl FromStr for AssetType {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "finp2p" => Ok(Self::FinP2P),
            "fiat" => Ok(Self::Fiat),
            "cryptocurrency" => Ok(Self::Cryptocurrency),
            _ => Err(TypeError::UnknownAssetType(s.to_string())),
        }
    }
}

/// Asset reference without an amount.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    /// Asset identifier (e.g. `bank-us:102:<uuid>`, `USD`).
    pub asset_id: String,
    /// Asset type.
    pub asset_type: AssetType,
}

impl Asset {
    /// Create an asset reference.
    pub fn new(asset_id: impl Into<String>, asset_type: AssetType) -> Self {
        Self {
            asset_id: asset_id.into(),
            asset_type,
        }
    }
}

/// An asset together with a decimal amount.
///
/// Deserialization validates the amount; the all-empty placeholder term is
/// the only term allowed without one.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawTerm")]
pub struct Term {
    /// Asset identifier.
    pub asset_id: String,
    /// Asset type.
    pub asset_type: AssetType,
    /// Non-negative decimal string.
    pub amount: String,
}

impl Term {
    /// Create a term, validating the amount.
    pub fn new(
        asset_id: impl Into<String>,
        asset_type: AssetType,
        amount: impl Into<String>,
    ) -> Result<Self, TypeError> {
        let amount = amount.into();
        if !is_decimal(&amount) {
            return Err(TypeError::InvalidAmount(amount));
        }
        Ok(Self {
            asset_id: asset_id.into(),
            asset_type,
            amount,
        })
    }

    /// Check the amount against the asset's decimal precision.
    pub fn check_precision(&self, decimals: u32) -> Result<(), TypeError> {
        let fraction = self
            .amount
            .split_once('.')
            .map(|(_, f)| f.trim_end_matches('0'))
            .unwrap_or("");
        if fraction.len() > decimals as usize {
            return Err(TypeError::PrecisionExceeded {
                amount: self.amount.clone(),
                decimals,
            });
        }
        Ok(())
    }

    /// The asset part of the term.
    pub fn asset(&self) -> Asset {
        Asset::new(self.asset_id.clone(), self.asset_type)
    }

    /// True for the zero-value term used when a message has no settlement.
    pub fn is_empty(&self) -> bool {
        self.asset_id.is_empty() && self.amount.is_empty()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTerm {
    asset_id: String,
    asset_type: AssetType,
    amount: String,
}

impl TryFrom<RawTerm> for Term {
    type Error = TypeError;

    fn try_from(raw: RawTerm) -> Result<Self, Self::Error> {
        if raw.asset_id.is_empty() && raw.amount.is_empty() {
            return Ok(Self {
                asset_type: raw.asset_type,
                ..Self::default()
            });
        }
        Self::new(raw.asset_id, raw.asset_type, raw.amount)
    }
}

/// Returns true for non-negative decimal strings like `10`, `0.5`, `1000.00`.
pub fn is_decimal(value: &str) -> bool {
    let (int, frac) = match value.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (value, None),
    };
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    digits(int) && frac.map_or(true, digits)
}

/// Loan-specific terms. All fields empty for non-loan primary types.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanTerms {
    /// Loan open time.
    pub open_time: String,
    /// Loan close time.
    pub close_time: String,
    /// Cash amount moved at the Initiate phase.
    pub borrowed_money_amount: String,
    /// Cash amount moved at the Close phase.
    pub returned_money_amount: String,
}

impl LoanTerms {
    /// True when no loan terms are carried.
    pub fn is_empty(&self) -> bool {
        self.open_time.is_empty()
            && self.close_time.is_empty()
            && self.borrowed_money_amount.is_empty()
            && self.returned_money_amount.is_empty()
    }
}

/// Position of an on-chain call within an execution plan.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionContext {
    /// Execution plan id.
    pub plan_id: String,
    /// Instruction sequence number.
    pub sequence: u64,
}

impl ExecutionContext {
    /// Create an execution context.
    pub fn new(plan_id: impl Into<String>, sequence: u64) -> Self {
        Self {
            plan_id: plan_id.into(),
            sequence,
        }
    }

    /// The "no plan" marker encoded on-chain.
    pub fn none() -> Self {
        Self::default()
    }

    /// True when this carries no plan.
    pub fn is_none(&self) -> bool {
        self.plan_id.is_empty()
    }
}

// =============================================================================
// OPERATION PARAMETERS
// =============================================================================

macro_rules! coded_enum {
    ($name:ident, $kind:literal, { $($variant:ident = $code:literal),+ $(,)? }) => {
        impl $name {
            /// `uint8` code used by the operator contract.
            pub fn code(&self) -> u8 {
                match self {
                    $(Self::$variant => $code,)+
                }
            }

            /// Inverse of `code`.
            pub fn from_code(code: u8) -> Result<Self, TypeError> {
                match code {
                    $($code => Ok(Self::$variant),)+
                    _ => Err(TypeError::UnknownCode { kind: $kind, code }),
                }
            }
        }
    };
}

/// Which side of a trade an authorization pertains to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Leg {
    /// Asset side.
    Asset,
    /// Settlement (cash) side.
    Settlement,
}
coded_enum!(Leg, "leg", { Asset = 0, Settlement = 1 });

/// Half of a two-step lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Opening step.
    #[default]
    Initiate,
    /// Closing step.
    Close,
}
coded_enum!(Phase, "phase", { Initiate = 0, Close = 1 });

/// How a held amount is released.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseType {
    /// Release to a destination.
    #[default]
    Release,
    /// Release and burn.
    Redeem,
}
coded_enum!(ReleaseType, "release type", { Release = 0, Redeem = 1 });

/// Category of an authorized action.
///
/// `RequestForTransfer` is accepted as a legacy spelling of `Transfer` and
/// maps onto the same variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimaryType {
    /// Primary issuance sold by an issuer.
    PrimarySale,
    /// Secondary buy.
    Buying,
    /// Secondary sell.
    Selling,
    /// Redemption back to the issuer.
    Redemption,
    /// Peer-to-peer transfer.
    #[serde(alias = "RequestForTransfer")]
    Transfer,
    /// Private offer between two parties.
    PrivateOffer,
    /// Two-phase loan (repo).
    Loan,
}
coded_enum!(PrimaryType, "primary type", {
    PrimarySale = 0,
    Buying = 1,
    Selling = 2,
    Redemption = 3,
    Transfer = 4,
    PrivateOffer = 5,
    Loan = 6,
});

impl PrimaryType {
    /// Every supported primary type.
    pub const ALL: [PrimaryType; 7] = [
        Self::PrimarySale,
        Self::Buying,
        Self::Selling,
        Self::Redemption,
        Self::Transfer,
        Self::PrivateOffer,
        Self::Loan,
    ];

    /// EIP-712 struct name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PrimarySale => "PrimarySale",
            Self::Buying => "Buying",
            Self::Selling => "Selling",
            Self::Redemption => "Redemption",
            Self::Transfer => "Transfer",
            Self::PrivateOffer => "PrivateOffer",
            Self::Loan => "Loan",
        }
    }
}

impl fmt::Display for PrimaryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrimaryType {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PrimarySale" => Ok(Self::PrimarySale),
            "Buying" => Ok(Self::Buying),
            "Selling" => Ok(Self::Selling),
            "Redemption" => Ok(Self::Redemption),
            "Transfer" | "RequestForTransfer" => Ok(Self::Transfer),
            "PrivateOffer" => Ok(Self::PrivateOffer),
            "Loan" => Ok(Self::Loan),
            other => Err(TypeError::UnknownPrimaryType(other.to_string())),
        }
    }
}

/// Parameters passed to the operator contract alongside a signed investment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationParams {
    /// Leg the call concerns.
    pub leg: Leg,
    /// Primary type of the authorizing message.
    pub primary_type: PrimaryType,
    /// Lifecycle phase.
    pub phase: Phase,
    /// Hold operation id; empty for non-hold flows.
    pub operation_id: String,
    /// Release behaviour for hold flows.
    pub release_type: ReleaseType,
}

// =============================================================================
// OUTCOMES
// =============================================================================

/// Operation recorded by a receipt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    /// Mint to a destination.
    Issue,
    /// Move between owners.
    Transfer,
    /// Escrow an amount under an operation id.
    Hold,
    /// Release escrow.
    Release,
    /// Burn.
    Redeem,
}

impl OperationType {
    /// Lowercase label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Issue => "issue",
            Self::Transfer => "transfer",
            Self::Hold => "hold",
            Self::Release => "release",
            Self::Redeem => "redeem",
        }
    }
}

/// Trade-level details of a receipt.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeDetails {
    /// Execution plan position, when the call was part of a plan.
    pub execution_context: Option<ExecutionContext>,
}

/// Ledger-level details of a receipt.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDetails {
    /// Hold operation id, when present.
    pub operation_id: Option<String>,
    /// Ledger transaction hash.
    pub transaction_id: String,
}

/// Canonical, chain-derived record of a completed operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    /// Transaction hash (`0x`-prefixed).
    pub id: String,
    /// Operation recorded.
    pub operation_type: OperationType,
    /// Asset moved.
    pub asset: Asset,
    /// Source owner.
    pub source: Option<FinId>,
    /// Destination owner.
    pub destination: Option<FinId>,
    /// Decimal quantity.
    pub quantity: String,
    /// Block timestamp (seconds).
    pub timestamp: u64,
    /// Trade details.
    pub trade_details: TradeDetails,
    /// Transaction details.
    pub transaction_details: TransactionDetails,
}

/// Status of an asynchronous operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum OperationStatus {
    /// Submitted, not yet mined.
    Pending {
        /// Transaction hash (`0x`-prefixed).
        tx_hash: String,
    },
    /// Mined and decoded.
    Completed {
        /// The decoded receipt.
        receipt: Receipt,
    },
    /// Mined with failure, or undecodable.
    Failed {
        /// Error code.
        code: u32,
        /// Error message.
        message: String,
    },
}

impl OperationStatus {
    /// Completed and Failed are terminal.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending { .. })
    }
}
