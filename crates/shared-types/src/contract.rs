//! # Operator Contract Interface
//!
//! Function and event signatures of the FinP2P operator contract, plus the
//! tuple encodings of the data model it takes as parameters.
//!
//! ## Tuples
//!
//! | Solidity struct | Layout |
//! |-----------------|--------|
//! | `Term` | `(string assetId, uint8 assetType, string amount)` |
//! | `LoanTerms` | `(string openTime, string closeTime, string borrowedMoneyAmount, string returnedMoneyAmount)` |
//! | `ExecutionContext` | `(string planId, uint256 sequence)` |
//! | `OperationParams` | `(uint8 leg, uint8 primaryType, uint8 phase, string operationId, uint8 releaseType)` |
//!
//! An `ExecutionContext` with an empty plan id means "not part of a plan".

use crate::abi::{selector, AbiType, AbiValue};
use crate::errors::AbiError;
use crate::entities::{
    AssetType, ExecutionContext, Hash, Leg, LoanTerms, OperationParams, Phase, PrimaryType,
    ReleaseType, Term,
};
use crate::hashing::keccak256;

/// `Term` tuple type.
pub fn term_type() -> AbiType {
    AbiType::Tuple(vec![AbiType::String, AbiType::Uint(8), AbiType::String])
}

/// `LoanTerms` tuple type.
pub fn loan_terms_type() -> AbiType {
    AbiType::Tuple(vec![AbiType::String; 4])
}

/// `ExecutionContext` tuple type.
pub fn execution_context_type() -> AbiType {
    AbiType::Tuple(vec![AbiType::String, AbiType::Uint(256)])
}

/// `OperationParams` tuple type.
pub fn operation_params_type() -> AbiType {
    AbiType::Tuple(vec![
        AbiType::Uint(8),
        AbiType::Uint(8),
        AbiType::Uint(8),
        AbiType::String,
        AbiType::Uint(8),
    ])
}

// =============================================================================
// FUNCTIONS
// =============================================================================

/// Operator contract functions consumed by the adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContractFunction {
    /// `associateAsset(string assetId, address token)`
    AssociateAsset,
    /// `getAssetAddress(string assetId) returns (address)`
    GetAssetAddress,
    /// `getBalance(string assetId, string finId) returns (string)`
    GetBalance,
    /// `issue(string toFinId, Term assetTerm, ExecutionContext ctx)`
    Issue,
    /// `transfer(string nonce, string sellerFinId, string buyerFinId, Term asset, Term settlement, LoanTerms loan, OperationParams op, bytes signature, ExecutionContext ctx)`
    Transfer,
    /// `redeem(string ownerFinId, Term assetTerm, ExecutionContext ctx)`
    Redeem,
    /// Same parameters as `transfer`.
    Hold,
    /// `releaseTo(string operationId, string fromFinId, string toFinId, string quantity, ExecutionContext ctx)`
    ReleaseTo,
    /// `releaseAndRedeem(string operationId, string ownerFinId, string quantity, ExecutionContext ctx)`
    ReleaseAndRedeem,
    /// `releaseBack(string operationId, ExecutionContext ctx)`
    ReleaseBack,
    /// `hashInvestment(uint8 primaryType, string nonce, string buyerFinId, string sellerFinId, Term asset, Term settlement, LoanTerms loan) returns (bytes32)`
    HashInvestment,
    /// `verifyInvestmentSignature(<hashInvestment params>, string signerFinId, bytes signature) returns (bool)`
    VerifyInvestmentSignature,
}

impl ContractFunction {
    /// Every function of the interface.
    pub const ALL: [ContractFunction; 12] = [
        Self::AssociateAsset,
        Self::GetAssetAddress,
        Self::GetBalance,
        Self::Issue,
        Self::Transfer,
        Self::Redeem,
        Self::Hold,
        Self::ReleaseTo,
        Self::ReleaseAndRedeem,
        Self::ReleaseBack,
        Self::HashInvestment,
        Self::VerifyInvestmentSignature,
    ];

    /// Solidity function name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AssociateAsset => "associateAsset",
            Self::GetAssetAddress => "getAssetAddress",
            Self::GetBalance => "getBalance",
            Self::Issue => "issue",
            Self::Transfer => "transfer",
            Self::Redeem => "redeem",
            Self::Hold => "hold",
            Self::ReleaseTo => "releaseTo",
            Self::ReleaseAndRedeem => "releaseAndRedeem",
            Self::ReleaseBack => "releaseBack",
            Self::HashInvestment => "hashInvestment",
            Self::VerifyInvestmentSignature => "verifyInvestmentSignature",
        }
    }

    /// Input parameter types.
    pub fn inputs(&self) -> Vec<AbiType> {
        use AbiType::{Address, Bytes, String, Uint};
        let investment = || {
            vec![
                String,
                String,
                String,
                term_type(),
                term_type(),
                loan_terms_type(),
            ]
        };
        match self {
            Self::AssociateAsset => vec![String, Address],
            Self::GetAssetAddress => vec![String],
            Self::GetBalance => vec![String, String],
            Self::Issue | Self::Redeem => vec![String, term_type(), execution_context_type()],
            Self::Transfer | Self::Hold => {
                let mut inputs = investment();
                inputs.extend([operation_params_type(), Bytes, execution_context_type()]);
                inputs
            }
            Self::ReleaseTo => vec![String, String, String, String, execution_context_type()],
            Self::ReleaseAndRedeem => vec![String, String, String, execution_context_type()],
            Self::ReleaseBack => vec![String, execution_context_type()],
            Self::HashInvestment => {
                let mut inputs = vec![Uint(8)];
                inputs.extend(investment());
                inputs
            }
            Self::VerifyInvestmentSignature => {
                let mut inputs = vec![Uint(8)];
                inputs.extend(investment());
                inputs.extend([String, Bytes]);
                inputs
            }
        }
    }

    /// Return types (empty for mutating functions).
    pub fn outputs(&self) -> Vec<AbiType> {
        match self {
            Self::GetAssetAddress => vec![AbiType::Address],
            Self::GetBalance => vec![AbiType::String],
            Self::HashInvestment => vec![AbiType::FixedBytes32],
            Self::VerifyInvestmentSignature => vec![AbiType::Bool],
            _ => Vec::new(),
        }
    }

    /// Canonical signature, e.g. `getBalance(string,string)`.
    pub fn signature(&self) -> String {
        canonical_signature(self.name(), &self.inputs())
    }

    /// 4-byte selector.
    pub fn selector(&self) -> [u8; 4] {
        selector(&self.signature())
    }

    /// Look up a function by selector.
    pub fn from_selector(sel: [u8; 4]) -> Result<Self, AbiError> {
        Self::ALL
            .into_iter()
            .find(|f| f.selector() == sel)
            .ok_or_else(|| AbiError::UnknownSelector(hex::encode(sel)))
    }
}

// =============================================================================
// EVENTS
// =============================================================================

/// Events emitted by the operator contract. All fields are non-indexed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContractEvent {
    /// `Issue(string assetId, uint8 assetType, string toFinId, string quantity, ExecutionContext ctx)`
    Issue,
    /// `Transfer(string assetId, uint8 assetType, string fromFinId, string toFinId, string quantity, ExecutionContext ctx)`
    Transfer,
    /// `Redeem(string assetId, uint8 assetType, string ownerFinId, string quantity, string operationId, ExecutionContext ctx)`
    Redeem,
    /// `Hold(string assetId, uint8 assetType, string finId, string quantity, string operationId, ExecutionContext ctx)`
    Hold,
    /// `Release(string assetId, uint8 assetType, string fromFinId, string toFinId, string quantity, string operationId, ExecutionContext ctx)`
    Release,
}

impl ContractEvent {
    /// Every event of the interface.
    pub const ALL: [ContractEvent; 5] = [
        Self::Issue,
        Self::Transfer,
        Self::Redeem,
        Self::Hold,
        Self::Release,
    ];

    /// Solidity event name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Issue => "Issue",
            Self::Transfer => "Transfer",
            Self::Redeem => "Redeem",
            Self::Hold => "Hold",
            Self::Release => "Release",
        }
    }

    /// Data field types.
    pub fn inputs(&self) -> Vec<AbiType> {
        use AbiType::{String, Uint};
        let mut inputs = vec![String, Uint(8)];
        match self {
            Self::Issue => inputs.extend([String, String]),
            Self::Transfer => inputs.extend([String, String, String]),
            Self::Redeem | Self::Hold => inputs.extend([String, String, String]),
            Self::Release => inputs.extend([String, String, String, String]),
        }
        inputs.push(execution_context_type());
        inputs
    }

    /// Canonical signature.
    pub fn signature(&self) -> String {
        canonical_signature(self.name(), &self.inputs())
    }

    /// Topic 0 of logs carrying this event.
    pub fn topic(&self) -> Hash {
        keccak256(self.signature().as_bytes())
    }

    /// Look up an event by topic 0.
    pub fn from_topic(topic: &Hash) -> Option<Self> {
        Self::ALL.into_iter().find(|e| &e.topic() == topic)
    }
}

fn canonical_signature(name: &str, inputs: &[AbiType]) -> String {
    let params: Vec<String> = inputs.iter().map(AbiType::canonical).collect();
    format!("{name}({})", params.join(","))
}

// =============================================================================
// TUPLE CONVERSIONS
// =============================================================================

/// Encode a term.
pub fn term_value(term: &Term) -> AbiValue {
    AbiValue::Tuple(vec![
        AbiValue::string(term.asset_id.clone()),
        AbiValue::uint(u64::from(term.asset_type.code())),
        AbiValue::string(term.amount.clone()),
    ])
}

/// Decode a term. The amount is taken as-is; the contract stores it verbatim.
pub fn term_from_value(value: &AbiValue) -> Result<Term, AbiError> {
    let fields = tuple_of(value, 3, "Term")?;
    Ok(Term {
        asset_id: string_at(fields, 0, "Term.assetId")?,
        asset_type: asset_type_at(fields, 1)?,
        amount: string_at(fields, 2, "Term.amount")?,
    })
}

/// Encode loan terms.
pub fn loan_terms_value(loan: &LoanTerms) -> AbiValue {
    AbiValue::Tuple(vec![
        AbiValue::string(loan.open_time.clone()),
        AbiValue::string(loan.close_time.clone()),
        AbiValue::string(loan.borrowed_money_amount.clone()),
        AbiValue::string(loan.returned_money_amount.clone()),
    ])
}

/// Decode loan terms.
pub fn loan_terms_from_value(value: &AbiValue) -> Result<LoanTerms, AbiError> {
    let fields = tuple_of(value, 4, "LoanTerms")?;
    Ok(LoanTerms {
        open_time: string_at(fields, 0, "LoanTerms.openTime")?,
        close_time: string_at(fields, 1, "LoanTerms.closeTime")?,
        borrowed_money_amount: string_at(fields, 2, "LoanTerms.borrowedMoneyAmount")?,
        returned_money_amount: string_at(fields, 3, "LoanTerms.returnedMoneyAmount")?,
    })
}

/// Encode an execution context.
pub fn execution_context_value(ctx: &ExecutionContext) -> AbiValue {
    AbiValue::Tuple(vec![
        AbiValue::string(ctx.plan_id.clone()),
        AbiValue::uint(ctx.sequence),
    ])
}

/// Decode an execution context.
pub fn execution_context_from_value(value: &AbiValue) -> Result<ExecutionContext, AbiError> {
    let fields = tuple_of(value, 2, "ExecutionContext")?;
    let sequence = fields[1]
        .as_u64()
        .ok_or_else(|| AbiError::UnexpectedLayout("ExecutionContext.sequence".to_string()))?;
    Ok(ExecutionContext {
        plan_id: string_at(fields, 0, "ExecutionContext.planId")?,
        sequence,
    })
}

/// Encode operation parameters.
pub fn operation_params_value(params: &OperationParams) -> AbiValue {
    AbiValue::Tuple(vec![
        AbiValue::uint(u64::from(params.leg.code())),
        AbiValue::uint(u64::from(params.primary_type.code())),
        AbiValue::uint(u64::from(params.phase.code())),
        AbiValue::string(params.operation_id.clone()),
        AbiValue::uint(u64::from(params.release_type.code())),
    ])
}

/// Decode operation parameters.
pub fn operation_params_from_value(value: &AbiValue) -> Result<OperationParams, AbiError> {
    let fields = tuple_of(value, 5, "OperationParams")?;
    let bad = |e: crate::errors::TypeError| AbiError::UnexpectedLayout(e.to_string());
    Ok(OperationParams {
        leg: Leg::from_code(code_at(fields, 0)?).map_err(bad)?,
        primary_type: PrimaryType::from_code(code_at(fields, 1)?).map_err(bad)?,
        phase: Phase::from_code(code_at(fields, 2)?).map_err(bad)?,
        operation_id: string_at(fields, 3, "OperationParams.operationId")?,
        release_type: ReleaseType::from_code(code_at(fields, 4)?).map_err(bad)?,
    })
}

/// Read a string field out of a decoded parameter list.
pub fn string_at(values: &[AbiValue], index: usize, what: &str) -> Result<String, AbiError> {
    values
        .get(index)
        .and_then(AbiValue::as_str)
        .map(str::to_string)
        .ok_or_else(|| AbiError::UnexpectedLayout(what.to_string()))
}

/// Read an asset-type code out of a decoded parameter list.
pub fn asset_type_at(values: &[AbiValue], index: usize) -> Result<AssetType, AbiError> {
    AssetType::from_code(code_at(values, index)?)
        .map_err(|e| AbiError::UnexpectedLayout(e.to_string()))
}

fn code_at(values: &[AbiValue], index: usize) -> Result<u8, AbiError> {
    values
        .get(index)
        .and_then(AbiValue::as_u64)
        .and_then(|v| u8::try_from(v).ok())
        .ok_or_else(|| AbiError::UnexpectedLayout(format!("uint8 at {index}")))
}

fn tuple_of<'a>(value: &'a AbiValue, len: usize, what: &str) -> Result<&'a [AbiValue], AbiError> {
    match value.as_tuple() {
        Some(fields) if fields.len() == len => Ok(fields),
        _ => Err(AbiError::UnexpectedLayout(what.to_string())),
    }
}
