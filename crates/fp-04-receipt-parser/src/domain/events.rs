//! # Operator Contract Events
//!
//! Typed view of the five events a settled operation can emit.

use super::errors::ParseError;
use shared_types::abi::{decode, encode, AbiValue};
use shared_types::contract::{
    asset_type_at, execution_context_from_value, execution_context_value, string_at,
};
use shared_types::{
    to_0x_hex, AbiError, Address, Asset, ContractEvent, ExecutionContext, FinId, Hash, Log,
    OperationType, Receipt, TradeDetails, TransactionDetails,
};

/// A decoded operator-contract event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AdapterEvent {
    /// Mint.
    Issue {
        asset: Asset,
        to: FinId,
        quantity: String,
        ctx: ExecutionContext,
    },
    /// Owner-to-owner move.
    Transfer {
        asset: Asset,
        from: FinId,
        to: FinId,
        quantity: String,
        ctx: ExecutionContext,
    },
    /// Burn, directly or out of a hold.
    Redeem {
        asset: Asset,
        owner: FinId,
        quantity: String,
        operation_id: String,
        ctx: ExecutionContext,
    },
    /// Escrow.
    Hold {
        asset: Asset,
        owner: FinId,
        quantity: String,
        operation_id: String,
        ctx: ExecutionContext,
    },
    /// Escrow released; `to` is absent when the hold went back to nobody.
    Release {
        asset: Asset,
        from: FinId,
        to: Option<FinId>,
        quantity: String,
        operation_id: String,
        ctx: ExecutionContext,
    },
}

impl AdapterEvent {
    /// Decode a log. `contract`, when given, must be the emitter.
    pub fn decode(log: &Log, contract: Option<&Address>) -> Result<Self, ParseError> {
        let topic = log.topics.first().ok_or(ParseError::MissingTopic)?;
        let kind = ContractEvent::from_topic(topic)
            .ok_or_else(|| ParseError::UnknownTopic(to_0x_hex(topic)))?;
        if let Some(contract) = contract {
            if &log.address != contract {
                return Err(ParseError::ForeignContract(to_0x_hex(&log.address)));
            }
        }

        let values = decode(&kind.inputs(), &log.data)?;
        let asset = Asset::new(string_at(&values, 0, "assetId")?, asset_type_at(&values, 1)?);
        let fin_id = |i: usize, what: &str| -> Result<FinId, ParseError> {
            Ok(FinId::parse(&string_at(&values, i, what)?)?)
        };
        let text = |i: usize, what: &str| string_at(&values, i, what);
        let ctx = || -> Result<ExecutionContext, ParseError> {
            let last = values
                .last()
                .ok_or_else(|| AbiError::UnexpectedLayout("ExecutionContext".to_string()))?;
            Ok(execution_context_from_value(last)?)
        };

        Ok(match kind {
            ContractEvent::Issue => Self::Issue {
                asset,
                to: fin_id(2, "toFinId")?,
                quantity: text(3, "quantity")?,
                ctx: ctx()?,
            },
            ContractEvent::Transfer => Self::Transfer {
                asset,
                from: fin_id(2, "fromFinId")?,
                to: fin_id(3, "toFinId")?,
                quantity: text(4, "quantity")?,
                ctx: ctx()?,
            },
            ContractEvent::Redeem => Self::Redeem {
                asset,
                owner: fin_id(2, "ownerFinId")?,
                quantity: text(3, "quantity")?,
                operation_id: text(4, "operationId")?,
                ctx: ctx()?,
            },
            ContractEvent::Hold => Self::Hold {
                asset,
                owner: fin_id(2, "finId")?,
                quantity: text(3, "quantity")?,
                operation_id: text(4, "operationId")?,
                ctx: ctx()?,
            },
            ContractEvent::Release => {
                let to = text(3, "toFinId")?;
                Self::Release {
                    asset,
                    from: fin_id(2, "fromFinId")?,
                    to: if to.is_empty() { None } else { Some(FinId::parse(&to)?) },
                    quantity: text(4, "quantity")?,
                    operation_id: text(5, "operationId")?,
                    ctx: ctx()?,
                }
            }
        })
    }

    /// Encode as a log emitted by `contract`.
    pub fn to_log(&self, contract: Address) -> Log {
        let asset = self.asset();
        let mut values = vec![
            AbiValue::string(asset.asset_id.clone()),
            AbiValue::uint(u64::from(asset.asset_type.code())),
        ];
        let fin = |id: &FinId| AbiValue::string(id.as_str());
        match self {
            Self::Issue { to, quantity, .. } => {
                values.extend([fin(to), AbiValue::string(quantity.clone())])
            }
            Self::Transfer { from, to, quantity, .. } => {
                values.extend([fin(from), fin(to), AbiValue::string(quantity.clone())])
            }
            Self::Redeem { owner, quantity, operation_id, .. }
            | Self::Hold { owner, quantity, operation_id, .. } => values.extend([
                fin(owner),
                AbiValue::string(quantity.clone()),
                AbiValue::string(operation_id.clone()),
            ]),
            Self::Release { from, to, quantity, operation_id, .. } => values.extend([
                fin(from),
                AbiValue::string(to.as_ref().map(FinId::as_str).unwrap_or_default()),
                AbiValue::string(quantity.clone()),
                AbiValue::string(operation_id.clone()),
            ]),
        }
        values.push(execution_context_value(self.ctx()));
        Log::new(contract, vec![self.kind().topic()], encode(&values))
    }

    /// Interface event this value belongs to.
    pub fn kind(&self) -> ContractEvent {
        match self {
            Self::Issue { .. } => ContractEvent::Issue,
            Self::Transfer { .. } => ContractEvent::Transfer,
            Self::Redeem { .. } => ContractEvent::Redeem,
            Self::Hold { .. } => ContractEvent::Hold,
            Self::Release { .. } => ContractEvent::Release,
        }
    }

    /// Asset the event concerns.
    pub fn asset(&self) -> &Asset {
        match self {
            Self::Issue { asset, .. }
            | Self::Transfer { asset, .. }
            | Self::Redeem { asset, .. }
            | Self::Hold { asset, .. }
            | Self::Release { asset, .. } => asset,
        }
    }

    fn ctx(&self) -> &ExecutionContext {
        match self {
            Self::Issue { ctx, .. }
            | Self::Transfer { ctx, .. }
            | Self::Redeem { ctx, .. }
            | Self::Hold { ctx, .. }
            | Self::Release { ctx, .. } => ctx,
        }
    }

    /// Receipt operation type.
    pub fn operation_type(&self) -> OperationType {
        match self {
            Self::Issue { .. } => OperationType::Issue,
            Self::Transfer { .. } => OperationType::Transfer,
            Self::Redeem { .. } => OperationType::Redeem,
            Self::Hold { .. } => OperationType::Hold,
            Self::Release { .. } => OperationType::Release,
        }
    }

    /// Build the canonical receipt for transaction `tx_hash`.
    pub fn into_receipt(self, tx_hash: &Hash, timestamp: u64) -> Receipt {
        let operation_type = self.operation_type();
        let (asset, source, destination, quantity, operation_id, ctx) = match self {
            Self::Issue { asset, to, quantity, ctx } => (asset, None, Some(to), quantity, None, ctx),
            Self::Transfer { asset, from, to, quantity, ctx } => {
                (asset, Some(from), Some(to), quantity, None, ctx)
            }
            Self::Redeem { asset, owner, quantity, operation_id, ctx }
            | Self::Hold { asset, owner, quantity, operation_id, ctx } => {
                (asset, Some(owner), None, quantity, Some(operation_id), ctx)
            }
            Self::Release { asset, from, to, quantity, operation_id, ctx } => {
                (asset, Some(from), to, quantity, Some(operation_id), ctx)
            }
        };

        Receipt {
            id: to_0x_hex(tx_hash),
            operation_type,
            asset,
            source,
            destination,
            quantity,
            timestamp,
            trade_details: TradeDetails {
                execution_context: (!ctx.is_none()).then_some(ctx),
            },
            transaction_details: TransactionDetails {
                operation_id: operation_id.filter(|id| !id.is_empty()),
                transaction_id: to_0x_hex(tx_hash),
            },
        }
    }
}
