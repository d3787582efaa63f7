//! # Authorization Messages
//!
//! One strongly-typed variant per primary type. Each variant names its two
//! counterparties the way its schema does; the operator contract only sees
//! two positional slots, *buyer* and *seller*:
//!
//! | Primary type | buyer slot | seller slot |
//! |--------------|------------|-------------|
//! | PrimarySale | buyer | issuer |
//! | Buying, Selling, Transfer, PrivateOffer | buyer | seller |
//! | Redemption | issuer | seller |
//! | Loan | lender | borrower |
//!
//! The separate `Receipt` proof schema lives at the bottom of this module.

use super::errors::SignatureError;
use super::typed_data::{struct_type, TypedPayload, Types};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use shared_types::{is_decimal, FinId, LoanTerms, PrimaryType, Receipt, Term, TypeError};

// =============================================================================
// INVESTMENT MESSAGES
// =============================================================================

/// Two-party trade between a buyer and a seller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Trade {
    /// Per-message nonce chosen by the network.
    pub nonce: String,
    /// Buying party.
    pub buyer: FinId,
    /// Selling party.
    pub seller: FinId,
    /// Asset term.
    pub asset: Term,
    /// Settlement term.
    pub settlement: Term,
}

/// Sale of newly issued units by their issuer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrimarySale {
    /// Per-message nonce.
    pub nonce: String,
    /// Investor receiving the units.
    pub buyer: FinId,
    /// Issuer selling the units.
    pub issuer: FinId,
    /// Asset term.
    pub asset: Term,
    /// Settlement term.
    pub settlement: Term,
}

/// Sale of units back to their issuer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Redemption {
    /// Per-message nonce.
    pub nonce: String,
    /// Holder redeeming the units.
    pub seller: FinId,
    /// Issuer buying the units back.
    pub issuer: FinId,
    /// Asset term.
    pub asset: Term,
    /// Settlement term.
    pub settlement: Term,
}

/// Two-phase loan of an asset against cash.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Loan {
    /// Per-message nonce.
    pub nonce: String,
    /// Party that delivers the asset at Initiate and takes it back at Close.
    pub borrower: FinId,
    /// Party that pays cash at Initiate and is repaid at Close.
    pub lender: FinId,
    /// Asset term.
    pub asset: Term,
    /// Settlement term.
    pub settlement: Term,
    /// Loan schedule and cash amounts.
    pub loan_terms: LoanTerms,
}

/// An investor authorization, one variant per primary type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvestmentMessage {
    /// Issuer sells new units.
    PrimarySale(PrimarySale),
    /// Secondary buy.
    Buying(Trade),
    /// Secondary sell.
    Selling(Trade),
    /// Holder sells back to the issuer.
    Redemption(Redemption),
    /// Peer-to-peer transfer (also `RequestForTransfer`).
    Transfer(Trade),
    /// Private offer.
    PrivateOffer(Trade),
    /// Two-phase loan.
    Loan(Loan),
}

/// Untyped field set accepted by [`build_message`].
///
/// `buyer` and `seller` are slot positions; see the module table for how
/// each primary type names them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageFields {
    /// Per-message nonce.
    pub nonce: String,
    /// Buyer-slot party.
    pub buyer: FinId,
    /// Seller-slot party.
    pub seller: FinId,
    /// Asset term.
    pub asset: Term,
    /// Settlement term.
    pub settlement: Term,
    /// Loan terms; only read for `Loan`.
    #[serde(default)]
    pub loan_terms: Option<LoanTerms>,
}

impl InvestmentMessage {
    /// Assemble a message from slot-positioned fields.
    ///
    /// A `Loan` needs loan terms with decimal borrowed and returned amounts.
    pub fn from_fields(
        primary_type: PrimaryType,
        fields: MessageFields,
    ) -> Result<Self, SignatureError> {
        let MessageFields {
            nonce,
            buyer,
            seller,
            asset,
            settlement,
            loan_terms,
        } = fields;
        let trade = |nonce, buyer, seller, asset, settlement| Trade {
            nonce,
            buyer,
            seller,
            asset,
            settlement,
        };
        let message = match primary_type {
            PrimaryType::PrimarySale => Self::PrimarySale(PrimarySale {
                nonce,
                buyer,
                issuer: seller,
                asset,
                settlement,
            }),
            PrimaryType::Redemption => Self::Redemption(Redemption {
                nonce,
                seller,
                issuer: buyer,
                asset,
                settlement,
            }),
            PrimaryType::Loan => {
                let loan_terms = loan_terms.ok_or_else(|| SignatureError::MissingField {
                    struct_name: PrimaryType::Loan.as_str().to_string(),
                    field: "loanTerms".to_string(),
                })?;
                for amount in [
                    &loan_terms.borrowed_money_amount,
                    &loan_terms.returned_money_amount,
                ] {
                    if !is_decimal(amount) {
                        return Err(TypeError::InvalidAmount(amount.clone()).into());
                    }
                }
                Self::Loan(Loan {
                    nonce,
                    borrower: seller,
                    lender: buyer,
                    asset,
                    settlement,
                    loan_terms,
                })
            }
            PrimaryType::Buying => Self::Buying(trade(nonce, buyer, seller, asset, settlement)),
            PrimaryType::Selling => Self::Selling(trade(nonce, buyer, seller, asset, settlement)),
            PrimaryType::Transfer => Self::Transfer(trade(nonce, buyer, seller, asset, settlement)),
            PrimaryType::PrivateOffer => {
                Self::PrivateOffer(trade(nonce, buyer, seller, asset, settlement))
            }
        };
        Ok(message)
    }

    /// Primary type of this message.
    pub fn primary_type(&self) -> PrimaryType {
        match self {
            Self::PrimarySale(_) => PrimaryType::PrimarySale,
            Self::Buying(_) => PrimaryType::Buying,
            Self::Selling(_) => PrimaryType::Selling,
            Self::Redemption(_) => PrimaryType::Redemption,
            Self::Transfer(_) => PrimaryType::Transfer,
            Self::PrivateOffer(_) => PrimaryType::PrivateOffer,
            Self::Loan(_) => PrimaryType::Loan,
        }
    }

    /// Message nonce.
    pub fn nonce(&self) -> &str {
        match self {
            Self::PrimarySale(m) => &m.nonce,
            Self::Redemption(m) => &m.nonce,
            Self::Loan(m) => &m.nonce,
            Self::Buying(m) | Self::Selling(m) | Self::Transfer(m) | Self::PrivateOffer(m) => {
                &m.nonce
            }
        }
    }

    /// Asset term.
    pub fn asset(&self) -> &Term {
        match self {
            Self::PrimarySale(m) => &m.asset,
            Self::Redemption(m) => &m.asset,
            Self::Loan(m) => &m.asset,
            Self::Buying(m) | Self::Selling(m) | Self::Transfer(m) | Self::PrivateOffer(m) => {
                &m.asset
            }
        }
    }

    /// Settlement term.
    pub fn settlement(&self) -> &Term {
        match self {
            Self::PrimarySale(m) => &m.settlement,
            Self::Redemption(m) => &m.settlement,
            Self::Loan(m) => &m.settlement,
            Self::Buying(m) | Self::Selling(m) | Self::Transfer(m) | Self::PrivateOffer(m) => {
                &m.settlement
            }
        }
    }

    /// Loan terms, for `Loan` only.
    pub fn loan_terms(&self) -> Option<&LoanTerms> {
        match self {
            Self::Loan(m) => Some(&m.loan_terms),
            _ => None,
        }
    }

    /// Party in the buyer slot.
    pub fn buyer(&self) -> &FinId {
        match self {
            Self::PrimarySale(m) => &m.buyer,
            Self::Redemption(m) => &m.issuer,
            Self::Loan(m) => &m.lender,
            Self::Buying(m) | Self::Selling(m) | Self::Transfer(m) | Self::PrivateOffer(m) => {
                &m.buyer
            }
        }
    }

    /// Party in the seller slot.
    pub fn seller(&self) -> &FinId {
        match self {
            Self::PrimarySale(m) => &m.issuer,
            Self::Redemption(m) => &m.seller,
            Self::Loan(m) => &m.borrower,
            Self::Buying(m) | Self::Selling(m) | Self::Transfer(m) | Self::PrivateOffer(m) => {
                &m.seller
            }
        }
    }

    /// Counterparties in schema order, with their schema names.
    fn parties(&self) -> [(&'static str, &FinId); 2] {
        match self {
            Self::PrimarySale(m) => [("buyer", &m.buyer), ("issuer", &m.issuer)],
            Self::Redemption(m) => [("seller", &m.seller), ("issuer", &m.issuer)],
            Self::Loan(m) => [("borrower", &m.borrower), ("lender", &m.lender)],
            Self::Buying(m) | Self::Selling(m) | Self::Transfer(m) | Self::PrivateOffer(m) => {
                [("buyer", &m.buyer), ("seller", &m.seller)]
            }
        }
    }

    /// Struct definitions for this message's schema.
    pub fn types(&self) -> Types {
        let [(first, _), (second, _)] = self.parties();
        let mut primary = struct_type(&[
            ("nonce", "string"),
            (first, "FinId"),
            (second, "FinId"),
            ("asset", "Term"),
            ("settlement", "Term"),
        ]);

        let mut types = Types::new();
        types.insert("FinId".to_string(), struct_type(&[("idkey", "string")]));
        types.insert(
            "Term".to_string(),
            struct_type(&[
                ("assetId", "string"),
                ("assetType", "string"),
                ("amount", "string"),
            ]),
        );
        if self.loan_terms().is_some() {
            primary.extend(struct_type(&[("loanTerms", "LoanTerms")]));
            types.insert(
                "LoanTerms".to_string(),
                struct_type(&[
                    ("openTime", "string"),
                    ("closeTime", "string"),
                    ("borrowedMoneyAmount", "string"),
                    ("returnedMoneyAmount", "string"),
                ]),
            );
        }
        types.insert(self.primary_type().as_str().to_string(), primary);
        types
    }

    /// Message values matching [`InvestmentMessage::types`].
    pub fn to_json(&self) -> Value {
        let mut message = Map::new();
        message.insert("nonce".to_string(), json!(self.nonce()));
        for (name, fin_id) in self.parties() {
            message.insert(name.to_string(), json!({ "idkey": fin_id.as_str() }));
        }
        message.insert("asset".to_string(), term_json(self.asset()));
        message.insert("settlement".to_string(), term_json(self.settlement()));
        if let Some(loan) = self.loan_terms() {
            message.insert(
                "loanTerms".to_string(),
                json!({
                    "openTime": loan.open_time,
                    "closeTime": loan.close_time,
                    "borrowedMoneyAmount": loan.borrowed_money_amount,
                    "returnedMoneyAmount": loan.returned_money_amount,
                }),
            );
        }
        Value::Object(message)
    }

    /// `{primaryType, types, message}` ready for hashing.
    pub fn typed_payload(&self) -> TypedPayload {
        TypedPayload {
            primary_type: self.primary_type().as_str().to_string(),
            types: self.types(),
            message: self.to_json(),
        }
    }
}

fn term_json(term: &Term) -> Value {
    json!({
        "assetId": term.asset_id,
        "assetType": term.asset_type.as_str(),
        "amount": term.amount,
    })
}

/// Build the typed-data payload for a primary type given by name.
///
/// `RequestForTransfer` is accepted as `Transfer`.
pub fn build_message(
    primary_type: &str,
    fields: MessageFields,
) -> Result<TypedPayload, SignatureError> {
    let primary: PrimaryType = primary_type
        .parse()
        .map_err(|_| SignatureError::UnsupportedPrimaryType(primary_type.to_string()))?;
    Ok(InvestmentMessage::from_fields(primary, fields)?.typed_payload())
}

// =============================================================================
// RECEIPT PROOF
// =============================================================================

/// Primary type name of the receipt attestation schema.
pub const RECEIPT_PRIMARY_TYPE: &str = "Receipt";

/// Struct definitions of the receipt attestation schema.
pub fn receipt_types() -> Types {
    let mut types = Types::new();
    types.insert(
        RECEIPT_PRIMARY_TYPE.to_string(),
        struct_type(&[
            ("id", "string"),
            ("source", "Source"),
            ("destination", "Destination"),
            ("asset", "Asset"),
            ("tradeDetails", "TradeDetails"),
            ("transactionDetails", "TransactionDetails"),
            ("quantity", "string"),
        ]),
    );
    let account = struct_type(&[("accountType", "string"), ("finId", "string")]);
    types.insert("Source".to_string(), account.clone());
    types.insert("Destination".to_string(), account);
    types.insert(
        "Asset".to_string(),
        struct_type(&[("assetId", "string"), ("assetType", "string")]),
    );
    types.insert(
        "TradeDetails".to_string(),
        struct_type(&[("executionContext", "ExecutionContext")]),
    );
    types.insert(
        "ExecutionContext".to_string(),
        struct_type(&[
            ("executionPlanId", "string"),
            ("instructionSequenceNumber", "string"),
        ]),
    );
    types.insert(
        "TransactionDetails".to_string(),
        struct_type(&[("operationId", "string"), ("transactionId", "string")]),
    );
    types
}

/// Attestation payload for a completed operation's receipt.
///
/// Absent optional fields are encoded as empty strings.
pub fn receipt_proof(receipt: &Receipt) -> TypedPayload {
    let account = |fin_id: Option<&FinId>| match fin_id {
        Some(id) => json!({ "accountType": "finId", "finId": id.as_str() }),
        None => json!({ "accountType": "", "finId": "" }),
    };
    let (plan_id, sequence) = receipt
        .trade_details
        .execution_context
        .as_ref()
        .map(|ctx| (ctx.plan_id.clone(), ctx.sequence.to_string()))
        .unwrap_or_default();

    let message = json!({
        "id": receipt.id,
        "source": account(receipt.source.as_ref()),
        "destination": account(receipt.destination.as_ref()),
        "asset": {
            "assetId": receipt.asset.asset_id,
            "assetType": receipt.asset.asset_type.as_str(),
        },
        "tradeDetails": {
            "executionContext": {
                "executionPlanId": plan_id,
                "instructionSequenceNumber": sequence,
            }
        },
        "transactionDetails": {
            "operationId": receipt.transaction_details.operation_id.clone().unwrap_or_default(),
            "transactionId": receipt.transaction_details.transaction_id,
        },
        "quantity": receipt.quantity,
    });

    TypedPayload {
        primary_type: RECEIPT_PRIMARY_TYPE.to_string(),
        types: receipt_types(),
        message,
    }
}
