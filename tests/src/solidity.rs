//! # Contract-Side Typed-Data Hash
//!
//! Computes investment hashes the way the operator contract does: literal
//! type strings, `abi.encode` of type hash plus field hashes, no JSON
//! schema walking. The simulator uses this as its on-chain hash, so any
//! drift from the off-chain codec shows up as a signature rejection.

use shared_types::abi::{encode, AbiValue};
use shared_types::{keccak256, Address, FinId, Hash, LoanTerms, PrimaryType, Term};

const DOMAIN_TYPE: &str =
    "EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";
const FIN_ID_TYPE: &str = "FinId(string idkey)";
const TERM_TYPE: &str = "Term(string assetId,string assetType,string amount)";
const LOAN_TERMS_TYPE: &str =
    "LoanTerms(string openTime,string closeTime,string borrowedMoneyAmount,string returnedMoneyAmount)";

fn str_hash(value: &str) -> AbiValue {
    AbiValue::FixedBytes32(keccak256(value.as_bytes()))
}

fn type_hash(signature: &str) -> AbiValue {
    AbiValue::FixedBytes32(keccak256(signature.as_bytes()))
}

fn hash_values(values: &[AbiValue]) -> AbiValue {
    AbiValue::FixedBytes32(keccak256(&encode(values)))
}

fn fin_id_hash(fin_id: &FinId) -> AbiValue {
    hash_values(&[type_hash(FIN_ID_TYPE), str_hash(fin_id.as_str())])
}

fn term_hash(term: &Term) -> AbiValue {
    hash_values(&[
        type_hash(TERM_TYPE),
        str_hash(&term.asset_id),
        str_hash(term.asset_type.as_str()),
        str_hash(&term.amount),
    ])
}

fn loan_terms_hash(loan: &LoanTerms) -> AbiValue {
    hash_values(&[
        type_hash(LOAN_TERMS_TYPE),
        str_hash(&loan.open_time),
        str_hash(&loan.close_time),
        str_hash(&loan.borrowed_money_amount),
        str_hash(&loan.returned_money_amount),
    ])
}

/// `keccak256(abi.encode(DOMAIN_TYPEHASH, ...))`
pub fn domain_separator(chain_id: u64, verifying_contract: Address) -> Hash {
    keccak256(&encode(&[
        type_hash(DOMAIN_TYPE),
        str_hash("FinP2P"),
        str_hash("1"),
        AbiValue::uint(chain_id),
        AbiValue::Address(verifying_contract),
    ]))
}

/// Primary struct type string, dependencies appended in name order.
pub fn primary_type_string(primary_type: PrimaryType) -> String {
    let (first, second) = match primary_type {
        PrimaryType::PrimarySale => ("buyer", "issuer"),
        PrimaryType::Redemption => ("seller", "issuer"),
        PrimaryType::Loan => ("borrower", "lender"),
        _ => ("buyer", "seller"),
    };
    let mut out = format!(
        "{}(string nonce,FinId {first},FinId {second},Term asset,Term settlement",
        primary_type.as_str()
    );
    if primary_type == PrimaryType::Loan {
        out.push_str(",LoanTerms loanTerms)");
        out.push_str(FIN_ID_TYPE);
        out.push_str(LOAN_TERMS_TYPE);
    } else {
        out.push(')');
        out.push_str(FIN_ID_TYPE);
    }
    out.push_str(TERM_TYPE);
    out
}

/// Fields of an investment as the contract receives them (slot order).
pub struct InvestmentFields<'a> {
    pub primary_type: PrimaryType,
    pub nonce: &'a str,
    pub buyer: &'a FinId,
    pub seller: &'a FinId,
    pub asset: &'a Term,
    pub settlement: &'a Term,
    pub loan: &'a LoanTerms,
}

/// The contract's `hashInvestment`.
pub fn investment_hash(chain_id: u64, verifying_contract: Address, f: &InvestmentFields<'_>) -> Hash {
    // Schema order differs from slot order for Redemption and Loan.
    let (first, second) = match f.primary_type {
        PrimaryType::Redemption | PrimaryType::Loan => (f.seller, f.buyer),
        _ => (f.buyer, f.seller),
    };
    let mut values = vec![
        type_hash(&primary_type_string(f.primary_type)),
        str_hash(f.nonce),
        fin_id_hash(first),
        fin_id_hash(second),
        term_hash(f.asset),
        term_hash(f.settlement),
    ];
    if f.primary_type == PrimaryType::Loan {
        values.push(loan_terms_hash(f.loan));
    }
    let struct_hash = keccak256(&encode(&values));

    let mut preimage = vec![0x19, 0x01];
    preimage.extend_from_slice(&domain_separator(chain_id, verifying_contract));
    preimage.extend_from_slice(&struct_hash);
    keccak256(&preimage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{loan_terms, Investor};
    use fp_01_signature_codec::{
        Eip712Domain, InvestmentMessage, MessageFields, SignatureCodecApi, SignatureCodecService,
    };
    use shared_types::AssetType;

    const CONTRACT: Address = [0x5f; 20];

    #[test]
    fn test_type_strings() {
        assert_eq!(
            primary_type_string(PrimaryType::Selling),
            "Selling(string nonce,FinId buyer,FinId seller,Term asset,Term settlement)\
             FinId(string idkey)Term(string assetId,string assetType,string amount)"
        );
        assert!(primary_type_string(PrimaryType::Loan)
            .starts_with("Loan(string nonce,FinId borrower,FinId lender,Term asset,Term settlement,LoanTerms loanTerms)FinId"));
    }

    #[test]
    fn test_off_chain_hash_matches_contract_for_every_primary_type() {
        let codec = SignatureCodecService::new();
        let domain = Eip712Domain::new(1337, CONTRACT);
        let buyer = Investor::random();
        let seller = Investor::random();
        let asset = Term::new("bank-us:102:9f1c", AssetType::FinP2P, "10").unwrap();
        let settlement = Term::new("USD", AssetType::Fiat, "1050.25").unwrap();
        let loan = loan_terms();

        for primary_type in PrimaryType::ALL {
            let message = InvestmentMessage::from_fields(
                primary_type,
                MessageFields {
                    nonce: "b5e2a0".to_string(),
                    buyer: buyer.fin_id.clone(),
                    seller: seller.fin_id.clone(),
                    asset: asset.clone(),
                    settlement: settlement.clone(),
                    loan_terms: Some(loan.clone()),
                },
            )
            .unwrap();
            let off_chain = codec.hash(&domain, &message.typed_payload()).unwrap();
            let on_chain = investment_hash(
                1337,
                CONTRACT,
                &InvestmentFields {
                    primary_type,
                    nonce: "b5e2a0",
                    buyer: &buyer.fin_id,
                    seller: &seller.fin_id,
                    asset: &asset,
                    settlement: &settlement,
                    loan: &loan,
                },
            );
            assert_eq!(off_chain, on_chain, "{primary_type} hash diverged");
        }
    }

    #[test]
    fn test_domain_binds_chain_and_contract() {
        assert_ne!(domain_separator(1, CONTRACT), domain_separator(2, CONTRACT));
        assert_ne!(domain_separator(1, CONTRACT), domain_separator(1, [0; 20]));
        assert_eq!(
            domain_separator(1337, CONTRACT),
            Eip712Domain::new(1337, CONTRACT).separator().unwrap()
        );
    }
}
