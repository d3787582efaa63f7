//! # Expected-Signer Table
//!
//! Keyed by (primary type, leg, phase). Every cell names the signing slot,
//! the direction of movement and which amount the request must match.
//!
//! | Primary type | Leg | Phase | Signer | Moves | Amount |
//! |---|---|---|---|---|---|
//! | non-Loan | Asset | any | seller | seller → buyer | asset |
//! | non-Loan | Settlement | any | buyer | buyer → seller | settlement |
//! | PrimarySale | Settlement | Close | seller (issuer) | buyer → seller | settlement |
//! | Loan | Asset | Initiate | seller (borrower) | seller → buyer | asset |
//! | Loan | Settlement | Initiate | buyer (lender) | buyer → seller | borrowed |
//! | Loan | Asset | Close | buyer (lender) | buyer → seller | asset |
//! | Loan | Settlement | Close | seller (borrower) | seller → buyer | returned |

use super::entities::Slot;
use shared_types::{Leg, Phase, PrimaryType};

/// Which signed amount a request's quantity is checked against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AmountSource {
    /// `asset.amount`
    Asset,
    /// `settlement.amount`
    Settlement,
    /// `loanTerms.borrowedMoneyAmount`
    Borrowed,
    /// `loanTerms.returnedMoneyAmount`
    Returned,
}

/// One cell of the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LegRule {
    /// Slot whose signature authorizes the movement.
    pub signer: Slot,
    /// Slot the value leaves.
    pub source: Slot,
    /// Slot the value reaches.
    pub destination: Slot,
    /// Amount the quantity must equal.
    pub amount: AmountSource,
}

const fn rule(signer: Slot, source: Slot, destination: Slot, amount: AmountSource) -> LegRule {
    LegRule {
        signer,
        source,
        destination,
        amount,
    }
}

/// Look up the rule for a cell.
pub fn expected_rule(primary_type: PrimaryType, leg: Leg, phase: Phase) -> LegRule {
    use AmountSource as A;
    use Slot::{Buyer, Seller};

    match (primary_type, leg, phase) {
        (PrimaryType::Loan, Leg::Asset, Phase::Initiate) => rule(Seller, Seller, Buyer, A::Asset),
        (PrimaryType::Loan, Leg::Settlement, Phase::Initiate) => {
            rule(Buyer, Buyer, Seller, A::Borrowed)
        }
        (PrimaryType::Loan, Leg::Asset, Phase::Close) => rule(Buyer, Buyer, Seller, A::Asset),
        (PrimaryType::Loan, Leg::Settlement, Phase::Close) => {
            rule(Seller, Seller, Buyer, A::Returned)
        }
        (PrimaryType::PrimarySale, Leg::Settlement, Phase::Close) => {
            rule(Seller, Buyer, Seller, A::Settlement)
        }
        (_, Leg::Asset, _) => rule(Seller, Seller, Buyer, A::Asset),
        (_, Leg::Settlement, _) => rule(Buyer, Buyer, Seller, A::Settlement),
    }
}
