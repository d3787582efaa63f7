//! # Integration Flows
//!
//! Every test drives the real subsystems end to end against the
//! [`InMemoryLedger`](crate::simulator::InMemoryLedger):
//!
//! ```text
//! LegPhaseService (02) ──► FinP2PContract / TransactionSubmitter (03)
//!        │                              │
//!  SignatureCodec (01)            InMemoryLedger
//!                                       │
//!                 OperationStatusPoller (05) ──► ReceiptParser (04)
//! ```
//!
//! - `flows` - issuance, trade settlement, loans, hold and release
//! - `submission` - nonce conflicts, reverts, concurrency
//! - `status` - pending, failed and timed-out operations

pub mod flows;
pub mod submission;
