//! # Leg/Phase Resolver
//!
//! Decides which leg (asset or settlement) and which phase (initiate or
//! close) a ledger request concerns, names the party whose signature must
//! authorize it, and checks the request against the signed terms.
//!
//! ## Architecture
//!
//! - `domain/` - expected-signer table and pure resolution functions
//! - `ports/` - [`LegPhaseApi`] and the [`SignatureVerifier`] it depends on
//! - `service.rs` - [`LegPhaseService`], which runs the checks in order
//!
//! ## Check Order
//!
//! 1. Asset: the requested asset must be the signed asset or settlement term.
//! 2. Signer: the signature must come from the party the table names.
//! 3. Source, then destination (when given), then quantity.
//!
//! Every failure is a [`ValidationError`] raised before any chain call.

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::entities::{LegPhase, LegPhaseRequest, Party, PartyRole, Slot};
pub use domain::errors::ValidationError;
pub use domain::resolver::{detect_leg, same_asset};
pub use domain::table::{expected_rule, AmountSource, LegRule};
pub use ports::inbound::LegPhaseApi;
pub use ports::outbound::SignatureVerifier;
pub use service::LegPhaseService;
