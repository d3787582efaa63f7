//! # Domain Layer
//!
//! Error classification, nonce cache and the submission state machine.

pub mod classify;
pub mod errors;
pub mod nonce;
pub mod state;
