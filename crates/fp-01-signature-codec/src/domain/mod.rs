//! # Domain Layer
//!
//! Pure typed-data and cryptographic logic with no I/O dependencies.

pub mod ecdsa;
pub mod errors;
pub mod messages;
pub mod signed;
pub mod typed_data;
