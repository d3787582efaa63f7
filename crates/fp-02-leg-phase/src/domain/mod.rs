//! # Domain Layer
//!
//! Expected-signer table, resolution and request validation.

pub mod entities;
pub mod errors;
pub mod resolver;
pub mod table;
