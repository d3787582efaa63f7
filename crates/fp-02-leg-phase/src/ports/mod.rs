//! # Ports Layer
//!
//! Hexagonal architecture ports.

pub mod inbound;
pub mod outbound;
