//! # Adapters Layer

pub mod contract;
