//! # Receipt Parser
//!
//! Decodes a mined transaction's event logs into a canonical [`Receipt`].
//!
//! Parsing is a pure function of the logs, the contract interface and the
//! block timestamp. A transaction with no operator event yields `None`,
//! which callers report as a parse failure rather than a revert.
//!
//! [`Receipt`]: shared_types::Receipt

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::errors::ParseError;
pub use domain::events::AdapterEvent;
pub use ports::inbound::ReceiptDecoder;
pub use service::ReceiptParser;
