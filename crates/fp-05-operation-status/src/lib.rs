//! # Operation Status
//!
//! Pull-based state machine over a submitted transaction:
//!
//! ```text
//! Pending --receipt, success, event decoded--> Completed(receipt)
//!    |     --receipt, success, no event-------> Failed(1, "failed to parse receipt")
//!    +-----receipt, reverted-------------------> Failed(1, revert reason)
//! ```
//!
//! No timeout is applied inside [`OperationStatusApi::poll_status`];
//! [`OperationStatusApi::wait_for_completion`] adds a bounded loop whose
//! exhaustion is a local [`StatusError::Timeout`].

pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

pub use config::PollerConfig;
pub use domain::errors::StatusError;
pub use domain::status::{resolve, Observation};
pub use ports::inbound::OperationStatusApi;
pub use service::OperationStatusPoller;
