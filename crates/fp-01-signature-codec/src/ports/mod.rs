//! # Ports Layer
//!
//! - **Inbound (Driving)**: API that upstream collaborators use

pub mod inbound;
