//! # Ports Layer
//!
//! ## Hexagonal Architecture
//!
//! - `inbound.rs` - Driving port (operations exposed to the front-end)
//! - `outbound.rs` - Driven ports (record store, clock)

pub mod inbound;
pub mod outbound;
