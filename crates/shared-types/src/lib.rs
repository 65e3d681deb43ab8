//! # Shared Types Crate
//!
//! The vocabulary shared by every Stockroom crate.
//!
//! ## Contents
//!
//! | Module | Types |
//! |--------|-------|
//! | `entities` | Typed record ids, `Actor`, `Money`, `Timestamp` |
//! | `status` | `TrackingMode`, `IdentifierStatus`, `DeliveryStatus` |
//! | `errors` | `ParseEnumError` for textual enum input |
//!
//! Enums serialize as `snake_case` strings, the same spelling the operator
//! front-end and the persisted records use.

pub mod entities;
pub mod errors;
pub mod status;

pub use entities::*;
pub use errors::ParseEnumError;
pub use status::{DeliveryStatus, IdentifierStatus, TrackingMode};
