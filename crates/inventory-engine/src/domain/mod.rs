//! # Domain Layer
//!
//! Records, audit facts, request and view types, and the error taxonomy.
//! Nothing in here touches storage.

pub mod audit;
pub mod entities;
pub mod errors;
pub mod records;
pub mod requests;
pub mod views;

pub use audit::*;
pub use entities::*;
pub use errors::{EntityKind, ErrorKind, InventoryError, StoreError};
pub use records::{Record, Sequenced, Table};
