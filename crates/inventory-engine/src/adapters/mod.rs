//! # Adapters Module
//!
//! ## Modules
//!
//! - `overlay`: buffered write set shared by every store backend
//! - `memory`: `InMemoryRecordStore` for tests and ephemeral runs
//! - `gate`: `StoreGate`, draining in-flight operations for reset / reopen
//! - `time`: system clock

pub mod gate;
pub mod memory;
pub mod overlay;
pub mod time;

pub use gate::StoreGate;
pub use memory::InMemoryRecordStore;
pub use overlay::{ChangeSet, OverlayTransaction, SequencedView};
pub use time::SystemTimeSource;
