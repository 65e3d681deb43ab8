//! # Stockroom Runtime
//!
//! Hosts the inventory engine for the `stockroom` operator CLI.
//!
//! ## Modular Structure
//!
//! - `container/` - configuration and the `Stockroom` container
//! - `adapters/` - store backends and the data directory lock
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (env, then CLI flags)
//! 2. Validate it against the compiled-in backends
//! 3. Lock the data directory (durable store only)
//! 4. Open the record store behind a `StoreGate`
//! 5. Serve operator commands through `InventoryApi`

pub mod adapters;
pub mod container;

pub use adapters::{DataDirLock, LockError, StoreBackend};
pub use container::{ConfigError, RuntimeConfig, RuntimeError, Stockroom, StockroomService, StoreKind};
