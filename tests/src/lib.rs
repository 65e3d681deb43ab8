//! # Stockroom Test Suite
//!
//! Scenarios that drive the engine and the runtime together, the way a shop
//! uses them over a working day.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── shop_day.rs     # intake → assessment → disposition → sale
//!     ├── concurrency.rs  # parallel callers on one service
//!     └── runtime.rs      # Stockroom container, reset, reopen, durability
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All scenarios (in-memory store)
//! cargo test -p stockroom-tests
//!
//! # Including the RocksDB durability scenarios
//! cargo test -p stockroom-tests --features rocksdb
//!
//! # Benchmarks
//! cargo bench -p stockroom-tests
//! ```

pub mod integration;
