//! # Adapters Module
//!
//! ## Modules
//!
//! - `backend`: `StoreBackend`, the record store selected by configuration
//! - `lock`: exclusive process lock on the data directory
//! - `rocksdb_store`: durable RocksDB record store (feature `rocksdb`)

pub mod backend;
pub mod lock;
#[cfg(feature = "rocksdb")]
pub mod rocksdb_store;

pub use backend::StoreBackend;
pub use lock::{DataDirLock, LockError};
#[cfg(feature = "rocksdb")]
pub use rocksdb_store::{RocksDbConfig, RocksDbRecordStore};
