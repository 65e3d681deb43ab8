use crate::container::config::{RuntimeConfig, StoreKind};
use inventory_engine::{InMemoryRecordStore, RecordStore, StoreError, StoreTransaction, StoreView};

#[cfg(feature = "rocksdb")]
use super::rocksdb_store::{RocksDbConfig, RocksDbRecordStore};

/// Record store chosen at startup.
pub enum StoreBackend {
    Memory(InMemoryRecordStore),
    #[cfg(feature = "rocksdb")]
    RocksDb(RocksDbRecordStore),
}

impl StoreBackend {
    /// Open the backend named by `config.store`.
    pub fn open(config: &RuntimeConfig) -> Result<Self, StoreError> {
        match config.store {
            StoreKind::Memory => Ok(StoreBackend::Memory(InMemoryRecordStore::new())),
            #[cfg(feature = "rocksdb")]
            StoreKind::RocksDb => {
                let rocks = RocksDbConfig {
                    sync_writes: config.sync_writes,
                    ..RocksDbConfig::new(config.db_path())
                };
                Ok(StoreBackend::RocksDb(RocksDbRecordStore::open(rocks)?))
            }
            #[cfg(not(feature = "rocksdb"))]
            StoreKind::RocksDb => Err(StoreError::Backend(
                "rocksdb backend is not compiled in".to_string(),
            )),
        }
    }

    pub fn kind(&self) -> StoreKind {
        match self {
            StoreBackend::Memory(_) => StoreKind::Memory,
            #[cfg(feature = "rocksdb")]
            StoreBackend::RocksDb(_) => StoreKind::RocksDb,
        }
    }
}

impl RecordStore for StoreBackend {
    fn read<R, E, F>(&self, f: F) -> Result<R, E>
    where
        F: FnOnce(&dyn StoreView) -> Result<R, E>,
        E: From<StoreError>,
    {
        match self {
            StoreBackend::Memory(store) => store.read(f),
            #[cfg(feature = "rocksdb")]
            StoreBackend::RocksDb(store) => store.read(f),
        }
    }

    fn run_in_transaction<R, E, F>(&self, f: F) -> Result<R, E>
    where
        F: FnOnce(&mut dyn StoreTransaction) -> Result<R, E>,
        E: From<StoreError>,
    {
        match self {
            StoreBackend::Memory(store) => store.run_in_transaction(f),
            #[cfg(feature = "rocksdb")]
            StoreBackend::RocksDb(store) => store.run_in_transaction(f),
        }
    }

    fn reset(&self) -> Result<(), StoreError> {
        match self {
            StoreBackend::Memory(store) => store.reset(),
            #[cfg(feature = "rocksdb")]
            StoreBackend::RocksDb(store) => store.reset(),
        }
    }
}
