//! # Stockroom Container
//!
//! Owns the configured record store, the process lock on its data directory
//! and the inventory service built on top of them.
//!
//! ```text
//!   RuntimeConfig ──► DataDirLock (rocksdb only)
//!                 └─► StoreBackend ──► StoreGate ──► InventoryService
//! ```

pub mod config;

pub use config::{ConfigError, RuntimeConfig, StoreKind};

use crate::adapters::{DataDirLock, LockError, StoreBackend};
use inventory_engine::{InventoryService, RecordStore, StoreError, StoreGate, SystemTimeSource};
use shared_types::Actor;
use thiserror::Error;
use tracing::{info, warn};

pub type StockroomService = InventoryService<StoreGate<StoreBackend>, SystemTimeSource>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Lock(#[from] LockError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct Stockroom {
    // dropped before the lock
    service: StockroomService,
    config: RuntimeConfig,
    _lock: Option<DataDirLock>,
}

impl Stockroom {
    pub fn open(config: RuntimeConfig) -> Result<Self, RuntimeError> {
        config.validate()?;

        let lock = match config.store {
            StoreKind::Memory => None,
            StoreKind::RocksDb => Some(DataDirLock::acquire(&config.data_dir)?),
        };
        let backend = StoreBackend::open(&config)?;
        info!(
            "[stockroom] {} store ready, operator {}",
            backend.kind(),
            config.operator
        );

        Ok(Self {
            service: InventoryService::new(StoreGate::new(backend), SystemTimeSource),
            config,
            _lock: lock,
        })
    }

    pub fn service(&self) -> &StockroomService {
        &self.service
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn operator(&self) -> Actor {
        self.config.operator.clone()
    }

    /// Clear every table once in-flight operations have finished.
    pub fn reset(&self) -> Result<(), StoreError> {
        warn!("[stockroom] resetting all inventory records");
        self.service.store().reset()
    }

    /// Close the backend and open it again from configuration.
    pub fn reopen(&self) -> Result<(), StoreError> {
        let config = &self.config;
        self.service.store().reopen(|current| {
            drop(current);
            StoreBackend::open(config)
        })
    }
}
