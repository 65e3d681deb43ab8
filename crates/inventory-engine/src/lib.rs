//! # Inventory Engine
//!
//! The state machine and audit ledger behind the stockroom: catalog entries,
//! deliveries, individually tracked devices and bulk-counted accessories.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐    ┌─────────────────────────────────────────────┐
//! │  Runtime /   │───►│ ports::inbound::InventoryApi                │
//! │  front-end   │    │   InventoryService<S: RecordStore, T>       │
//! └──────────────┘    │   intake → assessment → disposition         │
//!                     │   state machine · bulk ledger · audit ledger│
//!                     └──────────────┬──────────────────────────────┘
//!                                    │ ports::outbound::RecordStore
//!                     ┌──────────────▼──────────────┐
//!                     │ InMemoryRecordStore         │
//!                     │ RocksDbRecordStore (runtime)│
//!                     │ StoreGate (reset / reopen)  │
//!                     └─────────────────────────────┘
//! ```
//!
//! ## Guarantees
//!
//! | Rule | Enforced in |
//! |------|-------------|
//! | Every mutation writes its audit row in the same transaction | `service` |
//! | imei / serial unique among non-null values | `service::identifiers`, `service::intake` |
//! | Bulk quantity never negative | `service::bulk` |
//! | Validation before any write | every operation |
//! | Lifecycle calls wait for in-flight operations | `adapters::gate` |
//!
//! ## Usage
//!
//! ```rust,ignore
//! let service = InventoryService::new(InMemoryRecordStore::new(), SystemTimeSource);
//! let entry = service.create_catalog_entry(NewCatalogEntry::new("Widget", TrackingMode::Serial))?;
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use adapters::{InMemoryRecordStore, StoreGate, SystemTimeSource};
pub use domain::errors::{EntityKind, ErrorKind, InventoryError, StoreError};
pub use domain::requests::*;
pub use domain::views::*;
pub use ports::inbound::InventoryApi;
pub use ports::outbound::{RecordStore, StoreTransaction, StoreView, TimeSource};
pub use service::InventoryService;
