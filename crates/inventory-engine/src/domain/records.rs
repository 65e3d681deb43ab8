//! # Persisted Record Layout
//!
//! Maps each record type onto a store table and a `u64` key, and encodes
//! records with bincode.

use super::audit::*;
use super::entities::*;
use super::errors::StoreError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared_types::{CatalogEntryId, DeliveryId, DeliveryLineId, IdentifierId};

/// Logical tables of the stockroom store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Table {
    CatalogEntries,
    DeviceIdentifiers,
    BulkStock,
    Deliveries,
    DeliveryLines,
    StatusHistory,
    IdentifierHistory,
    ProductVersionHistory,
    BulkStockHistory,
    ClearanceHistory,
}

impl Table {
    pub const ALL: [Table; 10] = [
        Table::CatalogEntries,
        Table::DeviceIdentifiers,
        Table::BulkStock,
        Table::Deliveries,
        Table::DeliveryLines,
        Table::StatusHistory,
        Table::IdentifierHistory,
        Table::ProductVersionHistory,
        Table::BulkStockHistory,
        Table::ClearanceHistory,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Table::CatalogEntries => "catalog_entries",
            Table::DeviceIdentifiers => "device_identifiers",
            Table::BulkStock => "bulk_stock",
            Table::Deliveries => "deliveries",
            Table::DeliveryLines => "delivery_lines",
            Table::StatusHistory => "status_history",
            Table::IdentifierHistory => "identifier_history",
            Table::ProductVersionHistory => "product_version_history",
            Table::BulkStockHistory => "bulk_stock_history",
            Table::ClearanceHistory => "clearance_history",
        }
    }
}

/// A record stored under a `u64` key in one table.
pub trait Record: Serialize + DeserializeOwned {
    const TABLE: Table;

    fn key(&self) -> u64;

    fn encode(&self) -> Result<Vec<u8>, StoreError> {
        bincode::serialize(self).map_err(|e| StoreError::Codec {
            table: Self::TABLE.name(),
            message: e.to_string(),
        })
    }

    fn decode(bytes: &[u8]) -> Result<Self, StoreError> {
        bincode::deserialize(bytes).map_err(|e| StoreError::Codec {
            table: Self::TABLE.name(),
            message: e.to_string(),
        })
    }
}

/// A record whose key is allocated from the table's sequence on insert.
pub trait Sequenced: Record {
    fn assign_key(&mut self, key: u64);
}

macro_rules! sequenced {
    ($ty:ty, $table:expr, |$rec:ident| $get:expr, |$slot:ident, $key:ident| $set:expr) => {
        impl Record for $ty {
            const TABLE: Table = $table;

            fn key(&self) -> u64 {
                let $rec = self;
                $get
            }
        }

        impl Sequenced for $ty {
            fn assign_key(&mut self, $key: u64) {
                let $slot = self;
                $set;
            }
        }
    };
}

sequenced!(CatalogEntry, Table::CatalogEntries, |r| r.id.0, |r, k| r.id = CatalogEntryId(k));
sequenced!(DeviceIdentifier, Table::DeviceIdentifiers, |r| r.id.0, |r, k| r.id = IdentifierId(k));
sequenced!(Delivery, Table::Deliveries, |r| r.id.0, |r, k| r.id = DeliveryId(k));
sequenced!(DeliveryLine, Table::DeliveryLines, |r| r.id.0, |r, k| r.id = DeliveryLineId(k));
sequenced!(StatusHistory, Table::StatusHistory, |r| r.id, |r, k| r.id = k);
sequenced!(IdentifierHistory, Table::IdentifierHistory, |r| r.id, |r, k| r.id = k);
sequenced!(ProductVersionHistory, Table::ProductVersionHistory, |r| r.id, |r, k| r.id = k);
sequenced!(BulkStockHistory, Table::BulkStockHistory, |r| r.id, |r, k| r.id = k);
sequenced!(ClearanceHistory, Table::ClearanceHistory, |r| r.id, |r, k| r.id = k);

impl Record for BulkStockRecord {
    const TABLE: Table = Table::BulkStock;

    fn key(&self) -> u64 {
        self.catalog_entry_id.0
    }
}
