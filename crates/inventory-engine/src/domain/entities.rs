//! # Inventory Entities
//!
//! The mutable records of the stockroom. Audit facts live in `audit`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared_types::{
    CatalogEntryId, DeliveryId, DeliveryLineId, DeliveryStatus, IdentifierId, IdentifierStatus,
    Money, Timestamp, TrackingMode,
};

/// A sellable product version. `tracking_mode` is fixed once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: CatalogEntryId,
    pub name: String,
    pub ean: Option<String>,
    pub tracking_mode: TrackingMode,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The clearance fields of an identifier, captured together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClearanceSnapshot {
    pub is_clearance: bool,
    pub price: Option<Money>,
    pub reason: Option<String>,
}

impl ClearanceSnapshot {
    pub fn off() -> Self {
        Self::default()
    }

    pub fn on(price: Option<Money>, reason: Option<String>) -> Self {
        Self {
            is_clearance: true,
            price,
            reason,
        }
    }
}

/// One physical tracked unit.
///
/// Exactly one of `imei` / `serial_number` is populated, matching the
/// tracking mode of the current catalog entry. The `original_*` fields are
/// written at intake and never change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceIdentifier {
    pub id: IdentifierId,
    pub catalog_entry_id: CatalogEntryId,
    pub original_catalog_entry_id: CatalogEntryId,
    pub delivery_id: Option<DeliveryId>,
    pub imei: Option<String>,
    pub serial_number: Option<String>,
    pub original_imei: Option<String>,
    pub original_serial_number: Option<String>,
    pub status: IdentifierStatus,
    pub is_clearance: bool,
    pub clearance_price: Option<Money>,
    pub clearance_reason: Option<String>,
    pub received_damaged: bool,
    pub damage_description: Option<String>,
    pub purchase_price: Option<Money>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl DeviceIdentifier {
    pub fn clearance(&self) -> ClearanceSnapshot {
        ClearanceSnapshot {
            is_clearance: self.is_clearance,
            price: self.clearance_price,
            reason: self.clearance_reason.clone(),
        }
    }

    pub fn set_clearance(&mut self, snapshot: ClearanceSnapshot) {
        self.is_clearance = snapshot.is_clearance;
        self.clearance_price = snapshot.price;
        self.clearance_reason = snapshot.reason;
    }

    /// The current imei or serial, whichever is set.
    pub fn label(&self) -> Option<&str> {
        self.imei.as_deref().or(self.serial_number.as_deref())
    }

    pub fn is_identifier_swapped(&self) -> bool {
        self.imei != self.original_imei || self.serial_number != self.original_serial_number
    }

    pub fn is_product_version_swapped(&self) -> bool {
        self.catalog_entry_id != self.original_catalog_entry_id
    }

    /// Current imei/serial match either given value.
    pub fn holds_any(&self, imei: Option<&str>, serial: Option<&str>) -> bool {
        let hit = |value: Option<&str>| {
            value.is_some_and(|v| {
                self.imei.as_deref() == Some(v) || self.serial_number.as_deref() == Some(v)
            })
        };
        hit(imei) || hit(serial)
    }
}

/// On-hand quantity of a bulk-counted catalog entry. Keyed by the entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkStockRecord {
    pub catalog_entry_id: CatalogEntryId,
    pub quantity: i64,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delivery {
    pub id: DeliveryId,
    /// `WS` followed by a zero-padded sequence, e.g. `WS0042`.
    pub delivery_number: String,
    pub delivery_date: NaiveDate,
    pub supplier: Option<String>,
    pub status: DeliveryStatus,
    pub created_at: Timestamp,
}

impl Delivery {
    pub const NUMBER_PREFIX: &'static str = "WS";

    pub fn format_number(sequence: u64) -> String {
        format!("{}{:04}", Self::NUMBER_PREFIX, sequence)
    }

    /// Sequence part of a delivery number, if it is well formed.
    pub fn parse_number(number: &str) -> Option<u64> {
        number.strip_prefix(Self::NUMBER_PREFIX)?.parse().ok()
    }
}

/// A registration of `quantity` units of one catalog entry. Immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryLine {
    pub id: DeliveryLineId,
    pub delivery_id: DeliveryId,
    pub catalog_entry_id: CatalogEntryId,
    pub quantity: u32,
    pub unit_price: Money,
    pub created_at: Timestamp,
}
