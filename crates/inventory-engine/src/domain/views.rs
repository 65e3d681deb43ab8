//! # Views and Operation Results
//!
//! Read models returned to the presentation layer, and the receipts that
//! mutating operations hand back.

use super::audit::*;
use super::entities::*;
use super::requests::DispositionAction;
use serde::{Deserialize, Serialize};
use shared_types::{DeliveryId, IdentifierId, IdentifierStatus, TrackingMode};

// =============================================================================
// OPERATION RESULTS
// =============================================================================

/// Outcome of registering one delivery line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryLineReceipt {
    pub line: DeliveryLine,
    pub created_identifiers: Vec<IdentifierId>,
    /// Seeds carrying neither imei nor serial.
    pub skipped_seeds: usize,
    /// New bulk quantity, for untracked entries.
    pub bulk_quantity: Option<i64>,
}

/// A tracked unit waiting for its damage decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingUnit {
    pub identifier_id: IdentifierId,
    pub catalog_entry_name: String,
    pub imei: Option<String>,
    pub serial_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BookingOutcome {
    /// No tracked lines; the delivery is booked.
    Booked { delivery_id: DeliveryId },
    /// Tracked units must be assessed before the delivery can be booked.
    AssessmentRequired {
        delivery_id: DeliveryId,
        pending: Vec<PendingUnit>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentSummary {
    pub delivery_id: DeliveryId,
    pub in_stock: usize,
    pub damaged: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispositionOutcome {
    pub identifier_id: IdentifierId,
    pub old_status: IdentifierStatus,
    pub new_status: IdentifierStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispositionReport {
    pub action: DispositionAction,
    pub outcomes: Vec<DispositionOutcome>,
}

// =============================================================================
// READ MODELS
// =============================================================================

/// One row of the identifier search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifierListing {
    pub identifier: DeviceIdentifier,
    pub catalog_entry_name: String,
    pub tracking_mode: TrackingMode,
}

/// An identifier with everything that ever happened to it, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifierDetail {
    pub identifier: DeviceIdentifier,
    pub catalog_entry: CatalogEntry,
    pub original_catalog_entry: Option<CatalogEntry>,
    pub delivery: Option<Delivery>,
    pub status_history: Vec<StatusHistory>,
    pub identifier_history: Vec<IdentifierHistory>,
    pub product_version_history: Vec<ProductVersionHistory>,
    pub clearance_history: Vec<ClearanceHistory>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockLine {
    pub catalog_entry: CatalogEntry,
    /// Bulk quantity, or the number of `in_stock` units for tracked entries.
    pub stock: i64,
    pub total_identifiers: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntryDetail {
    pub entry: CatalogEntry,
    pub identifiers: Vec<DeviceIdentifier>,
    pub bulk_quantity: Option<i64>,
    pub recent_bulk_history: Vec<BulkStockHistory>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliverySummary {
    pub delivery: Delivery,
    pub line_count: usize,
    pub total_quantity: u64,
}

/// A unit received on a delivery line, with swap flags against its intake values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceivedUnit {
    pub identifier: DeviceIdentifier,
    pub is_identifier_swapped: bool,
    pub is_product_version_swapped: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryLineDetail {
    pub line: DeliveryLine,
    pub catalog_entry_name: String,
    pub tracking_mode: TrackingMode,
    pub units: Vec<ReceivedUnit>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryDetail {
    pub delivery: Delivery,
    pub lines: Vec<DeliveryLineDetail>,
}
