//! # Inbound Ports (Driving Ports)
//!
//! The operations the stockroom exposes to its front-end. Each mutating call
//! is one transaction: validation happens first, and a rejected call leaves
//! no trace in either the records or the audit ledger.

use crate::domain::entities::{BulkStockRecord, CatalogEntry, Delivery, DeviceIdentifier};
use crate::domain::errors::InventoryError;
use crate::domain::requests::*;
use crate::domain::views::*;
use shared_types::{CatalogEntryId, DeliveryId, IdentifierId};

/// Primary API of the inventory engine.
pub trait InventoryApi: Send + Sync {
    // ===== CATALOG =====

    /// Create a catalog entry. The name must not be blank.
    fn create_catalog_entry(&self, request: NewCatalogEntry)
        -> Result<CatalogEntry, InventoryError>;

    /// Rename an entry or change its EAN.
    ///
    /// ## Errors
    ///
    /// - `TrackingModeMismatch`: the request names a different tracking mode
    fn update_catalog_entry(
        &self,
        request: UpdateCatalogEntryRequest,
    ) -> Result<CatalogEntry, InventoryError>;

    // ===== DEVICE IDENTIFIER STATE MACHINE =====

    /// Move a unit to any status and record the change.
    ///
    /// ## Errors
    ///
    /// - `NotFound`: unknown identifier
    /// - `InvalidState`: `expected_current` was given and no longer holds
    fn change_status(&self, request: ChangeStatusRequest)
        -> Result<DeviceIdentifier, InventoryError>;

    /// Re-tag an in-stock unit with a new imei or serial.
    ///
    /// ## Errors
    ///
    /// - `InvalidState`: unit is not `in_stock`
    /// - `NoChange`: supplied values equal the current ones
    /// - `MissingRequiredField`: the tracking mode's field was not supplied
    /// - `DuplicateIdentifier`: another unit already holds the value
    fn change_identifier_value(
        &self,
        request: ChangeIdentifierValueRequest,
    ) -> Result<DeviceIdentifier, InventoryError>;

    /// Move an in-stock unit to another catalog entry of the same tracking mode.
    fn change_catalog_entry(
        &self,
        request: ChangeCatalogEntryRequest,
    ) -> Result<DeviceIdentifier, InventoryError>;

    /// Toggle (or with `remove`, clear) the clearance flag of an in-stock unit.
    fn toggle_clearance(
        &self,
        request: ToggleClearanceRequest,
    ) -> Result<DeviceIdentifier, InventoryError>;

    // ===== BULK STOCK =====

    /// Apply a signed quantity change to a bulk entry.
    ///
    /// ## Errors
    ///
    /// - `InsufficientStock`: the result would be negative
    fn adjust_bulk_stock(
        &self,
        request: AdjustBulkStockRequest,
    ) -> Result<BulkStockRecord, InventoryError>;

    // ===== DELIVERY INTAKE =====

    /// Open a concept delivery with the next `WS` number.
    fn create_delivery(&self, request: NewDelivery) -> Result<Delivery, InventoryError>;

    /// Register a line and receive its units (tracked) or quantity (bulk).
    fn add_delivery_line(
        &self,
        request: AddDeliveryLineRequest,
    ) -> Result<DeliveryLineReceipt, InventoryError>;

    /// Book a delivery, or report the units that still need assessment.
    fn book_delivery(&self, delivery_id: DeliveryId) -> Result<BookingOutcome, InventoryError>;

    /// Record damage decisions for every tracked unit and book the delivery.
    ///
    /// ## Errors
    ///
    /// - `IncompleteAssessment`: some unit of the delivery has no decision
    /// - `NotFound`: a decision names a unit outside the delivery
    /// - `InvalidState`: a unit of the delivery is no longer `in_stock`
    fn submit_damage_assessment(
        &self,
        request: DamageAssessmentRequest,
    ) -> Result<AssessmentSummary, InventoryError>;

    // ===== DAMAGE DISPOSITION =====

    /// Resolve units flagged `defective_at_delivery`. All ids are validated
    /// before any unit changes.
    fn disposition_damaged_units(
        &self,
        request: DispositionRequest,
    ) -> Result<DispositionReport, InventoryError>;

    // ===== READ MODELS =====

    fn list_identifiers(
        &self,
        filter: &IdentifierFilter,
    ) -> Result<Vec<IdentifierListing>, InventoryError>;

    fn identifier_detail(&self, id: IdentifierId) -> Result<IdentifierDetail, InventoryError>;

    fn stock_overview(&self) -> Result<Vec<StockLine>, InventoryError>;

    fn catalog_entry_detail(
        &self,
        id: CatalogEntryId,
    ) -> Result<CatalogEntryDetail, InventoryError>;

    fn list_deliveries(&self) -> Result<Vec<DeliverySummary>, InventoryError>;

    fn delivery_detail(&self, id: DeliveryId) -> Result<DeliveryDetail, InventoryError>;

    /// In-stock units flagged for clearance.
    fn list_clearance(&self) -> Result<Vec<IdentifierListing>, InventoryError>;
}
