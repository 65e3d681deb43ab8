//! # Inventory Service
//!
//! The main service implementing `InventoryApi`.
//!
//! ## Architecture
//!
//! This service:
//! 1. Runs every mutating operation as one `run_in_transaction` closure
//! 2. Validates completely before the first write
//! 3. Appends the audit row for every mutation inside the same closure
//! 4. Serves read models from a single consistent read view
//!
//! Operations are split by workflow:
//!
//! | Module | Operations |
//! |--------|------------|
//! | `catalog` | create / update catalog entries |
//! | `identifiers` | status, identifier value, catalog entry, clearance |
//! | `bulk` | bulk stock adjustments |
//! | `intake` | deliveries, delivery lines, booking |
//! | `assessment` | damage assessment |
//! | `disposition` | damaged unit disposition |
//! | `queries` | read models |
//! | `audit` | audit ledger writes |

mod assessment;
mod audit;
mod bulk;
mod catalog;
mod disposition;
mod identifiers;
mod intake;
mod queries;


use crate::domain::entities::{BulkStockRecord, CatalogEntry, Delivery, DeviceIdentifier};
use crate::domain::errors::{EntityKind, InventoryError};
use crate::domain::requests::*;
use crate::domain::views::*;
use crate::ports::inbound::InventoryApi;
use crate::ports::outbound::{RecordStore, RecordView, StoreTransaction, StoreView, TimeSource};
use inventory_telemetry::metrics;
use shared_types::{
    Actor, CatalogEntryId, DeliveryId, DeliveryStatus, IdentifierId, IdentifierStatus, Timestamp,
};
use tracing::debug;

/// The Inventory Service.
pub struct InventoryService<S, T>
where
    S: RecordStore,
    T: TimeSource,
{
    store: S,
    time_source: T,
}

impl<S, T> InventoryService<S, T>
where
    S: RecordStore,
    T: TimeSource,
{
    pub fn new(store: S, time_source: T) -> Self {
        Self { store, time_source }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run one mutating operation and account for its outcome.
    fn mutate<R, F>(&self, operation: &'static str, f: F) -> Result<R, InventoryError>
    where
        F: FnOnce(&mut dyn StoreTransaction, Timestamp) -> Result<R, InventoryError>,
    {
        let now = self.time_source.now();
        let result = self.store.run_in_transaction(|tx| f(tx, now));
        match &result {
            Ok(_) => metrics::record_mutation(operation),
            Err(e) => {
                metrics::record_rejection(operation, e.kind().as_str());
                debug!("[stockroom] {} rejected: {}", operation, e);
            }
        }
        result
    }

    fn query<R, F>(&self, f: F) -> Result<R, InventoryError>
    where
        F: FnOnce(&dyn StoreView) -> Result<R, InventoryError>,
    {
        self.store.read(f)
    }
}

/// Who and why, stamped onto every audit row of one operation.
#[derive(Debug, Clone)]
pub(crate) struct Stamp {
    pub actor: Actor,
    pub note: Option<String>,
    pub at: Timestamp,
}

impl Stamp {
    pub fn new(actor: Actor, note: Option<String>, at: Timestamp) -> Self {
        Self { actor, note, at }
    }

    /// Same actor and time, different note.
    pub fn with_note(&self, note: impl Into<String>) -> Self {
        Self {
            actor: self.actor.clone(),
            note: Some(note.into()),
            at: self.at,
        }
    }
}

/// Entity lookups that fail with `NotFound`.
pub(crate) trait Lookups: StoreView {
    fn identifier(&self, id: IdentifierId) -> Result<DeviceIdentifier, InventoryError> {
        self.get::<DeviceIdentifier>(id.0)?
            .ok_or_else(|| InventoryError::not_found(EntityKind::Identifier, id))
    }

    fn catalog_entry(&self, id: CatalogEntryId) -> Result<CatalogEntry, InventoryError> {
        self.get::<CatalogEntry>(id.0)?
            .ok_or_else(|| InventoryError::not_found(EntityKind::CatalogEntry, id))
    }

    fn delivery(&self, id: DeliveryId) -> Result<Delivery, InventoryError> {
        self.get::<Delivery>(id.0)?
            .ok_or_else(|| InventoryError::not_found(EntityKind::Delivery, id))
    }
}

impl<V: StoreView + ?Sized> Lookups for V {}

pub(crate) fn require_in_stock(unit: &DeviceIdentifier) -> Result<(), InventoryError> {
    if unit.status != IdentifierStatus::InStock {
        return Err(InventoryError::InvalidState {
            entity: EntityKind::Identifier,
            id: unit.id.0,
            current: unit.status.as_str(),
            required: IdentifierStatus::InStock.as_str(),
        });
    }
    Ok(())
}

pub(crate) fn require_concept(delivery: &Delivery) -> Result<(), InventoryError> {
    if delivery.status != DeliveryStatus::Concept {
        return Err(InventoryError::InvalidState {
            entity: EntityKind::Delivery,
            id: delivery.id.0,
            current: delivery.status.as_str(),
            required: DeliveryStatus::Concept.as_str(),
        });
    }
    Ok(())
}

impl<S, T> InventoryApi for InventoryService<S, T>
where
    S: RecordStore,
    T: TimeSource,
{
    fn create_catalog_entry(
        &self,
        request: NewCatalogEntry,
    ) -> Result<CatalogEntry, InventoryError> {
        self.mutate("create_catalog_entry", |tx, now| {
            catalog::create(tx, request, now)
        })
    }

    fn update_catalog_entry(
        &self,
        request: UpdateCatalogEntryRequest,
    ) -> Result<CatalogEntry, InventoryError> {
        self.mutate("update_catalog_entry", |tx, now| {
            catalog::update(tx, request, now)
        })
    }

    fn change_status(
        &self,
        request: ChangeStatusRequest,
    ) -> Result<DeviceIdentifier, InventoryError> {
        self.mutate("change_status", |tx, now| {
            identifiers::change_status(tx, request, now)
        })
    }

    fn change_identifier_value(
        &self,
        request: ChangeIdentifierValueRequest,
    ) -> Result<DeviceIdentifier, InventoryError> {
        self.mutate("change_identifier_value", |tx, now| {
            identifiers::change_identifier_value(tx, request, now)
        })
    }

    fn change_catalog_entry(
        &self,
        request: ChangeCatalogEntryRequest,
    ) -> Result<DeviceIdentifier, InventoryError> {
        self.mutate("change_catalog_entry", |tx, now| {
            identifiers::change_catalog_entry(tx, request, now)
        })
    }

    fn toggle_clearance(
        &self,
        request: ToggleClearanceRequest,
    ) -> Result<DeviceIdentifier, InventoryError> {
        self.mutate("toggle_clearance", |tx, now| {
            identifiers::toggle_clearance(tx, request, now)
        })
    }

    fn adjust_bulk_stock(
        &self,
        request: AdjustBulkStockRequest,
    ) -> Result<BulkStockRecord, InventoryError> {
        self.mutate("adjust_bulk_stock", |tx, now| bulk::adjust(tx, request, now))
    }

    fn create_delivery(&self, request: NewDelivery) -> Result<Delivery, InventoryError> {
        self.mutate("create_delivery", |tx, now| {
            intake::create_delivery(tx, request, now)
        })
    }

    fn add_delivery_line(
        &self,
        request: AddDeliveryLineRequest,
    ) -> Result<DeliveryLineReceipt, InventoryError> {
        let receipt = self.mutate("add_delivery_line", |tx, now| {
            intake::add_delivery_line(tx, request, now)
        })?;
        metrics::record_units_received(receipt.created_identifiers.len() as u64);
        Ok(receipt)
    }

    fn book_delivery(&self, delivery_id: DeliveryId) -> Result<BookingOutcome, InventoryError> {
        self.mutate("book_delivery", |tx, now| {
            intake::book_delivery(tx, delivery_id, now)
        })
    }

    fn submit_damage_assessment(
        &self,
        request: DamageAssessmentRequest,
    ) -> Result<AssessmentSummary, InventoryError> {
        self.mutate("submit_damage_assessment", |tx, now| {
            assessment::submit(tx, request, now)
        })
    }

    fn disposition_damaged_units(
        &self,
        request: DispositionRequest,
    ) -> Result<DispositionReport, InventoryError> {
        let report = self.mutate("disposition_damaged_units", |tx, now| {
            disposition::resolve(tx, request, now)
        })?;
        metrics::record_units_dispositioned(report.action.as_str(), report.outcomes.len() as u64);
        Ok(report)
    }

    fn list_identifiers(
        &self,
        filter: &IdentifierFilter,
    ) -> Result<Vec<IdentifierListing>, InventoryError> {
        self.query(|view| queries::list_identifiers(view, filter))
    }

    fn identifier_detail(&self, id: IdentifierId) -> Result<IdentifierDetail, InventoryError> {
        self.query(|view| queries::identifier_detail(view, id))
    }

    fn stock_overview(&self) -> Result<Vec<StockLine>, InventoryError> {
        self.query(queries::stock_overview)
    }

    fn catalog_entry_detail(
        &self,
        id: CatalogEntryId,
    ) -> Result<CatalogEntryDetail, InventoryError> {
        self.query(|view| queries::catalog_entry_detail(view, id))
    }

    fn list_deliveries(&self) -> Result<Vec<DeliverySummary>, InventoryError> {
        self.query(queries::list_deliveries)
    }

    fn delivery_detail(&self, id: DeliveryId) -> Result<DeliveryDetail, InventoryError> {
        self.query(|view| queries::delivery_detail(view, id))
    }

    fn list_clearance(&self) -> Result<Vec<IdentifierListing>, InventoryError> {
        self.query(queries::list_clearance)
    }
}
