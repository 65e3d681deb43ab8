//! Test fixtures shared by unit tests and the scenario suite
//! (enable the `test-utils` feature from other crates).

use crate::adapters::InMemoryRecordStore;
use crate::domain::entities::{CatalogEntry, Delivery};
use crate::domain::requests::*;
use crate::domain::views::DeliveryLineReceipt;
use crate::ports::inbound::InventoryApi;
use crate::ports::outbound::TimeSource;
use crate::service::InventoryService;
use chrono::NaiveDate;
use shared_types::{Actor, CatalogEntryId, DeliveryId, Money, Timestamp, TrackingMode};
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub const START_TIME: Timestamp = 1_700_000_000;

/// Manually driven clock. Clones share the same instant.
#[derive(Debug, Clone)]
pub struct FixedTimeSource {
    now: Arc<AtomicU64>,
}

impl FixedTimeSource {
    pub fn new(now: Timestamp) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(now)),
        }
    }

    pub fn advance(&self, seconds: u64) {
        self.now.fetch_add(seconds, Ordering::SeqCst);
    }
}

impl Default for FixedTimeSource {
    fn default() -> Self {
        Self::new(START_TIME)
    }
}

impl TimeSource for FixedTimeSource {
    fn now(&self) -> Timestamp {
        self.now.load(Ordering::SeqCst)
    }
}

pub type TestService = InventoryService<InMemoryRecordStore, FixedTimeSource>;

pub fn make_test_service() -> (TestService, FixedTimeSource) {
    let clock = FixedTimeSource::default();
    (
        InventoryService::new(InMemoryRecordStore::new(), clock.clone()),
        clock,
    )
}

pub fn money(value: &str) -> Money {
    Money::from_str(value).unwrap()
}

pub fn operator() -> Actor {
    Actor::new("tester")
}

pub fn delivery_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
}

pub fn create_entry(api: &impl InventoryApi, name: &str, mode: TrackingMode) -> CatalogEntry {
    api.create_catalog_entry(NewCatalogEntry::new(name, mode))
        .unwrap()
}

pub fn open_delivery(api: &impl InventoryApi) -> Delivery {
    api.create_delivery(NewDelivery {
        delivery_date: delivery_date(),
        supplier: Some("Acme Distribution".to_string()),
    })
    .unwrap()
}

/// Register one tracked line with a seed per value (imei or serial by mode).
pub fn receive_units(
    api: &impl InventoryApi,
    delivery_id: DeliveryId,
    entry: &CatalogEntry,
    values: &[&str],
) -> DeliveryLineReceipt {
    let seeds = values
        .iter()
        .map(|v| match entry.tracking_mode {
            TrackingMode::Imei => TrackedUnitSeed::imei(*v),
            _ => TrackedUnitSeed::serial(*v),
        })
        .collect();
    api.add_delivery_line(AddDeliveryLineRequest {
        delivery_id,
        catalog_entry_id: entry.id,
        quantity: values.len() as i64,
        unit_price: money("100.00"),
        seeds,
    })
    .unwrap()
}

pub fn adjust(
    api: &impl InventoryApi,
    catalog_entry_id: CatalogEntryId,
    delta: i64,
) -> Result<crate::domain::entities::BulkStockRecord, crate::InventoryError> {
    api.adjust_bulk_stock(AdjustBulkStockRequest {
        catalog_entry_id,
        delta,
        actor: operator(),
        note: Some("stock count".to_string()),
    })
}
