//! Delivery intake workflow.
//!
//! ```text
//!   create_delivery ──► add_delivery_line (×n) ──► book_delivery
//!                          │                          │
//!                          ├─ bulk: apply_delta       ├─ no tracked lines ─► booked
//!                          └─ tracked: units in_stock └─ tracked ─► assessment
//! ```

use super::{bulk, require_concept, Lookups, Stamp};
use crate::domain::entities::{CatalogEntry, Delivery, DeliveryLine, DeviceIdentifier};
use crate::domain::errors::InventoryError;
use crate::domain::requests::*;
use crate::domain::views::{BookingOutcome, DeliveryLineReceipt, PendingUnit};
use crate::ports::outbound::{RecordView, RecordWriter, StoreTransaction, StoreView};
use rust_decimal::Decimal;
use shared_types::{
    Actor, DeliveryId, DeliveryLineId, DeliveryStatus, IdentifierId, IdentifierStatus, Timestamp,
    TrackingMode,
};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

pub(crate) fn create_delivery(
    tx: &mut dyn StoreTransaction,
    request: NewDelivery,
    now: Timestamp,
) -> Result<Delivery, InventoryError> {
    // numbering reads and inserts under the same write lock
    let highest = tx
        .all::<Delivery>()?
        .iter()
        .filter_map(|d| Delivery::parse_number(&d.delivery_number))
        .max()
        .unwrap_or(0);

    let mut delivery = Delivery {
        id: DeliveryId(0),
        delivery_number: Delivery::format_number(highest + 1),
        delivery_date: request.delivery_date,
        supplier: non_blank(request.supplier.as_deref()),
        status: DeliveryStatus::Concept,
        created_at: now,
    };
    tx.insert(&mut delivery)?;

    info!(
        "[stockroom] delivery {} opened for {}",
        delivery.delivery_number, delivery.delivery_date
    );
    Ok(delivery)
}

pub(crate) fn add_delivery_line(
    tx: &mut dyn StoreTransaction,
    request: AddDeliveryLineRequest,
    now: Timestamp,
) -> Result<DeliveryLineReceipt, InventoryError> {
    if request.unit_price <= Decimal::ZERO {
        return Err(InventoryError::invalid_price("unit_price", request.unit_price));
    }
    let delivery = tx.delivery(request.delivery_id)?;
    require_concept(&delivery)?;
    let entry = tx.catalog_entry(request.catalog_entry_id)?;
    let quantity = u32::try_from(request.quantity)
        .ok()
        .filter(|q| *q >= 1)
        .ok_or(InventoryError::InvalidQuantity {
            quantity: request.quantity,
        })?;

    let (values, skipped_seeds) = if entry.tracking_mode.is_tracked() {
        plan_units(&*tx, &entry, &request.seeds)?
    } else {
        (Vec::new(), 0)
    };

    let mut line = DeliveryLine {
        id: DeliveryLineId(0),
        delivery_id: delivery.id,
        catalog_entry_id: entry.id,
        quantity,
        unit_price: request.unit_price,
        created_at: now,
    };
    tx.insert(&mut line)?;

    let mut created_identifiers = Vec::with_capacity(values.len());
    let mut bulk_quantity = None;

    if entry.tracking_mode.is_tracked() {
        for value in values {
            let mut unit = new_unit(&entry, &delivery, value, request.unit_price, now);
            tx.insert(&mut unit)?;
            created_identifiers.push(unit.id);
        }
        if created_identifiers.len() != quantity as usize {
            warn!(
                "[stockroom] delivery {} line #{}: {} units registered for quantity {}",
                delivery.delivery_number,
                line.id,
                created_identifiers.len(),
                quantity
            );
        }
    } else {
        let stamp = Stamp::new(
            Actor::system(),
            Some(format!("Delivery booking {}", delivery.delivery_number)),
            now,
        );
        let record = bulk::apply_delta(tx, &entry, i64::from(quantity), &stamp)?;
        bulk_quantity = Some(record.quantity);
    }

    info!(
        "[stockroom] delivery {} line #{}: {} x '{}'",
        delivery.delivery_number, line.id, quantity, entry.name
    );
    Ok(DeliveryLineReceipt {
        line,
        created_identifiers,
        skipped_seeds,
        bulk_quantity,
    })
}

/// Validate seeds and return the identifier value for each unit to create,
/// plus the number of blank seeds skipped.
fn plan_units<V: StoreView + ?Sized>(
    view: &V,
    entry: &CatalogEntry,
    seeds: &[TrackedUnitSeed],
) -> Result<(Vec<String>, usize), InventoryError> {
    let field = identifier_field(entry.tracking_mode);
    let mut values = Vec::with_capacity(seeds.len());
    let mut seen = HashSet::new();
    let mut skipped = 0;

    for seed in seeds {
        let imei = non_blank(seed.imei.as_deref());
        let serial = non_blank(seed.serial_number.as_deref());
        if imei.is_none() && serial.is_none() {
            skipped += 1;
            debug!("[stockroom] skipping blank seed for '{}'", entry.name);
            continue;
        }
        let value = match entry.tracking_mode {
            TrackingMode::Imei => imei,
            _ => serial,
        }
        .ok_or(InventoryError::missing(field))?;

        if !seen.insert(value.clone()) {
            return Err(InventoryError::DuplicateIdentifier {
                field,
                value,
                conflicting_id: None,
            });
        }
        values.push(value);
    }

    if let Some(existing) = view
        .find::<DeviceIdentifier>(|unit| {
            let current = match entry.tracking_mode {
                TrackingMode::Imei => unit.imei.as_ref(),
                _ => unit.serial_number.as_ref(),
            };
            current.is_some_and(|v| seen.contains(v))
        })?
        .into_iter()
        .next()
    {
        return Err(InventoryError::DuplicateIdentifier {
            field,
            value: existing.label().unwrap_or_default().to_string(),
            conflicting_id: Some(existing.id),
        });
    }

    Ok((values, skipped))
}

fn identifier_field(mode: TrackingMode) -> &'static str {
    match mode {
        TrackingMode::Imei => "imei",
        _ => "serial_number",
    }
}

fn new_unit(
    entry: &CatalogEntry,
    delivery: &Delivery,
    value: String,
    unit_price: Decimal,
    now: Timestamp,
) -> DeviceIdentifier {
    let (imei, serial_number) = match entry.tracking_mode {
        TrackingMode::Imei => (Some(value), None),
        _ => (None, Some(value)),
    };
    DeviceIdentifier {
        id: IdentifierId(0),
        catalog_entry_id: entry.id,
        original_catalog_entry_id: entry.id,
        delivery_id: Some(delivery.id),
        original_imei: imei.clone(),
        original_serial_number: serial_number.clone(),
        imei,
        serial_number,
        status: IdentifierStatus::InStock,
        is_clearance: false,
        clearance_price: None,
        clearance_reason: None,
        received_damaged: false,
        damage_description: None,
        purchase_price: Some(unit_price),
        created_at: now,
        updated_at: now,
    }
}

pub(crate) fn book_delivery(
    tx: &mut dyn StoreTransaction,
    delivery_id: DeliveryId,
    _now: Timestamp,
) -> Result<BookingOutcome, InventoryError> {
    let mut delivery = tx.delivery(delivery_id)?;
    require_concept(&delivery)?;

    let lines = tx.find::<DeliveryLine>(|line| line.delivery_id == delivery_id)?;
    let mut entries: HashMap<_, CatalogEntry> = HashMap::new();
    for line in &lines {
        if !entries.contains_key(&line.catalog_entry_id) {
            let entry = tx.catalog_entry(line.catalog_entry_id)?;
            entries.insert(entry.id, entry);
        }
    }

    if !entries.values().any(|e| e.tracking_mode.is_tracked()) {
        delivery.status = DeliveryStatus::Booked;
        tx.update(&delivery)?;
        info!("[stockroom] delivery {} booked", delivery.delivery_number);
        return Ok(BookingOutcome::Booked { delivery_id });
    }

    let pending = pending_units(&*tx, delivery_id)?;
    info!(
        "[stockroom] delivery {} awaits damage assessment of {} unit(s)",
        delivery.delivery_number,
        pending.len()
    );
    Ok(BookingOutcome::AssessmentRequired {
        delivery_id,
        pending,
    })
}

fn pending_units<V: StoreView + ?Sized>(
    view: &V,
    delivery_id: DeliveryId,
) -> Result<Vec<PendingUnit>, InventoryError> {
    let units = view.find::<DeviceIdentifier>(|u| u.delivery_id == Some(delivery_id))?;
    let mut pending = Vec::with_capacity(units.len());
    for unit in units {
        let entry = view.catalog_entry(unit.catalog_entry_id)?;
        pending.push(PendingUnit {
            identifier_id: unit.id,
            catalog_entry_name: entry.name,
            imei: unit.imei,
            serial_number: unit.serial_number,
        });
    }
    Ok(pending)
}
