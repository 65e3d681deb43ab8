//! Bulk stock ledger. `apply_delta` is the only code path that writes a
//! `BulkStockRecord`; delivery intake goes through it as well.

use super::{audit, Lookups, Stamp};
use crate::domain::entities::{BulkStockRecord, CatalogEntry};
use crate::domain::errors::{EntityKind, InventoryError};
use crate::domain::requests::{non_blank, AdjustBulkStockRequest};
use crate::ports::outbound::{RecordView, RecordWriter, StoreTransaction};
use inventory_telemetry::metrics;
use shared_types::{Timestamp, TrackingMode};
use tracing::info;

pub(crate) fn adjust(
    tx: &mut dyn StoreTransaction,
    request: AdjustBulkStockRequest,
    now: Timestamp,
) -> Result<BulkStockRecord, InventoryError> {
    let entry = tx.catalog_entry(request.catalog_entry_id)?;
    let stamp = Stamp::new(request.actor, non_blank(request.note.as_deref()), now);
    apply_delta(tx, &entry, request.delta, &stamp)
}

pub(crate) fn apply_delta(
    tx: &mut dyn StoreTransaction,
    entry: &CatalogEntry,
    delta: i64,
    stamp: &Stamp,
) -> Result<BulkStockRecord, InventoryError> {
    if entry.tracking_mode != TrackingMode::None {
        return Err(InventoryError::TrackingModeMismatch {
            expected: TrackingMode::None,
            actual: entry.tracking_mode,
        });
    }
    if delta == 0 {
        return Err(InventoryError::NoChange {
            entity: EntityKind::CatalogEntry,
            id: entry.id.0,
            field: "quantity",
        });
    }

    let current = tx
        .get::<BulkStockRecord>(entry.id.0)?
        .map_or(0, |record| record.quantity);
    let insufficient = InventoryError::InsufficientStock {
        catalog_entry_id: entry.id,
        available: current,
        delta,
    };
    let new_quantity = match current.checked_add(delta) {
        Some(quantity) if quantity >= 0 => quantity,
        Some(_) => return Err(insufficient),
        None if delta > 0 => return Err(InventoryError::InvalidQuantity { quantity: delta }),
        None => return Err(insufficient),
    };

    let record = BulkStockRecord {
        catalog_entry_id: entry.id,
        quantity: new_quantity,
        updated_at: stamp.at,
    };
    tx.update(&record)?;
    audit::bulk_quantity(tx, entry.id, current, new_quantity, stamp)?;
    metrics::record_bulk_delta(delta);

    info!(
        "[stockroom] bulk stock of '{}' {} -> {} ({:+})",
        entry.name, current, new_quantity, delta
    );
    Ok(record)
}
