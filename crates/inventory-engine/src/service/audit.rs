//! Audit ledger writes. Append only; rows are never rewritten.

use super::Stamp;
use crate::domain::audit::*;
use crate::domain::entities::{ClearanceSnapshot, DeviceIdentifier};
use crate::domain::errors::StoreError;
use crate::ports::outbound::{RecordWriter, StoreTransaction};
use shared_types::{CatalogEntryId, IdentifierId, IdentifierStatus};

pub(crate) fn status(
    tx: &mut dyn StoreTransaction,
    identifier_id: IdentifierId,
    old_status: Option<IdentifierStatus>,
    new_status: IdentifierStatus,
    stamp: &Stamp,
) -> Result<StatusHistory, StoreError> {
    let mut row = StatusHistory {
        id: 0,
        identifier_id,
        old_status,
        new_status,
        actor: stamp.actor.clone(),
        note: stamp.note.clone(),
        changed_at: stamp.at,
    };
    tx.insert(&mut row)?;
    Ok(row)
}

pub(crate) fn identifier_values(
    tx: &mut dyn StoreTransaction,
    before: &DeviceIdentifier,
    after: &DeviceIdentifier,
    stamp: &Stamp,
) -> Result<IdentifierHistory, StoreError> {
    let mut row = IdentifierHistory {
        id: 0,
        identifier_id: after.id,
        old_imei: before.imei.clone(),
        new_imei: after.imei.clone(),
        old_serial_number: before.serial_number.clone(),
        new_serial_number: after.serial_number.clone(),
        actor: stamp.actor.clone(),
        note: stamp.note.clone(),
        changed_at: stamp.at,
    };
    tx.insert(&mut row)?;
    Ok(row)
}

pub(crate) fn product_version(
    tx: &mut dyn StoreTransaction,
    identifier_id: IdentifierId,
    old_catalog_entry_id: CatalogEntryId,
    new_catalog_entry_id: CatalogEntryId,
    stamp: &Stamp,
) -> Result<ProductVersionHistory, StoreError> {
    let mut row = ProductVersionHistory {
        id: 0,
        identifier_id,
        old_catalog_entry_id,
        new_catalog_entry_id,
        actor: stamp.actor.clone(),
        note: stamp.note.clone(),
        changed_at: stamp.at,
    };
    tx.insert(&mut row)?;
    Ok(row)
}

pub(crate) fn bulk_quantity(
    tx: &mut dyn StoreTransaction,
    catalog_entry_id: CatalogEntryId,
    old_quantity: i64,
    new_quantity: i64,
    stamp: &Stamp,
) -> Result<BulkStockHistory, StoreError> {
    let mut row = BulkStockHistory {
        id: 0,
        catalog_entry_id,
        old_quantity,
        new_quantity,
        delta: new_quantity - old_quantity,
        actor: stamp.actor.clone(),
        note: stamp.note.clone(),
        changed_at: stamp.at,
    };
    tx.insert(&mut row)?;
    Ok(row)
}

pub(crate) fn clearance(
    tx: &mut dyn StoreTransaction,
    identifier_id: IdentifierId,
    old: ClearanceSnapshot,
    new: ClearanceSnapshot,
    stamp: &Stamp,
) -> Result<ClearanceHistory, StoreError> {
    let mut row = ClearanceHistory {
        id: 0,
        identifier_id,
        old,
        new,
        actor: stamp.actor.clone(),
        note: stamp.note.clone(),
        changed_at: stamp.at,
    };
    tx.insert(&mut row)?;
    Ok(row)
}
