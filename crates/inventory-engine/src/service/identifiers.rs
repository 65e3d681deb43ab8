//! Device identifier state machine.
//!
//! `change_status` is the unrestricted correction path. The other three
//! operations only apply to units that are `in_stock`.

use super::{audit, require_in_stock, Lookups, Stamp};
use crate::domain::entities::{ClearanceSnapshot, DeviceIdentifier};
use crate::domain::errors::{EntityKind, InventoryError};
use crate::domain::requests::*;
use crate::ports::outbound::{RecordView, RecordWriter, StoreTransaction};
use rust_decimal::Decimal;
use shared_types::{Timestamp, TrackingMode};
use tracing::info;

pub(crate) fn change_status(
    tx: &mut dyn StoreTransaction,
    request: ChangeStatusRequest,
    now: Timestamp,
) -> Result<DeviceIdentifier, InventoryError> {
    let mut unit = tx.identifier(request.identifier_id)?;
    if let Some(expected) = request.expected_current {
        if unit.status != expected {
            return Err(InventoryError::InvalidState {
                entity: EntityKind::Identifier,
                id: unit.id.0,
                current: unit.status.as_str(),
                required: expected.as_str(),
            });
        }
    }

    let old_status = unit.status;
    unit.status = request.new_status;
    unit.updated_at = now;
    tx.update(&unit)?;

    let stamp = Stamp::new(request.actor, non_blank(request.note.as_deref()), now);
    audit::status(tx, unit.id, Some(old_status), unit.status, &stamp)?;

    info!(
        "[stockroom] identifier #{} {} -> {} by {}",
        unit.id, old_status, unit.status, stamp.actor
    );
    Ok(unit)
}

pub(crate) fn change_identifier_value(
    tx: &mut dyn StoreTransaction,
    request: ChangeIdentifierValueRequest,
    now: Timestamp,
) -> Result<DeviceIdentifier, InventoryError> {
    let before = tx.identifier(request.identifier_id)?;
    require_in_stock(&before)?;

    let new_imei = non_blank(request.new_imei.as_deref());
    let new_serial = non_blank(request.new_serial_number.as_deref());
    let differs = |new: &Option<String>, current: &Option<String>| new.is_some() && new != current;
    if !differs(&new_imei, &before.imei) && !differs(&new_serial, &before.serial_number) {
        return Err(no_identifier_change(&before));
    }

    let entry = tx.catalog_entry(before.catalog_entry_id)?;
    let (imei, serial_number) = match entry.tracking_mode {
        TrackingMode::Imei => (Some(new_imei.clone().ok_or(InventoryError::missing("imei"))?), None),
        TrackingMode::Serial => (
            None,
            Some(new_serial.clone().ok_or(InventoryError::missing("serial_number"))?),
        ),
        TrackingMode::None => {
            return Err(InventoryError::TrackingModeMismatch {
                expected: TrackingMode::Imei,
                actual: TrackingMode::None,
            })
        }
    };
    // the mode's field is unchanged and only the other one was supplied
    if imei == before.imei && serial_number == before.serial_number {
        return Err(no_identifier_change(&before));
    }

    // single pass over all other units before anything is written
    let clash = tx
        .find::<DeviceIdentifier>(|other| {
            other.id != before.id
                && ((new_imei.is_some() && other.imei == new_imei)
                    || (new_serial.is_some() && other.serial_number == new_serial))
        })?
        .into_iter()
        .next();
    if let Some(other) = clash {
        let (field, value) = if new_imei.is_some() && other.imei == new_imei {
            ("imei", new_imei)
        } else {
            ("serial_number", new_serial)
        };
        return Err(InventoryError::DuplicateIdentifier {
            field,
            value: value.unwrap_or_default(),
            conflicting_id: Some(other.id),
        });
    }

    let mut after = before.clone();
    after.imei = imei;
    after.serial_number = serial_number;
    after.updated_at = now;
    tx.update(&after)?;

    let stamp = Stamp::new(request.actor, non_blank(request.note.as_deref()), now);
    audit::identifier_values(tx, &before, &after, &stamp)?;

    info!(
        "[stockroom] identifier #{} re-tagged {} -> {}",
        after.id,
        before.label().unwrap_or("-"),
        after.label().unwrap_or("-")
    );
    Ok(after)
}

fn no_identifier_change(unit: &DeviceIdentifier) -> InventoryError {
    InventoryError::NoChange {
        entity: EntityKind::Identifier,
        id: unit.id.0,
        field: "identifier",
    }
}

pub(crate) fn change_catalog_entry(
    tx: &mut dyn StoreTransaction,
    request: ChangeCatalogEntryRequest,
    now: Timestamp,
) -> Result<DeviceIdentifier, InventoryError> {
    let mut unit = tx.identifier(request.identifier_id)?;
    require_in_stock(&unit)?;
    if request.new_catalog_entry_id == unit.catalog_entry_id {
        return Err(InventoryError::NoChange {
            entity: EntityKind::Identifier,
            id: unit.id.0,
            field: "catalog_entry_id",
        });
    }

    let target = tx.catalog_entry(request.new_catalog_entry_id)?;
    let current = tx.catalog_entry(unit.catalog_entry_id)?;
    if target.tracking_mode != current.tracking_mode {
        return Err(InventoryError::TrackingModeMismatch {
            expected: current.tracking_mode,
            actual: target.tracking_mode,
        });
    }

    let old_entry_id = unit.catalog_entry_id;
    unit.catalog_entry_id = target.id;
    unit.updated_at = now;
    tx.update(&unit)?;

    let stamp = Stamp::new(request.actor, non_blank(request.note.as_deref()), now);
    audit::product_version(tx, unit.id, old_entry_id, target.id, &stamp)?;

    info!(
        "[stockroom] identifier #{} moved from '{}' to '{}'",
        unit.id, current.name, target.name
    );
    Ok(unit)
}

pub(crate) fn toggle_clearance(
    tx: &mut dyn StoreTransaction,
    request: ToggleClearanceRequest,
    now: Timestamp,
) -> Result<DeviceIdentifier, InventoryError> {
    let mut unit = tx.identifier(request.identifier_id)?;
    require_in_stock(&unit)?;

    let turn_on = !request.remove && !unit.is_clearance;
    if request.remove && !unit.is_clearance {
        return Err(InventoryError::NoChange {
            entity: EntityKind::Identifier,
            id: unit.id.0,
            field: "is_clearance",
        });
    }

    let before = unit.clearance();
    let after = if turn_on {
        if let Some(price) = request.price {
            if price <= Decimal::ZERO {
                return Err(InventoryError::invalid_price("clearance_price", price));
            }
        }
        ClearanceSnapshot::on(request.price, non_blank(request.reason.as_deref()))
    } else {
        ClearanceSnapshot::off()
    };

    unit.set_clearance(after.clone());
    unit.updated_at = now;
    tx.update(&unit)?;

    let note = non_blank(request.note.as_deref()).unwrap_or_else(|| clearance_note(&after));
    let stamp = Stamp::new(request.actor, Some(note), now);
    audit::clearance(tx, unit.id, before, after, &stamp)?;

    info!(
        "[stockroom] identifier #{} clearance {}",
        unit.id,
        if unit.is_clearance { "on" } else { "off" }
    );
    Ok(unit)
}

pub(crate) fn clearance_note(snapshot: &ClearanceSnapshot) -> String {
    match (snapshot.is_clearance, snapshot.price) {
        (true, Some(price)) => format!("Marked as clearance at {}", price),
        (true, None) => "Marked as clearance".to_string(),
        (false, _) => "Clearance removed".to_string(),
    }
}
