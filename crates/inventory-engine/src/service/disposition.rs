//! Damage disposition for units flagged `defective_at_delivery`.
//!
//! All ids are loaded and checked before the first write, so a batch either
//! resolves every unit or none.

use super::{audit, identifiers::clearance_note, Lookups, Stamp};
use crate::domain::entities::{ClearanceSnapshot, DeviceIdentifier};
use crate::domain::errors::{EntityKind, InventoryError};
use crate::domain::requests::{non_blank, DispositionAction, DispositionRequest};
use crate::domain::views::{DispositionOutcome, DispositionReport};
use crate::ports::outbound::{RecordWriter, StoreTransaction};
use rust_decimal::Decimal;
use shared_types::{IdentifierStatus, Timestamp};
use std::collections::HashSet;
use tracing::info;

pub(crate) fn resolve(
    tx: &mut dyn StoreTransaction,
    request: DispositionRequest,
    now: Timestamp,
) -> Result<DispositionReport, InventoryError> {
    if request.identifier_ids.is_empty() {
        return Err(InventoryError::missing("identifier_ids"));
    }
    let action = request.action;
    if action == DispositionAction::MarkAsClearance {
        if let Some(price) = request.clearance_price {
            if price <= Decimal::ZERO {
                return Err(InventoryError::invalid_price("clearance_price", price));
            }
        }
    }

    let mut seen = HashSet::new();
    let mut units = Vec::with_capacity(request.identifier_ids.len());
    for id in &request.identifier_ids {
        if !seen.insert(*id) {
            continue;
        }
        let unit = tx.identifier(*id)?;
        if unit.status != IdentifierStatus::DefectiveAtDelivery {
            return Err(InventoryError::InvalidState {
                entity: EntityKind::Identifier,
                id: unit.id.0,
                current: unit.status.as_str(),
                required: IdentifierStatus::DefectiveAtDelivery.as_str(),
            });
        }
        units.push(unit);
    }

    let clearance = match action {
        DispositionAction::MarkAsClearance => ClearanceSnapshot::on(
            request.clearance_price,
            non_blank(request.clearance_reason.as_deref()),
        ),
        _ => ClearanceSnapshot::off(),
    };
    let stamp = Stamp::new(request.actor, Some(action_note(action).to_string()), now);

    let mut outcomes = Vec::with_capacity(units.len());
    for unit in units {
        outcomes.push(resolve_unit(tx, unit, action, &clearance, &stamp)?);
    }

    info!(
        "[stockroom] {} damaged unit(s) resolved: {}",
        outcomes.len(),
        action
    );
    Ok(DispositionReport { action, outcomes })
}

fn resolve_unit(
    tx: &mut dyn StoreTransaction,
    mut unit: DeviceIdentifier,
    action: DispositionAction,
    clearance: &ClearanceSnapshot,
    stamp: &Stamp,
) -> Result<DispositionOutcome, InventoryError> {
    let old_status = unit.status;
    let old_clearance = unit.clearance();

    unit.status = action.resolved_status();
    unit.set_clearance(clearance.clone());
    unit.updated_at = stamp.at;
    tx.update(&unit)?;

    audit::status(tx, unit.id, Some(old_status), unit.status, stamp)?;
    // a unit flagged clearance before it was found damaged loses the flag here
    if action == DispositionAction::MarkAsClearance || old_clearance != *clearance {
        let note = stamp.with_note(clearance_note(clearance));
        audit::clearance(tx, unit.id, old_clearance, clearance.clone(), &note)?;
    }

    Ok(DispositionOutcome {
        identifier_id: unit.id,
        old_status,
        new_status: unit.status,
    })
}

fn action_note(action: DispositionAction) -> &'static str {
    match action {
        DispositionAction::ReturnToSupplier => "Damaged at delivery, returned to supplier",
        DispositionAction::MarkAsClearance => "Damaged at delivery, moved to clearance",
        DispositionAction::WriteOff => "Damaged at delivery, written off",
    }
}
