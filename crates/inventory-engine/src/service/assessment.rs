//! Damage assessment: every tracked unit of a concept delivery gets a
//! decision, then the delivery is booked. One transaction for the batch.

use super::{audit, require_concept, Lookups, Stamp};
use crate::domain::entities::DeviceIdentifier;
use crate::domain::errors::{EntityKind, InventoryError};
use crate::domain::requests::{non_blank, DamageAssessmentRequest, DamageDecision};
use crate::domain::views::AssessmentSummary;
use crate::ports::outbound::{RecordView, RecordWriter, StoreTransaction};
use shared_types::{DeliveryStatus, IdentifierStatus, Timestamp};
use std::collections::HashMap;
use tracing::info;

pub(crate) const RECEIVED_NOTE: &str = "received via delivery";

pub(crate) fn submit(
    tx: &mut dyn StoreTransaction,
    request: DamageAssessmentRequest,
    now: Timestamp,
) -> Result<AssessmentSummary, InventoryError> {
    let mut delivery = tx.delivery(request.delivery_id)?;
    require_concept(&delivery)?;

    let units = tx.find::<DeviceIdentifier>(|u| u.delivery_id == Some(delivery.id))?;
    // a unit moved on before booking would be pulled back into stock
    if let Some(moved) = units.iter().find(|u| u.status != IdentifierStatus::InStock) {
        return Err(InventoryError::InvalidState {
            entity: EntityKind::Identifier,
            id: moved.id.0,
            current: moved.status.as_str(),
            required: IdentifierStatus::InStock.as_str(),
        });
    }

    // later decisions for the same unit replace earlier ones
    let mut decisions: HashMap<_, (bool, Option<String>)> = HashMap::new();
    for DamageDecision {
        identifier_id,
        damaged,
        description,
    } in &request.decisions
    {
        if !units.iter().any(|u| u.id == *identifier_id) {
            return Err(InventoryError::not_found(EntityKind::Identifier, *identifier_id));
        }
        let description = non_blank(description.as_deref());
        if *damaged && description.is_none() {
            return Err(InventoryError::missing("damage_description"));
        }
        decisions.insert(*identifier_id, (*damaged, description));
    }

    let missing: Vec<_> = units
        .iter()
        .map(|u| u.id)
        .filter(|id| !decisions.contains_key(id))
        .collect();
    if !missing.is_empty() {
        return Err(InventoryError::IncompleteAssessment {
            delivery_id: delivery.id,
            missing,
        });
    }

    let stamp = Stamp::new(request.actor, None, now);
    let total = units.len();
    let mut damaged_count = 0;
    for mut unit in units {
        let Some((damaged, description)) = decisions.remove(&unit.id) else {
            continue;
        };
        let note = if damaged {
            damaged_count += 1;
            unit.status = IdentifierStatus::DefectiveAtDelivery;
            unit.received_damaged = true;
            let note = format!(
                "Damaged at delivery - {}",
                description.as_deref().unwrap_or_default()
            );
            unit.damage_description = description;
            note
        } else {
            unit.status = IdentifierStatus::InStock;
            unit.received_damaged = false;
            unit.damage_description = None;
            RECEIVED_NOTE.to_string()
        };
        unit.updated_at = now;
        tx.update(&unit)?;
        audit::status(tx, unit.id, None, unit.status, &stamp.with_note(note))?;
    }

    delivery.status = DeliveryStatus::Booked;
    tx.update(&delivery)?;

    info!(
        "[stockroom] delivery {} booked after assessment: {} unit(s), {} damaged",
        delivery.delivery_number, total, damaged_count
    );
    Ok(AssessmentSummary {
        delivery_id: delivery.id,
        in_stock: total - damaged_count,
        damaged: damaged_count,
    })
}
