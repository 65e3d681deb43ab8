//! Read models. Each function runs against one read view.
//!
//! Records are keyed by a monotonic sequence, so reverse key order is
//! newest first for histories.

use super::Lookups;
use crate::domain::audit::*;
use crate::domain::entities::*;
use crate::domain::errors::{EntityKind, InventoryError};
use crate::domain::requests::IdentifierFilter;
use crate::domain::records::Record;
use crate::domain::views::*;
use crate::ports::outbound::{RecordView, StoreView};
use shared_types::{CatalogEntryId, DeliveryId, IdentifierId, IdentifierStatus, TrackingMode};
use std::cmp::Reverse;
use std::collections::HashMap;

/// Bulk history rows shown on a catalog entry.
pub(crate) const RECENT_BULK_HISTORY: usize = 10;

fn newest_first<T, P>(view: &dyn StoreView, predicate: P) -> Result<Vec<T>, InventoryError>
where
    T: Record,
    P: FnMut(&T) -> bool,
{
    let mut rows = view.find(predicate)?;
    rows.reverse();
    Ok(rows)
}

fn entries_by_id(
    view: &dyn StoreView,
) -> Result<HashMap<CatalogEntryId, CatalogEntry>, InventoryError> {
    Ok(view
        .all::<CatalogEntry>()?
        .into_iter()
        .map(|entry| (entry.id, entry))
        .collect())
}

fn to_listings(
    view: &dyn StoreView,
    mut units: Vec<DeviceIdentifier>,
) -> Result<Vec<IdentifierListing>, InventoryError> {
    let entries = entries_by_id(view)?;
    units.sort_by_key(|u| Reverse((u.created_at, u.id)));
    units
        .into_iter()
        .map(|identifier| {
            let entry = entries.get(&identifier.catalog_entry_id).ok_or_else(|| {
                InventoryError::not_found(EntityKind::CatalogEntry, identifier.catalog_entry_id)
            })?;
            Ok(IdentifierListing {
                catalog_entry_name: entry.name.clone(),
                tracking_mode: entry.tracking_mode,
                identifier,
            })
        })
        .collect()
}

pub(crate) fn list_identifiers(
    view: &dyn StoreView,
    filter: &IdentifierFilter,
) -> Result<Vec<IdentifierListing>, InventoryError> {
    let needle = filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    let units = view.find::<DeviceIdentifier>(|unit| {
        let matches_search = needle.as_ref().map_or(true, |needle| {
            [&unit.imei, &unit.serial_number]
                .into_iter()
                .flatten()
                .any(|value| value.to_lowercase().contains(needle))
        });
        matches_search
            && filter.catalog_entry_id.map_or(true, |id| unit.catalog_entry_id == id)
            && filter.status.map_or(true, |status| unit.status == status)
            && (!filter.clearance_only || unit.is_clearance)
    })?;

    to_listings(view, units)
}

pub(crate) fn identifier_detail(
    view: &dyn StoreView,
    id: IdentifierId,
) -> Result<IdentifierDetail, InventoryError> {
    let identifier = view.identifier(id)?;
    let catalog_entry = view.catalog_entry(identifier.catalog_entry_id)?;
    let original_catalog_entry = view.get::<CatalogEntry>(identifier.original_catalog_entry_id.0)?;
    let delivery = match identifier.delivery_id {
        Some(delivery_id) => view.get::<Delivery>(delivery_id.0)?,
        None => None,
    };

    Ok(IdentifierDetail {
        status_history: newest_first(view, |r: &StatusHistory| r.identifier_id == id)?,
        identifier_history: newest_first(view, |r: &IdentifierHistory| r.identifier_id == id)?,
        product_version_history: newest_first(view, |r: &ProductVersionHistory| {
            r.identifier_id == id
        })?,
        clearance_history: newest_first(view, |r: &ClearanceHistory| r.identifier_id == id)?,
        identifier,
        catalog_entry,
        original_catalog_entry,
        delivery,
    })
}

pub(crate) fn stock_overview(view: &dyn StoreView) -> Result<Vec<StockLine>, InventoryError> {
    // (total units, units in stock) per catalog entry
    let mut tally: HashMap<CatalogEntryId, (usize, i64)> = HashMap::new();
    for unit in view.all::<DeviceIdentifier>()? {
        let counts = tally.entry(unit.catalog_entry_id).or_default();
        counts.0 += 1;
        if unit.status == IdentifierStatus::InStock {
            counts.1 += 1;
        }
    }

    let mut entries = view.all::<CatalogEntry>()?;
    entries.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then(a.id.cmp(&b.id))
    });

    let mut lines = Vec::with_capacity(entries.len());
    for catalog_entry in entries {
        let (total_identifiers, in_stock) =
            tally.get(&catalog_entry.id).copied().unwrap_or_default();
        let stock = if catalog_entry.tracking_mode == TrackingMode::None {
            bulk_quantity(view, catalog_entry.id)?
        } else {
            in_stock
        };
        lines.push(StockLine {
            catalog_entry,
            stock,
            total_identifiers,
        });
    }
    Ok(lines)
}

fn bulk_quantity(view: &dyn StoreView, id: CatalogEntryId) -> Result<i64, InventoryError> {
    Ok(view
        .get::<BulkStockRecord>(id.0)?
        .map_or(0, |record| record.quantity))
}

pub(crate) fn catalog_entry_detail(
    view: &dyn StoreView,
    id: CatalogEntryId,
) -> Result<CatalogEntryDetail, InventoryError> {
    let entry = view.catalog_entry(id)?;
    let identifiers = newest_first(view, |u: &DeviceIdentifier| u.catalog_entry_id == id)?;

    let (bulk_quantity, recent_bulk_history) = if entry.tracking_mode == TrackingMode::None {
        let mut history = newest_first(view, |r: &BulkStockHistory| r.catalog_entry_id == id)?;
        history.truncate(RECENT_BULK_HISTORY);
        (Some(bulk_quantity(view, id)?), history)
    } else {
        (None, Vec::new())
    };

    Ok(CatalogEntryDetail {
        entry,
        identifiers,
        bulk_quantity,
        recent_bulk_history,
    })
}

pub(crate) fn list_deliveries(
    view: &dyn StoreView,
) -> Result<Vec<DeliverySummary>, InventoryError> {
    let mut per_delivery: HashMap<DeliveryId, (usize, u64)> = HashMap::new();
    for line in view.all::<DeliveryLine>()? {
        let totals = per_delivery.entry(line.delivery_id).or_default();
        totals.0 += 1;
        totals.1 += u64::from(line.quantity);
    }

    let mut deliveries = view.all::<Delivery>()?;
    deliveries.sort_by_key(|d| Reverse((d.delivery_date, d.id)));

    Ok(deliveries
        .into_iter()
        .map(|delivery| {
            let (line_count, total_quantity) =
                per_delivery.get(&delivery.id).copied().unwrap_or_default();
            DeliverySummary {
                delivery,
                line_count,
                total_quantity,
            }
        })
        .collect())
}

/// Units are matched to lines by delivery and original catalog entry, so a
/// unit moved to another entry later still shows on the line it arrived on.
pub(crate) fn delivery_detail(
    view: &dyn StoreView,
    id: DeliveryId,
) -> Result<DeliveryDetail, InventoryError> {
    let delivery = view.delivery(id)?;
    let lines = view.find::<DeliveryLine>(|line| line.delivery_id == id)?;
    let units = view.find::<DeviceIdentifier>(|u| u.delivery_id == Some(id))?;
    let entries = entries_by_id(view)?;

    let mut details = Vec::with_capacity(lines.len());
    for line in lines {
        let entry = entries.get(&line.catalog_entry_id).ok_or_else(|| {
            InventoryError::not_found(EntityKind::CatalogEntry, line.catalog_entry_id)
        })?;
        let received = units
            .iter()
            .filter(|u| u.original_catalog_entry_id == line.catalog_entry_id)
            .map(|u| ReceivedUnit {
                is_identifier_swapped: u.is_identifier_swapped(),
                is_product_version_swapped: u.is_product_version_swapped(),
                identifier: u.clone(),
            })
            .collect();
        details.push(DeliveryLineDetail {
            catalog_entry_name: entry.name.clone(),
            tracking_mode: entry.tracking_mode,
            units: received,
            line,
        });
    }

    Ok(DeliveryDetail {
        delivery,
        lines: details,
    })
}

pub(crate) fn list_clearance(
    view: &dyn StoreView,
) -> Result<Vec<IdentifierListing>, InventoryError> {
    let units = view.find::<DeviceIdentifier>(|u| {
        u.status == IdentifierStatus::InStock && u.is_clearance
    })?;
    to_listings(view, units)
}
