use super::Lookups;
use crate::domain::entities::CatalogEntry;
use crate::domain::errors::InventoryError;
use crate::domain::requests::{non_blank, NewCatalogEntry, UpdateCatalogEntryRequest};
use crate::ports::outbound::{RecordWriter, StoreTransaction};
use shared_types::{CatalogEntryId, Timestamp};
use tracing::info;

pub(crate) fn create(
    tx: &mut dyn StoreTransaction,
    request: NewCatalogEntry,
    now: Timestamp,
) -> Result<CatalogEntry, InventoryError> {
    let name = non_blank(Some(request.name.as_str())).ok_or(InventoryError::missing("name"))?;

    let mut entry = CatalogEntry {
        id: CatalogEntryId(0),
        name,
        ean: non_blank(request.ean.as_deref()),
        tracking_mode: request.tracking_mode,
        created_at: now,
        updated_at: now,
    };
    tx.insert(&mut entry)?;

    info!(
        "[stockroom] catalog entry #{} '{}' created ({})",
        entry.id, entry.name, entry.tracking_mode
    );
    Ok(entry)
}

/// Tracking mode is fixed at creation; only name and EAN change.
pub(crate) fn update(
    tx: &mut dyn StoreTransaction,
    request: UpdateCatalogEntryRequest,
    now: Timestamp,
) -> Result<CatalogEntry, InventoryError> {
    let mut entry = tx.catalog_entry(request.id)?;
    let name = non_blank(Some(request.name.as_str())).ok_or(InventoryError::missing("name"))?;
    if request.tracking_mode != entry.tracking_mode {
        return Err(InventoryError::TrackingModeMismatch {
            expected: entry.tracking_mode,
            actual: request.tracking_mode,
        });
    }

    entry.name = name;
    entry.ean = non_blank(request.ean.as_deref());
    entry.updated_at = now;
    tx.update(&entry)?;

    info!("[stockroom] catalog entry #{} updated", entry.id);
    Ok(entry)
}
