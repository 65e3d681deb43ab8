//! # Audit Ledger Records
//!
//! Append-only facts. One row is written per affected entity by every
//! mutation, inside the mutation's transaction. Rows are never updated.
//!
//! | Record | Written by |
//! |--------|------------|
//! | `StatusHistory` | ChangeStatus, damage assessment, disposition |
//! | `IdentifierHistory` | ChangeIdentifierValue |
//! | `ProductVersionHistory` | ChangeCatalogEntry |
//! | `BulkStockHistory` | AdjustBulkStock (manual and delivery receipt) |
//! | `ClearanceHistory` | ToggleClearance, disposition to clearance |

use super::entities::ClearanceSnapshot;
use serde::{Deserialize, Serialize};
use shared_types::{Actor, CatalogEntryId, IdentifierId, IdentifierStatus, Timestamp};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusHistory {
    pub id: u64,
    pub identifier_id: IdentifierId,
    /// `None` for the first status a unit receives at intake.
    pub old_status: Option<IdentifierStatus>,
    pub new_status: IdentifierStatus,
    pub actor: Actor,
    pub note: Option<String>,
    pub changed_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifierHistory {
    pub id: u64,
    pub identifier_id: IdentifierId,
    pub old_imei: Option<String>,
    pub new_imei: Option<String>,
    pub old_serial_number: Option<String>,
    pub new_serial_number: Option<String>,
    pub actor: Actor,
    pub note: Option<String>,
    pub changed_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductVersionHistory {
    pub id: u64,
    pub identifier_id: IdentifierId,
    pub old_catalog_entry_id: CatalogEntryId,
    pub new_catalog_entry_id: CatalogEntryId,
    pub actor: Actor,
    pub note: Option<String>,
    pub changed_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkStockHistory {
    pub id: u64,
    pub catalog_entry_id: CatalogEntryId,
    pub old_quantity: i64,
    pub new_quantity: i64,
    pub delta: i64,
    pub actor: Actor,
    pub note: Option<String>,
    pub changed_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClearanceHistory {
    pub id: u64,
    pub identifier_id: IdentifierId,
    pub old: ClearanceSnapshot,
    pub new: ClearanceSnapshot,
    pub actor: Actor,
    pub note: Option<String>,
    pub changed_at: Timestamp,
}
