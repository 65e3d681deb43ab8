//! # Operation Requests
//!
//! One struct per mutating operation of `InventoryApi`. Fields are already
//! typed; the service validates their business meaning.

use super::errors::InventoryError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared_types::{
    Actor, CatalogEntryId, DeliveryId, IdentifierId, IdentifierStatus, Money, TrackingMode,
};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCatalogEntry {
    pub name: String,
    pub ean: Option<String>,
    pub tracking_mode: TrackingMode,
}

impl NewCatalogEntry {
    pub fn new(name: impl Into<String>, tracking_mode: TrackingMode) -> Self {
        Self {
            name: name.into(),
            ean: None,
            tracking_mode,
        }
    }

    pub fn with_ean(mut self, ean: impl Into<String>) -> Self {
        self.ean = Some(ean.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateCatalogEntryRequest {
    pub id: CatalogEntryId,
    pub name: String,
    pub ean: Option<String>,
    pub tracking_mode: TrackingMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeStatusRequest {
    pub identifier_id: IdentifierId,
    pub new_status: IdentifierStatus,
    /// When set, the change only applies if the stored status still equals it.
    pub expected_current: Option<IdentifierStatus>,
    pub actor: Actor,
    pub note: Option<String>,
}

impl ChangeStatusRequest {
    pub fn new(identifier_id: IdentifierId, new_status: IdentifierStatus, actor: Actor) -> Self {
        Self {
            identifier_id,
            new_status,
            expected_current: None,
            actor,
            note: None,
        }
    }

    pub fn expecting(mut self, current: IdentifierStatus) -> Self {
        self.expected_current = Some(current);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeIdentifierValueRequest {
    pub identifier_id: IdentifierId,
    pub new_imei: Option<String>,
    pub new_serial_number: Option<String>,
    pub actor: Actor,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeCatalogEntryRequest {
    pub identifier_id: IdentifierId,
    pub new_catalog_entry_id: CatalogEntryId,
    pub actor: Actor,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToggleClearanceRequest {
    pub identifier_id: IdentifierId,
    pub price: Option<Money>,
    pub reason: Option<String>,
    /// Force clearance off instead of toggling.
    pub remove: bool,
    pub actor: Actor,
    pub note: Option<String>,
}

impl ToggleClearanceRequest {
    pub fn toggle(identifier_id: IdentifierId, actor: Actor) -> Self {
        Self {
            identifier_id,
            price: None,
            reason: None,
            remove: false,
            actor,
            note: None,
        }
    }

    pub fn remove(identifier_id: IdentifierId, actor: Actor) -> Self {
        Self {
            remove: true,
            ..Self::toggle(identifier_id, actor)
        }
    }

    pub fn with_price(mut self, price: Money, reason: Option<String>) -> Self {
        self.price = Some(price);
        self.reason = reason;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustBulkStockRequest {
    pub catalog_entry_id: CatalogEntryId,
    /// Signed change; negative values remove stock.
    pub delta: i64,
    pub actor: Actor,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDelivery {
    pub delivery_date: NaiveDate,
    pub supplier: Option<String>,
}

/// Identity of one tracked unit as typed at intake.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackedUnitSeed {
    pub imei: Option<String>,
    pub serial_number: Option<String>,
}

impl TrackedUnitSeed {
    pub fn imei(value: impl Into<String>) -> Self {
        Self {
            imei: Some(value.into()),
            serial_number: None,
        }
    }

    pub fn serial(value: impl Into<String>) -> Self {
        Self {
            imei: None,
            serial_number: Some(value.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddDeliveryLineRequest {
    pub delivery_id: DeliveryId,
    pub catalog_entry_id: CatalogEntryId,
    pub quantity: i64,
    pub unit_price: Money,
    /// Ignored for bulk entries.
    pub seeds: Vec<TrackedUnitSeed>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageDecision {
    pub identifier_id: IdentifierId,
    pub damaged: bool,
    pub description: Option<String>,
}

impl DamageDecision {
    pub fn intact(identifier_id: IdentifierId) -> Self {
        Self {
            identifier_id,
            damaged: false,
            description: None,
        }
    }

    pub fn damaged(identifier_id: IdentifierId, description: impl Into<String>) -> Self {
        Self {
            identifier_id,
            damaged: true,
            description: Some(description.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageAssessmentRequest {
    pub delivery_id: DeliveryId,
    pub decisions: Vec<DamageDecision>,
    pub actor: Actor,
}

/// Resolution for units flagged `defective_at_delivery`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispositionAction {
    ReturnToSupplier,
    MarkAsClearance,
    WriteOff,
}

impl DispositionAction {
    pub fn as_str(self) -> &'static str {
        match self {
            DispositionAction::ReturnToSupplier => "return_to_supplier",
            DispositionAction::MarkAsClearance => "mark_as_clearance",
            DispositionAction::WriteOff => "write_off",
        }
    }

    pub fn resolved_status(self) -> IdentifierStatus {
        match self {
            DispositionAction::ReturnToSupplier => IdentifierStatus::ReturnedToSupplier,
            DispositionAction::MarkAsClearance => IdentifierStatus::InStock,
            DispositionAction::WriteOff => IdentifierStatus::WrittenOff,
        }
    }
}

impl FromStr for DispositionAction {
    type Err = InventoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "return_to_supplier" => Ok(DispositionAction::ReturnToSupplier),
            "mark_as_clearance" => Ok(DispositionAction::MarkAsClearance),
            "write_off" => Ok(DispositionAction::WriteOff),
            other => Err(InventoryError::InvalidAction {
                action: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for DispositionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispositionRequest {
    pub identifier_ids: Vec<IdentifierId>,
    pub action: DispositionAction,
    pub actor: Actor,
    pub clearance_price: Option<Money>,
    pub clearance_reason: Option<String>,
}

/// Filter for `list_identifiers`. Empty filter lists everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdentifierFilter {
    /// Substring of the current imei or serial.
    pub search: Option<String>,
    pub catalog_entry_id: Option<CatalogEntryId>,
    pub status: Option<IdentifierStatus>,
    pub clearance_only: bool,
}

/// Trimmed value, or `None` when blank.
pub(crate) fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
