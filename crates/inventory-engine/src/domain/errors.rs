//! # Error Taxonomy
//!
//! Every rejected operation surfaces one `InventoryError` variant carrying
//! structured context. Message wording for operators belongs to the
//! presentation layer, which switches on `ErrorKind`.

use shared_types::{CatalogEntryId, DeliveryId, IdentifierId, Money, TrackingMode};
use std::fmt;
use thiserror::Error;

/// Entity an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    CatalogEntry,
    Identifier,
    Delivery,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntityKind::CatalogEntry => "catalog entry",
            EntityKind::Identifier => "identifier",
            EntityKind::Delivery => "delivery",
        })
    }
}

/// Persistence failures reported by a `RecordStore`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Corrupt record in {table}: {message}")]
    Codec { table: &'static str, message: String },

    #[error("Store is closed")]
    Closed,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InventoryError {
    #[error("{entity} {id} not found")]
    NotFound { entity: EntityKind, id: u64 },

    #[error("{entity} {id} is {current}, operation requires {required}")]
    InvalidState {
        entity: EntityKind,
        id: u64,
        current: &'static str,
        required: &'static str,
    },

    #[error("{entity} {id}: {field} is unchanged")]
    NoChange {
        entity: EntityKind,
        id: u64,
        field: &'static str,
    },

    #[error("Missing required field: {field}")]
    MissingRequiredField { field: &'static str },

    #[error("Duplicate {field} '{value}'")]
    DuplicateIdentifier {
        field: &'static str,
        value: String,
        /// Existing unit holding the value; `None` when the clash is inside one request.
        conflicting_id: Option<IdentifierId>,
    },

    #[error("Tracking mode mismatch: expected {expected}, got {actual}")]
    TrackingModeMismatch {
        expected: TrackingMode,
        actual: TrackingMode,
    },

    #[error("Invalid price for {field}: {value} (must be greater than zero)")]
    InvalidPrice { field: &'static str, value: Money },

    #[error("Insufficient stock for catalog entry {catalog_entry_id}: have {available}, change {delta}")]
    InsufficientStock {
        catalog_entry_id: CatalogEntryId,
        available: i64,
        delta: i64,
    },

    #[error("Unknown disposition action '{action}'")]
    InvalidAction { action: String },

    #[error("Invalid quantity {quantity} (must be at least 1 and fit the stock counter)")]
    InvalidQuantity { quantity: i64 },

    #[error("Damage assessment for delivery {delivery_id} leaves {} unit(s) undecided", missing.len())]
    IncompleteAssessment {
        delivery_id: DeliveryId,
        missing: Vec<IdentifierId>,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Flat discriminant of `InventoryError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    InvalidState,
    NoChange,
    MissingRequiredField,
    DuplicateIdentifier,
    TrackingModeMismatch,
    InvalidPrice,
    InsufficientStock,
    InvalidAction,
    InvalidQuantity,
    IncompleteAssessment,
    Store,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::InvalidState => "invalid_state",
            ErrorKind::NoChange => "no_change",
            ErrorKind::MissingRequiredField => "missing_required_field",
            ErrorKind::DuplicateIdentifier => "duplicate_identifier",
            ErrorKind::TrackingModeMismatch => "tracking_mode_mismatch",
            ErrorKind::InvalidPrice => "invalid_price",
            ErrorKind::InsufficientStock => "insufficient_stock",
            ErrorKind::InvalidAction => "invalid_action",
            ErrorKind::InvalidQuantity => "invalid_quantity",
            ErrorKind::IncompleteAssessment => "incomplete_assessment",
            ErrorKind::Store => "store",
        }
    }
}

impl InventoryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            InventoryError::NotFound { .. } => ErrorKind::NotFound,
            InventoryError::InvalidState { .. } => ErrorKind::InvalidState,
            InventoryError::NoChange { .. } => ErrorKind::NoChange,
            InventoryError::MissingRequiredField { .. } => ErrorKind::MissingRequiredField,
            InventoryError::DuplicateIdentifier { .. } => ErrorKind::DuplicateIdentifier,
            InventoryError::TrackingModeMismatch { .. } => ErrorKind::TrackingModeMismatch,
            InventoryError::InvalidPrice { .. } => ErrorKind::InvalidPrice,
            InventoryError::InsufficientStock { .. } => ErrorKind::InsufficientStock,
            InventoryError::InvalidAction { .. } => ErrorKind::InvalidAction,
            InventoryError::InvalidQuantity { .. } => ErrorKind::InvalidQuantity,
            InventoryError::IncompleteAssessment { .. } => ErrorKind::IncompleteAssessment,
            InventoryError::Store(_) => ErrorKind::Store,
        }
    }

    pub fn not_found(entity: EntityKind, id: impl Into<u64>) -> Self {
        InventoryError::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn missing(field: &'static str) -> Self {
        InventoryError::MissingRequiredField { field }
    }

    pub fn invalid_price(field: &'static str, value: Money) -> Self {
        InventoryError::InvalidPrice { field, value }
    }
}
