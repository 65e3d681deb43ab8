//! # Lifecycle Enums
//!
//! ```text
//! Identifier lifecycle
//!
//!   intake ──► in_stock ◄──► sold | defective | missing | reserved
//!      │          ▲
//!      ▼          │ mark_as_clearance
//!   defective_at_delivery ──► returned_to_supplier
//!                         └─► written_off
//! ```
//!
//! `ChangeStatus` may move a unit between any two states; the diagram shows
//! the business flow, not a hard restriction.

use crate::errors::ParseEnumError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How units of a catalog entry are counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingMode {
    /// Bulk-counted, no per-unit identity.
    None,
    /// One unit per IMEI.
    Imei,
    /// One unit per serial number.
    Serial,
}

impl TrackingMode {
    pub fn as_str(self) -> &'static str {
        match self {
            TrackingMode::None => "none",
            TrackingMode::Imei => "imei",
            TrackingMode::Serial => "serial",
        }
    }

    pub fn is_tracked(self) -> bool {
        self != TrackingMode::None
    }
}

impl FromStr for TrackingMode {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(TrackingMode::None),
            "imei" => Ok(TrackingMode::Imei),
            "serial" => Ok(TrackingMode::Serial),
            other => Err(ParseEnumError::new("tracking mode", other)),
        }
    }
}

/// Lifecycle state of one tracked unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierStatus {
    InStock,
    Sold,
    Defective,
    Missing,
    Reserved,
    DefectiveAtDelivery,
    ReturnedToSupplier,
    WrittenOff,
}

impl IdentifierStatus {
    pub const ALL: [IdentifierStatus; 8] = [
        IdentifierStatus::InStock,
        IdentifierStatus::Sold,
        IdentifierStatus::Defective,
        IdentifierStatus::Missing,
        IdentifierStatus::Reserved,
        IdentifierStatus::DefectiveAtDelivery,
        IdentifierStatus::ReturnedToSupplier,
        IdentifierStatus::WrittenOff,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            IdentifierStatus::InStock => "in_stock",
            IdentifierStatus::Sold => "sold",
            IdentifierStatus::Defective => "defective",
            IdentifierStatus::Missing => "missing",
            IdentifierStatus::Reserved => "reserved",
            IdentifierStatus::DefectiveAtDelivery => "defective_at_delivery",
            IdentifierStatus::ReturnedToSupplier => "returned_to_supplier",
            IdentifierStatus::WrittenOff => "written_off",
        }
    }

    /// No further business transitions are expected from these states.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            IdentifierStatus::Sold
                | IdentifierStatus::ReturnedToSupplier
                | IdentifierStatus::WrittenOff
        )
    }
}

impl FromStr for IdentifierStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IdentifierStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseEnumError::new("identifier status", s))
    }
}

/// Booking state of a delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Concept,
    Booked,
    /// Legacy state; nothing in the engine produces it.
    PartiallyBooked,
}

impl DeliveryStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DeliveryStatus::Concept => "concept",
            DeliveryStatus::Booked => "booked",
            DeliveryStatus::PartiallyBooked => "partially_booked",
        }
    }
}

impl FromStr for DeliveryStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "concept" => Ok(DeliveryStatus::Concept),
            "booked" => Ok(DeliveryStatus::Booked),
            "partially_booked" => Ok(DeliveryStatus::PartiallyBooked),
            other => Err(ParseEnumError::new("delivery status", other)),
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(TrackingMode, IdentifierStatus, DeliveryStatus);
