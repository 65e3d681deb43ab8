//! # Core Entities
//!
//! Typed record identifiers and the scalar aliases used across the stockroom.
//!
//! Every persisted record is addressed by a `u64` sequence value allocated by
//! the store. The newtypes below keep a delivery id from being passed where a
//! catalog entry id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Seconds since the Unix epoch.
pub type Timestamp = u64;

/// A currency amount (two decimals in practice).
pub type Money = rust_decimal::Decimal;

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Raw sequence value.
            pub fn value(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

record_id!(
    /// A catalog entry ("product version").
    CatalogEntryId
);
record_id!(
    /// One physical tracked unit.
    IdentifierId
);
record_id!(
    /// An incoming delivery.
    DeliveryId
);
record_id!(
    /// A single registration line inside a delivery.
    DeliveryLineId
);

/// Free-text name of the operator (or automated process) behind a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Actor(String);

impl Actor {
    /// Automated bookings made by the engine itself.
    pub const SYSTEM: &'static str = "system";
    /// Operator used when none is supplied.
    pub const DEFAULT_OPERATOR: &'static str = "admin";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn system() -> Self {
        Self::new(Self::SYSTEM)
    }

    /// Blank names fall back to the default operator.
    pub fn operator_or_default(name: Option<&str>) -> Self {
        match name.map(str::trim) {
            Some(n) if !n.is_empty() => Self::new(n),
            _ => Self::new(Self::DEFAULT_OPERATOR),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Actor {
    fn default() -> Self {
        Self::new(Self::DEFAULT_OPERATOR)
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
