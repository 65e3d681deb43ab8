//! Cross-crate scenarios.

pub mod concurrency;
pub mod runtime;
pub mod shop_day;
