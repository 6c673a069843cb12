//! Data models
//!
//! Shared between the billing engine and its callers (back-office UI,
//! invoice writer). Canonical entities carry parsed, single-spelling
//! fields; the `*Input` twins accept the upstream API's inconsistent
//! camelCase/snake_case payloads and string dates, and are normalized
//! once at the ingestion boundary.
//! All IDs are `i64`.

pub mod billing_period;
pub mod contract;
pub mod discount;
pub mod item;
pub mod mile;
pub mod textbook;

// Re-exports
pub use billing_period::*;
pub use contract::*;
pub use discount::*;
pub use item::*;
pub use mile::*;
pub use textbook::*;
