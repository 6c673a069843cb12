//! Shared types for the tuition billing engine
//!
//! Common types used by the billing engine and its callers (back-office
//! UI, invoice writer): data models, billing periods, and the unified
//! error/warning vocabulary.

pub mod error;
pub mod models;

// Re-exports
pub use error::{BillingError, BillingResult, BillingWarning};
pub use serde::{Deserialize, Serialize};
