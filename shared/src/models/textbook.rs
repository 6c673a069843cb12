//! Textbook payment option model
//!
//! The catalog offers at most a handful of payment plans per course; the
//! guardian picks at most one per contract. Options control when textbook
//! charges fall due; the charge amounts themselves come from the
//! contract's priced items.

use serde::{Deserialize, Serialize};

/// Textbook payment plan
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextbookPaymentType {
    /// 月払い (due every month)
    Monthly,
    /// 半期払い (due April and October)
    SemiAnnual,
    /// 年払い
    Annual,
}

/// Catalog textbook payment option
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TextbookOption {
    pub product_id: i64,
    pub payment_type: TextbookPaymentType,
    /// Explicit due months from the catalog; overrides the payment-type
    /// timing rule when non-empty
    #[serde(default)]
    pub billing_months: Vec<u32>,
    /// Tax-inclusive plan price in yen
    pub price_with_tax: i64,
    /// Tax-inclusive first-month price when the enrollment month has a
    /// distinct rate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrollment_price_with_tax: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrollment_month: Option<u32>,
}
