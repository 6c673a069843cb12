//! Priced line item model
//!
//! Items arrive fully priced from the catalog/pricing source; the engine
//! trusts the prices as authoritative and only reads and annotates.
//! Amounts are tax-exclusive integer yen; tax is applied by the engine's
//! money module at aggregation time.

use serde::{Deserialize, Serialize};

use super::BillingPeriod;

/// Catalog item type code (商品種別)
///
/// Upstream sends free-string codes; unknown codes decode to [`Other`]
/// and are billed as ordinary monthly items.
///
/// [`Other`]: ItemType::Other
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Enrollment,
    EnrollmentTuition,
    EnrollmentMonthlyFee,
    EnrollmentFacility,
    EnrollmentTextbook,
    EnrollmentExpense,
    EnrollmentManagement,
    Bag,
    Abacus,
    Tuition,
    MonthlyFee,
    Facility,
    Textbook,
    Material,
    Expense,
    Management,
    #[serde(other)]
    Other,
}

/// A priced charge line, immutable once produced by the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PricedItem {
    pub id: i64,
    /// 商品名 (free text, used by keyword classification)
    pub product_name: String,
    pub item_type: ItemType,
    /// Tax-exclusive unit price in yen
    pub unit_price: i64,
    pub quantity: i32,
    /// Tax-exclusive extended price in yen (unit price x quantity as
    /// priced by the catalog, authoritative)
    pub final_price: i64,
    pub contract_id: i64,
    /// Invoice month assigned upstream, when already fixed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_month: Option<BillingPeriod>,
}

/// Priced item payload as the upstream API sends it
///
/// Accepts both camelCase and snake_case spellings; converted to
/// [`PricedItem`] exactly once at the ingestion boundary.
#[derive(Debug, Clone, Deserialize)]
pub struct PricedItemInput {
    pub id: i64,
    #[serde(alias = "productName")]
    pub product_name: String,
    #[serde(alias = "itemType")]
    pub item_type: ItemType,
    #[serde(alias = "unitPrice")]
    pub unit_price: i64,
    pub quantity: i32,
    #[serde(alias = "finalPrice")]
    pub final_price: Option<i64>,
    #[serde(alias = "contractId", default)]
    pub contract_id: Option<i64>,
    /// Invoice month as "YYYY-MM", when already fixed upstream
    #[serde(alias = "billingMonth", default)]
    pub billing_month: Option<String>,
}
