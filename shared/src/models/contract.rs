//! Contract model
//!
//! A student may hold several concurrent contracts (different brands or
//! schools). Contracts are terminated by status change on withdrawal and
//! never physically deleted, so the engine must tolerate cancelled and
//! expired entries in its input.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Discount, DiscountInput, PricedItem, PricedItemInput};

/// Contract lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContractStatus {
    #[default]
    Active,
    /// 途中解約
    Cancelled,
    /// 期間満了
    Expired,
}

/// Contract entity (受講契約)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Contract {
    pub id: i64,
    pub student_id: i64,
    pub brand_id: i64,
    pub school_id: i64,
    pub start_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// Guardian-facing discount cap in yen; `None` means no cap
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_max: Option<i64>,
    pub items: Vec<PricedItem>,
    pub discounts: Vec<Discount>,
    pub status: ContractStatus,
}

/// Contract payload as the upstream API sends it
///
/// Dates arrive as strings and may be garbled; the ingestion boundary
/// parses them and degrades the affected contract rather than failing
/// the whole request.
#[derive(Debug, Clone, Deserialize)]
pub struct ContractInput {
    pub id: i64,
    #[serde(alias = "studentId")]
    pub student_id: i64,
    #[serde(alias = "brandId", default)]
    pub brand_id: i64,
    #[serde(alias = "schoolId", default)]
    pub school_id: i64,
    #[serde(alias = "startDate")]
    pub start_date: String,
    #[serde(alias = "endDate", default)]
    pub end_date: Option<String>,
    #[serde(alias = "discountMax", default)]
    pub discount_max: Option<i64>,
    #[serde(default)]
    pub items: Vec<PricedItemInput>,
    #[serde(default)]
    pub discounts: Vec<DiscountInput>,
    #[serde(default)]
    pub status: ContractStatus,
}
