//! Discount model

use serde::{Deserialize, Serialize};

/// Discount unit enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountUnit {
    /// Flat amount in yen
    Yen,
    /// Percentage of the pre-discount base
    Percent,
}

/// A discount attached to a contract or to a specific item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Discount {
    pub id: i64,
    pub name: String,
    /// Yen amount, or percentage points when `unit` is `PERCENT`
    pub amount: i64,
    pub unit: DiscountUnit,
    /// When set, the discount targets one item; otherwise the contract's
    /// monthly subtotal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_item_id: Option<i64>,
}

/// Discount payload as the upstream API sends it
#[derive(Debug, Clone, Deserialize)]
pub struct DiscountInput {
    pub id: i64,
    pub name: String,
    pub amount: i64,
    pub unit: DiscountUnit,
    #[serde(alias = "targetItemId", default)]
    pub target_item_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_wire_form() {
        assert_eq!(
            serde_json::to_string(&DiscountUnit::Percent).unwrap(),
            "\"PERCENT\""
        );
        let u: DiscountUnit = serde_json::from_str("\"YEN\"").unwrap();
        assert_eq!(u, DiscountUnit::Yen);
    }
}
