//! Discount application
//!
//! Three mechanisms, all operating on tax-inclusive yen:
//! - Per-item / per-contract discounts (flat yen or percent of the
//!   pre-discount base, never compounded with each other)
//! - A per-contract cap: the guardian's discount is clamped at
//!   `discount_max`, the overage is absorbed by the school and surfaced
//!   separately for accounting
//! - The mileage staircase: loyalty points redeemed against the bill

use rust_decimal::prelude::*;
use tracing::warn;

use crate::money::with_tax;
use shared::error::{BillingError, BillingResult};
use shared::models::{Discount, DiscountUnit, MileInfo, PricedItem};

/// Minimum points for a mile redemption
const MILE_MIN_POINTS: i64 = 4;
/// Yen value of each redeemed point pair past the base
const MILE_STEP_YEN: i64 = 500;

/// Result of applying a contract's discounts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiscountOutcome {
    /// Sum of all discounts before the cap
    pub requested_total: i64,
    /// Guardian-facing discount, clamped at the contract cap
    pub applied_total: i64,
    /// School-absorbed portion above the cap
    pub excess_amount: i64,
    pub has_excess: bool,
}

/// Yen value of one discount against its pre-discount base
///
/// Percent discounts compute against the target item's tax-inclusive
/// pre-discount price, or against `monthly_base` (the contract's
/// tax-inclusive recurring subtotal) when untargeted. A percent discount
/// whose target item is missing contributes zero.
pub fn discount_amount(discount: &Discount, items: &[PricedItem], monthly_base: i64) -> i64 {
    match discount.unit {
        DiscountUnit::Yen => discount.amount.max(0),
        DiscountUnit::Percent => {
            let base = match discount.target_item_id {
                Some(target) => match items.iter().find(|i| i.id == target) {
                    Some(item) => with_tax(item.unit_price * item.quantity as i64),
                    None => return 0,
                },
                None => monthly_base,
            };
            percent_of(base, discount.amount)
        }
    }
}

/// `floor(base * percent / 100)` in Decimal
fn percent_of(base: i64, percent: i64) -> i64 {
    let amount = Decimal::from(base) * Decimal::from(percent.max(0)) / Decimal::ONE_HUNDRED;
    amount.floor().to_i64().unwrap_or(0)
}

/// Apply a contract's discounts and enforce its cap
///
/// The portion above `discount_max` is not charged back to the guardian
/// and is not silently dropped either: it is reported as
/// `excess_amount`, attributed to the school.
pub fn apply_contract_discounts(
    discounts: &[Discount],
    items: &[PricedItem],
    monthly_base: i64,
    discount_max: Option<i64>,
) -> DiscountOutcome {
    let requested_total: i64 = discounts
        .iter()
        .map(|d| discount_amount(d, items, monthly_base))
        .sum();

    let (applied_total, excess_amount) = match discount_max {
        Some(cap) => {
            let cap = cap.max(0);
            let excess = (requested_total - cap).max(0);
            (requested_total.min(cap), excess)
        }
        None => (requested_total, 0),
    };

    DiscountOutcome {
        requested_total,
        applied_total,
        excess_amount,
        has_excess: excess_amount > 0,
    }
}

// ==================== Mile Discount ====================

/// Staircase mile discount: `floor((points - 2) / 2) * 500`
///
/// Below 4 points there is no partial credit. The staircase is exact:
/// 4 and 5 points are both worth 500 yen, 6 and 7 both 1000.
pub fn mile_discount(points: i64) -> i64 {
    if points < MILE_MIN_POINTS {
        return 0;
    }
    (points - 2) / 2 * MILE_STEP_YEN
}

/// Validate a mile redemption request against the upstream snapshot
///
/// Returns `(points_used, discount)`. Errors when redemption is
/// requested but ineligible; the caller falls back to a zero discount
/// with a warning, never a failed preview.
pub fn resolve_mile_redemption(
    mile: &MileInfo,
    use_miles: bool,
    miles_to_use: i64,
) -> BillingResult<(i64, i64)> {
    if !use_miles || miles_to_use == 0 {
        return Ok((0, 0));
    }

    if miles_to_use < 0 {
        return Err(BillingError::InvalidQuantity(format!(
            "miles_to_use must be non-negative, got {}",
            miles_to_use
        )));
    }

    if !mile.can_use {
        let reason = mile
            .reason
            .clone()
            .unwrap_or_else(|| "redemption not allowed for this student".to_string());
        warn!(%reason, "mile redemption rejected");
        return Err(BillingError::mile_rejected(reason));
    }

    if miles_to_use < MILE_MIN_POINTS {
        return Err(BillingError::mile_rejected(format!(
            "at least {} points required, got {}",
            MILE_MIN_POINTS, miles_to_use
        )));
    }

    let points_used = miles_to_use.min(mile.balance);
    Ok((points_used, mile_discount(points_used)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::ItemType;

    fn make_item(id: i64, unit_price: i64, quantity: i32) -> PricedItem {
        PricedItem {
            id,
            product_name: "月謝".to_string(),
            item_type: ItemType::Tuition,
            unit_price,
            quantity,
            final_price: unit_price * quantity as i64,
            contract_id: 1,
            billing_month: None,
        }
    }

    fn yen(id: i64, amount: i64) -> Discount {
        Discount {
            id,
            name: format!("割引{}", id),
            amount,
            unit: DiscountUnit::Yen,
            target_item_id: None,
        }
    }

    fn percent(id: i64, amount: i64, target: Option<i64>) -> Discount {
        Discount {
            id,
            name: format!("割引{}", id),
            amount,
            unit: DiscountUnit::Percent,
            target_item_id: target,
        }
    }

    // ==================== Amount Tests ====================

    #[test]
    fn test_yen_discount_is_flat() {
        let items = vec![make_item(1, 10000, 1)];
        assert_eq!(discount_amount(&yen(1, 2000), &items, 11000), 2000);
    }

    #[test]
    fn test_percent_discount_targets_item_pre_discount_base() {
        // 10000 x 1, tax-inclusive 11000; 10% -> 1100
        let items = vec![make_item(1, 10000, 1)];
        let d = percent(1, 10, Some(1));
        assert_eq!(discount_amount(&d, &items, 99999), 1100);
    }

    #[test]
    fn test_percent_discount_uses_quantity() {
        // 3000 x 2 = 6000, tax-inclusive 6600; 50% -> 3300
        let items = vec![make_item(1, 3000, 2)];
        let d = percent(1, 50, Some(1));
        assert_eq!(discount_amount(&d, &items, 0), 3300);
    }

    #[test]
    fn test_untargeted_percent_uses_contract_base() {
        let items = vec![make_item(1, 10000, 1)];
        let d = percent(1, 10, None);
        assert_eq!(discount_amount(&d, &items, 22000), 2200);
    }

    #[test]
    fn test_percent_with_missing_target_is_zero() {
        let items = vec![make_item(1, 10000, 1)];
        let d = percent(1, 10, Some(999));
        assert_eq!(discount_amount(&d, &items, 11000), 0);
    }

    #[test]
    fn test_percent_floors() {
        // 101 x 1 -> with_tax = 111; 33% of 111 = 36.63 -> 36
        let items = vec![make_item(1, 101, 1)];
        let d = percent(1, 33, Some(1));
        assert_eq!(discount_amount(&d, &items, 0), 36);
    }

    // ==================== Cap Tests ====================

    #[test]
    fn test_cap_reports_excess() {
        // Discounts sum 3000 against cap 2000 -> guardian 2000, school 1000
        let items = vec![make_item(1, 10000, 1)];
        let discounts = vec![yen(1, 2000), yen(2, 1000)];

        let outcome = apply_contract_discounts(&discounts, &items, 11000, Some(2000));
        assert_eq!(outcome.requested_total, 3000);
        assert_eq!(outcome.applied_total, 2000);
        assert_eq!(outcome.excess_amount, 1000);
        assert!(outcome.has_excess);
    }

    #[test]
    fn test_under_cap_no_excess() {
        let items = vec![make_item(1, 10000, 1)];
        let discounts = vec![yen(1, 1500)];

        let outcome = apply_contract_discounts(&discounts, &items, 11000, Some(2000));
        assert_eq!(outcome.applied_total, 1500);
        assert_eq!(outcome.excess_amount, 0);
        assert!(!outcome.has_excess);
    }

    #[test]
    fn test_no_cap_passes_through() {
        let items = vec![make_item(1, 10000, 1)];
        let discounts = vec![yen(1, 5000)];

        let outcome = apply_contract_discounts(&discounts, &items, 11000, None);
        assert_eq!(outcome.applied_total, 5000);
        assert!(!outcome.has_excess);
    }

    #[test]
    fn test_percent_not_compounded() {
        // Two 10% discounts each compute on the same pre-discount base:
        // 2 x 1100, not 1100 + 990
        let items = vec![make_item(1, 10000, 1)];
        let discounts = vec![percent(1, 10, Some(1)), percent(2, 10, Some(1))];

        let outcome = apply_contract_discounts(&discounts, &items, 11000, None);
        assert_eq!(outcome.requested_total, 2200);
    }

    // ==================== Mile Tests ====================

    #[test]
    fn test_mile_staircase() {
        assert_eq!(mile_discount(0), 0);
        assert_eq!(mile_discount(3), 0);
        assert_eq!(mile_discount(4), 500);
        // Odd counts round down: floor((5 - 2) / 2) = 1 step
        assert_eq!(mile_discount(5), 500);
        assert_eq!(mile_discount(6), 1000);
        assert_eq!(mile_discount(7), 1000);
        assert_eq!(mile_discount(10), 2000);
    }

    #[test]
    fn test_redemption_disabled_or_zero_is_ok() {
        let mile = MileInfo {
            balance: 10,
            can_use: true,
            reason: None,
        };
        assert_eq!(resolve_mile_redemption(&mile, false, 10).unwrap(), (0, 0));
        assert_eq!(resolve_mile_redemption(&mile, true, 0).unwrap(), (0, 0));
    }

    #[test]
    fn test_redemption_rejected_when_not_eligible() {
        let mile = MileInfo {
            balance: 10,
            can_use: false,
            reason: Some("併行契約が2件未満".to_string()),
        };
        let err = resolve_mile_redemption(&mile, true, 6).unwrap_err();
        assert!(matches!(err, BillingError::MileRedemptionRejected(_)));
    }

    #[test]
    fn test_redemption_rejected_below_minimum() {
        let mile = MileInfo {
            balance: 10,
            can_use: true,
            reason: None,
        };
        let err = resolve_mile_redemption(&mile, true, 3).unwrap_err();
        assert!(matches!(err, BillingError::MileRedemptionRejected(_)));
    }

    #[test]
    fn test_redemption_capped_at_balance() {
        let mile = MileInfo {
            balance: 6,
            can_use: true,
            reason: None,
        };
        let (points, discount) = resolve_mile_redemption(&mile, true, 100).unwrap();
        assert_eq!(points, 6);
        assert_eq!(discount, 1000);
    }

    #[test]
    fn test_negative_points_invalid() {
        let mile = MileInfo {
            balance: 10,
            can_use: true,
            reason: None,
        };
        let err = resolve_mile_redemption(&mile, true, -1).unwrap_err();
        assert!(matches!(err, BillingError::InvalidQuantity(_)));
    }
}
