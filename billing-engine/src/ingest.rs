//! Ingestion boundary
//!
//! The upstream back-office API is inconsistent: camelCase and
//! snake_case spellings coexist and dates travel as strings. All of that
//! is normalized here, exactly once; the engine's internal model has one
//! canonical spelling and parsed dates. A contract whose dates do not
//! parse is rejected with a typed error so the caller can degrade it to
//! a warning instead of failing the preview.

use tracing::warn;

use crate::period::{parse_date, parse_period};
use shared::error::{BillingError, BillingResult};
use shared::models::{Contract, ContractInput, Discount, DiscountInput, PricedItem, PricedItemInput};

/// Convert an upstream priced-item payload into the canonical model
///
/// `contract_id` fills in when the upstream nests items without
/// repeating the parent id. A missing `final_price` falls back to
/// `unit_price * quantity` (the catalog's own extension rule).
pub fn item_from_input(input: &PricedItemInput, contract_id: i64) -> PricedItem {
    let final_price = input
        .final_price
        .unwrap_or(input.unit_price * input.quantity as i64);

    let billing_month = match &input.billing_month {
        Some(raw) => {
            let parsed = parse_period(raw);
            if parsed.is_none() {
                warn!(item_id = input.id, %raw, "unparseable billing month dropped");
            }
            parsed
        }
        None => None,
    };

    PricedItem {
        id: input.id,
        product_name: input.product_name.clone(),
        item_type: input.item_type,
        unit_price: input.unit_price,
        quantity: input.quantity,
        final_price,
        contract_id: input.contract_id.unwrap_or(contract_id),
        billing_month,
    }
}

/// Convert an upstream discount payload into the canonical model
pub fn discount_from_input(input: &DiscountInput) -> Discount {
    Discount {
        id: input.id,
        name: input.name.clone(),
        amount: input.amount,
        unit: input.unit,
        target_item_id: input.target_item_id,
    }
}

/// Convert an upstream contract payload into the canonical model
///
/// Errors on an unparseable start date; an unparseable end date is
/// dropped (an open-ended contract is the safe reading, and end dates do
/// not affect billing computation).
pub fn contract_from_input(input: &ContractInput) -> BillingResult<Contract> {
    let start_date = parse_date(&input.start_date)
        .ok_or_else(|| BillingError::invalid_date(input.start_date.clone()))?;

    let end_date = match &input.end_date {
        Some(raw) => {
            let parsed = parse_date(raw);
            if parsed.is_none() {
                warn!(contract_id = input.id, %raw, "unparseable end date dropped");
            }
            parsed
        }
        None => None,
    };

    Ok(Contract {
        id: input.id,
        student_id: input.student_id,
        brand_id: input.brand_id,
        school_id: input.school_id,
        start_date,
        end_date,
        discount_max: input.discount_max,
        items: input
            .items
            .iter()
            .map(|i| item_from_input(i, input.id))
            .collect(),
        discounts: input.discounts.iter().map(discount_from_input).collect(),
        status: input.status,
    })
}
