//! Billing preview computation
//!
//! The single request/response pair the engine exposes. The caller (UI
//! or invoice writer) supplies a student's contracts and selections; the
//! engine returns itemized month buckets, totals, and any degradation
//! warnings. Computation is best-effort: a malformed contract among
//! several degrades to a warning and a zero contribution, never a failed
//! preview.

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::bucket::{
    BillingBucket, BucketLabel, MonthlyBilling, build_enrollment_bucket, build_month_bucket,
};
use crate::classify::{ItemCategory, classify};
use crate::dedup::{FacilityDedup, dedup_facility};
use crate::discount::{DiscountOutcome, apply_contract_discounts, resolve_mile_redemption};
use crate::ingest;
use crate::money::with_tax;
use crate::period::{
    DEFAULT_CLOSING_DAY, contract_billing_month, current_working_period, is_period_closed,
    parse_date,
};
use crate::timing;
use shared::error::{BillingError, BillingWarning};
use shared::models::{
    BillingPeriod, Contract, ContractInput, ContractStatus, DiscountInput, MileInfo, PricedItem,
    TextbookOption,
};

/// Billing preview request
///
/// `contracts` carries the student's full contract set (the candidate
/// included) as the upstream API sends it; `today` is explicit so
/// previews are reproducible, defaulting to the local clock only at this
/// boundary.
#[derive(Debug, Clone, Deserialize)]
pub struct BillingRequest {
    #[serde(alias = "studentId")]
    pub student_id: i64,
    #[serde(default)]
    pub contracts: Vec<ContractInput>,
    #[serde(alias = "startDate")]
    pub start_date: String,
    #[serde(alias = "requestedDiscounts", default)]
    pub requested_discounts: Vec<DiscountInput>,
    #[serde(alias = "selectedTextbookProductId", default)]
    pub selected_textbook_product_id: Option<i64>,
    #[serde(alias = "textbookOptions", default)]
    pub textbook_options: Vec<TextbookOption>,
    #[serde(alias = "useMiles", default)]
    pub use_miles: bool,
    #[serde(alias = "milesToUse", default)]
    pub miles_to_use: i64,
    #[serde(alias = "closingDay", default)]
    pub closing_day: Option<u32>,
    #[serde(default)]
    pub today: Option<NaiveDate>,
    #[serde(alias = "closedMonths", default)]
    pub closed_months: HashSet<BillingPeriod>,
    #[serde(alias = "mileInfo", default)]
    pub mile_info: MileInfo,
}

/// A catalog textbook option annotated for the purchase wizard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TextbookOptionView {
    pub option: TextbookOption,
    pub selected: bool,
    /// Due in the contract's start month
    pub due_this_month: bool,
    /// Next due month label when not due ("10月", "翌年4月")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_due: Option<String>,
}

/// Billing preview response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BillingPreview {
    pub billing_by_month: MonthlyBilling,
    /// Enrollment (when applicable) + current month - mile discount
    pub grand_total: i64,
    /// Guardian-facing discount, capped per contract
    pub discount_total: i64,
    /// School-absorbed discount above the caps
    pub excess_amount: i64,
    pub has_excess: bool,
    pub is_enrollment_month: bool,
    /// The requested billing month is finalized organization-side and no
    /// longer accepts edits
    pub period_closed: bool,
    pub mile_discount: i64,
    pub miles_used: i64,
    pub mile_info: MileInfo,
    pub textbook_options: Vec<TextbookOptionView>,
    pub warnings: Vec<BillingWarning>,
}

/// Compute a billing preview
///
/// Pure apart from the `today` default: identical requests with an
/// explicit `today` produce identical previews.
pub fn compute(request: &BillingRequest) -> BillingPreview {
    let today = request
        .today
        .unwrap_or_else(|| Local::now().date_naive());
    let closing_day = request.closing_day.unwrap_or(DEFAULT_CLOSING_DAY);
    let mut warnings: Vec<BillingWarning> = vec![];

    // ==================== Ingest (isolate per-contract failures) ====================

    let mut contracts: Vec<Contract> = Vec::with_capacity(request.contracts.len());
    for input in &request.contracts {
        match ingest::contract_from_input(input) {
            Ok(contract) => contracts.push(contract),
            Err(BillingError::InvalidDate(raw)) => {
                warn!(contract_id = input.id, %raw, "contract excluded: bad start date");
                warnings.push(BillingWarning::InvalidStartDate {
                    contract_id: input.id,
                    raw,
                });
            }
            Err(err) => {
                warn!(contract_id = input.id, %err, "contract excluded");
                warnings.push(BillingWarning::InvalidStartDate {
                    contract_id: input.id,
                    raw: err.to_string(),
                });
            }
        }
    }

    // Terminated contracts exist for audit; only active ones bill
    let active: Vec<&Contract> = contracts
        .iter()
        .filter(|c| c.status == ContractStatus::Active)
        .collect();

    for contract in &active {
        if contract.items.is_empty() {
            warnings.push(BillingWarning::NoBillableItems {
                contract_id: contract.id,
            });
        }
    }

    // ==================== Mile redemption ====================

    let mile_result =
        resolve_mile_redemption(&request.mile_info, request.use_miles, request.miles_to_use);
    let (miles_used, mile_discount) = match mile_result {
        Ok(pair) => pair,
        Err(err) => {
            warnings.push(BillingWarning::MileRedemptionRejected {
                reason: err.to_string(),
            });
            (0, 0)
        }
    };

    // ==================== Temporal frame ====================

    let Some(start_date) = parse_date(&request.start_date) else {
        warn!(raw = %request.start_date, "request start date unparseable, returning empty preview");
        warnings.push(BillingWarning::InvalidRequestStartDate {
            raw: request.start_date.clone(),
        });
        return empty_preview(request, current_working_period(today, closing_day), warnings);
    };

    let start_period = contract_billing_month(start_date);
    let working_period = current_working_period(today, closing_day);
    let is_enrollment_month = start_period >= BillingPeriod::from_date(today);
    let period_closed = is_period_closed(start_period, working_period, &request.closed_months);
    let include_month3 = today.day() > closing_day;

    // ==================== Classification and dedup ====================

    let items: Vec<&PricedItem> = active.iter().flat_map(|c| c.items.iter()).collect();
    let dedup = dedup_facility(&items);

    // ==================== Discounts ====================

    let requested: Vec<_> = request
        .requested_discounts
        .iter()
        .map(ingest::discount_from_input)
        .collect();
    // Dialog-level discounts attach to the candidate contract: the one
    // starting in the requested month, else the first active one
    let candidate_id = active
        .iter()
        .find(|c| contract_billing_month(c.start_date) == start_period)
        .or(active.first())
        .map(|c| c.id);

    let mut discount_total = 0_i64;
    let mut excess_amount = 0_i64;
    for contract in &active {
        let monthly_base = recurring_base(contract, &dedup);
        let mut discounts = contract.discounts.clone();
        if Some(contract.id) == candidate_id {
            discounts.extend(requested.iter().cloned());
        }
        let outcome: DiscountOutcome =
            apply_contract_discounts(&discounts, &contract.items, monthly_base, contract.discount_max);
        discount_total += outcome.applied_total;
        excess_amount += outcome.excess_amount;
        if outcome.has_excess {
            warnings.push(BillingWarning::DiscountCapExceeded {
                contract_id: contract.id,
                excess: outcome.excess_amount,
            });
        }
    }
    let has_excess = excess_amount > 0;

    // ==================== Textbook plan ====================

    let selected_plan = request.selected_textbook_product_id.and_then(|id| {
        request
            .textbook_options
            .iter()
            .find(|o| o.product_id == id)
    });

    let textbook_options = request
        .textbook_options
        .iter()
        .map(|option| {
            let due = timing::option_due(option, start_period.month);
            TextbookOptionView {
                option: option.clone(),
                selected: Some(option.product_id) == request.selected_textbook_product_id,
                due_this_month: due,
                next_due: if due {
                    None
                } else {
                    timing::next_due_month(option.payment_type, start_period.month)
                },
            }
        })
        .collect();

    // ==================== Buckets ====================

    let enrollment = build_enrollment_bucket(&items, &dedup, start_period);
    let current_month = build_month_bucket(
        BucketLabel::CurrentMonth,
        start_period,
        &items,
        &dedup,
        discount_total,
        selected_plan,
    );
    let month1 = build_month_bucket(
        BucketLabel::Month1,
        start_period.plus_months(1),
        &items,
        &dedup,
        discount_total,
        selected_plan,
    );
    let month2 = build_month_bucket(
        BucketLabel::Month2,
        start_period.plus_months(2),
        &items,
        &dedup,
        discount_total,
        selected_plan,
    );
    let month3 = include_month3.then(|| {
        build_month_bucket(
            BucketLabel::Month3,
            start_period.plus_months(3),
            &items,
            &dedup,
            discount_total,
            selected_plan,
        )
    });

    // Discounts are already netted into the bucket totals; the grand
    // total must not subtract them again
    let enrollment_total = if is_enrollment_month { enrollment.total } else { 0 };
    let grand_total = (enrollment_total + current_month.total - mile_discount).max(0);

    debug!(
        student_id = request.student_id,
        grand_total,
        discount_total,
        excess_amount,
        "billing preview computed"
    );

    BillingPreview {
        billing_by_month: MonthlyBilling {
            enrollment,
            current_month,
            month1,
            month2,
            month3,
        },
        grand_total,
        discount_total,
        excess_amount,
        has_excess,
        is_enrollment_month,
        period_closed,
        mile_discount,
        miles_used,
        mile_info: request.mile_info.clone(),
        textbook_options,
        warnings,
    }
}

/// Tax-inclusive recurring subtotal of one contract, exclusions applied
///
/// The pre-discount base for untargeted percent discounts.
fn recurring_base(contract: &Contract, dedup: &FacilityDedup) -> i64 {
    contract
        .items
        .iter()
        .filter(|i| classify(i).category == ItemCategory::MonthlyRecurring)
        .filter(|i| !dedup.is_excluded(i))
        .map(|i| with_tax(i.final_price))
        .sum()
}

/// Zero preview for an unusable request start date
fn empty_preview(
    request: &BillingRequest,
    period: BillingPeriod,
    warnings: Vec<BillingWarning>,
) -> BillingPreview {
    BillingPreview {
        billing_by_month: MonthlyBilling {
            enrollment: BillingBucket::empty(BucketLabel::Enrollment, period),
            current_month: BillingBucket::empty(BucketLabel::CurrentMonth, period),
            month1: BillingBucket::empty(BucketLabel::Month1, period.plus_months(1)),
            month2: BillingBucket::empty(BucketLabel::Month2, period.plus_months(2)),
            month3: None,
        },
        grand_total: 0,
        discount_total: 0,
        excess_amount: 0,
        has_excess: false,
        is_enrollment_month: false,
        period_closed: true,
        mile_discount: 0,
        miles_used: 0,
        mile_info: request.mile_info.clone(),
        textbook_options: vec![],
        warnings,
    }
}
