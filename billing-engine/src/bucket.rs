//! Multi-month billing bucket assembly
//!
//! Builds the preview/confirmation structure: an enrollment bucket plus
//! the current (contract start) month and its projections. Every line is
//! kept visible: excluded facility fees and not-yet-due seasonal or
//! textbook items appear with amount 0 and an explanatory note instead of
//! being dropped.

use serde::{Deserialize, Serialize};

use crate::classify::{ItemCategory, classify};
use crate::dedup::FacilityDedup;
use crate::money::with_tax;
use crate::timing;
use shared::models::{BillingPeriod, PricedItem, TextbookOption, TextbookPaymentType};

/// Which month a bucket bills
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BucketLabel {
    Enrollment,
    CurrentMonth,
    Month1,
    Month2,
    Month3,
}

/// One itemized charge line inside a bucket
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BillingLine {
    pub item: PricedItem,
    /// Tax-inclusive contribution to the bucket total; 0 when excluded
    /// or not due this month
    pub amount: i64,
    /// Struck by facility deduplication
    pub excluded: bool,
    /// Why the amount is 0 this month ("7月・8月に請求" etc.)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_note: Option<String>,
}

/// A named group of charges for one calendar month of invoicing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BillingBucket {
    pub label: BucketLabel,
    pub period: BillingPeriod,
    pub lines: Vec<BillingLine>,
    pub recurring_subtotal: i64,
    pub seasonal_subtotal: i64,
    pub textbook_subtotal: i64,
    /// Guardian-facing discount netted into `total`
    pub discount_applied: i64,
    pub total: i64,
}

impl BillingBucket {
    pub(crate) fn empty(label: BucketLabel, period: BillingPeriod) -> Self {
        Self {
            label,
            period,
            lines: vec![],
            recurring_subtotal: 0,
            seasonal_subtotal: 0,
            textbook_subtotal: 0,
            discount_applied: 0,
            total: 0,
        }
    }
}

/// The full month-bucketed preview structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonthlyBilling {
    pub enrollment: BillingBucket,
    pub current_month: BillingBucket,
    pub month1: BillingBucket,
    pub month2: BillingBucket,
    /// Present only once the closing day for the period has passed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month3: Option<BillingBucket>,
}

/// Build the enrollment bucket: one-time items, facility exclusions applied
///
/// The caller shows this bucket only when the start month is current or
/// future; the lines are built unconditionally so confirmation views can
/// still itemize past enrollments.
pub fn build_enrollment_bucket(
    items: &[&PricedItem],
    dedup: &FacilityDedup,
    period: BillingPeriod,
) -> BillingBucket {
    let mut bucket = BillingBucket::empty(BucketLabel::Enrollment, period);

    for item in items {
        if classify(item).category != ItemCategory::EnrollmentOneTime {
            continue;
        }
        let excluded = dedup.is_excluded(item);
        let amount = if excluded { 0 } else { with_tax(item.final_price) };
        bucket.total += amount;
        bucket.lines.push(BillingLine {
            item: (*item).clone(),
            amount,
            excluded,
            due_note: None,
        });
    }

    bucket
}

/// Build one monthly bucket: recurring items minus the contract
/// discounts, plus whatever seasonal/textbook charges fall due in
/// `period`'s month
///
/// `discount_applied` is the capped guardian discount across the
/// supplied contracts; it nets against the recurring subtotal only and
/// never pushes the bucket negative.
pub fn build_month_bucket(
    label: BucketLabel,
    period: BillingPeriod,
    items: &[&PricedItem],
    dedup: &FacilityDedup,
    discount_applied: i64,
    textbook_plan: Option<&TextbookOption>,
) -> BillingBucket {
    let mut bucket = BillingBucket::empty(label, period);
    let month = period.month;

    for item in items {
        let tags = classify(item);
        if tags.category == ItemCategory::EnrollmentOneTime {
            continue;
        }

        let excluded = dedup.is_excluded(item);
        let taxed = with_tax(item.final_price);

        let (amount, due_note) = if excluded {
            (0, None)
        } else {
            match tags.category {
                ItemCategory::MonthlyRecurring => {
                    bucket.recurring_subtotal += taxed;
                    (taxed, None)
                }
                ItemCategory::Seasonal => {
                    if timing::seasonal_due(&item.product_name, month) {
                        bucket.seasonal_subtotal += taxed;
                        (taxed, None)
                    } else {
                        (0, timing::seasonal_due_label(&item.product_name))
                    }
                }
                ItemCategory::Textbook => {
                    let payment_type = textbook_plan
                        .map(|p| p.payment_type)
                        .unwrap_or(TextbookPaymentType::Monthly);
                    let due = match textbook_plan {
                        Some(plan) => timing::option_due(plan, month),
                        None => timing::textbook_due(payment_type, month),
                    };
                    if due {
                        bucket.textbook_subtotal += taxed;
                        (taxed, None)
                    } else {
                        let note = timing::next_due_month(payment_type, month)
                            .map(|next| format!("{}に請求", next));
                        (0, note)
                    }
                }
                ItemCategory::EnrollmentOneTime => unreachable!(),
            }
        };

        bucket.lines.push(BillingLine {
            item: (*item).clone(),
            amount,
            excluded,
            due_note,
        });
    }

    // Discounts net against the recurring portion only
    bucket.discount_applied = discount_applied.min(bucket.recurring_subtotal).max(0);
    bucket.total = (bucket.recurring_subtotal - bucket.discount_applied).max(0)
        + bucket.seasonal_subtotal
        + bucket.textbook_subtotal;

    bucket
}
