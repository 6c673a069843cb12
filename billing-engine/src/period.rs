//! Billing period resolution
//!
//! Two independent rules coexist:
//! - A contract's own invoice month is simply its start month.
//! - The organization-wide "working period" (the month currently open for
//!   new charges) rolls forward past the closing day: before the closing
//!   day it is next month, after it is the month after next.
//!
//! Past periods stay editable until the organization explicitly finalizes
//! them, so closedness is a two-tier check: current-or-future is always
//! open, past is closed only when listed in the finalized set.

use chrono::{Datelike, NaiveDate};
use std::collections::HashSet;

use shared::models::BillingPeriod;

/// Default closing day (every month's 10th)
pub const DEFAULT_CLOSING_DAY: u32 = 10;

/// The contract's own invoice month: its start month, no closing-day offset
pub fn contract_billing_month(start_date: NaiveDate) -> BillingPeriod {
    BillingPeriod::from_date(start_date)
}

/// The billing period currently open for new charges
///
/// Past the closing day, new charges roll one extra month forward:
/// - `today.day > closing_day` -> two months ahead (Nov -> Jan, Dec -> Feb)
/// - otherwise -> one month ahead (Dec -> Jan)
pub fn current_working_period(today: NaiveDate, closing_day: u32) -> BillingPeriod {
    let offset = if today.day() > closing_day { 2 } else { 1 };
    BillingPeriod::from_date(today).plus_months(offset)
}

/// Whether a contract's billing period is closed for edits
///
/// Periods at or ahead of the current working period are always open.
/// Past periods are closed only when the organization has explicitly
/// finalized them.
pub fn is_period_closed(
    contract_period: BillingPeriod,
    current_period: BillingPeriod,
    closed_months: &HashSet<BillingPeriod>,
) -> bool {
    if contract_period.value() >= current_period.value() {
        return false;
    }
    closed_months.contains(&contract_period)
}

/// Parse an upstream date string
///
/// Tolerates the two spellings the back office actually sends. `None`
/// means the owning record is excluded from period-dependent filtering,
/// never a panic.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y/%m/%d"))
        .ok()
}

/// Parse an upstream "YYYY-MM" period string
pub fn parse_period(raw: &str) -> Option<BillingPeriod> {
    let raw = raw.trim();
    let (y, m) = raw.split_once(['-', '/'])?;
    let year: i32 = y.parse().ok()?;
    let month: u32 = m.parse().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }
    Some(BillingPeriod::new(year, month))
}
