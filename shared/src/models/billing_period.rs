//! Billing period value type
//!
//! A calendar month of invoicing. Ordered by `year * 100 + month` so
//! period comparisons ("is this month still open?") are plain integer
//! comparisons, matching how closed months are stored organization-side.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One calendar month of invoicing (請求月)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct BillingPeriod {
    pub year: i32,
    /// 1-12
    pub month: u32,
}

impl BillingPeriod {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// Period of the month containing `date`
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Comparable period value (`year * 100 + month`)
    pub fn value(&self) -> i32 {
        self.year * 100 + self.month as i32
    }

    /// The following calendar month, wrapping December to January
    pub fn next(&self) -> Self {
        self.plus_months(1)
    }

    /// `n` calendar months ahead, wrapping years as needed
    pub fn plus_months(&self, n: u32) -> Self {
        let zero_based = self.month - 1 + n;
        Self {
            year: self.year + (zero_based / 12) as i32,
            month: zero_based % 12 + 1,
        }
    }
}

impl Ord for BillingPeriod {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.value().cmp(&other.value())
    }
}

impl PartialOrd for BillingPeriod {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}年{}月", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_value_ordering() {
        let a = BillingPeriod::new(2024, 12);
        let b = BillingPeriod::new(2025, 1);
        assert!(a < b);
        assert_eq!(a.value(), 202412);
        assert_eq!(b.value(), 202501);
    }

    #[test]
    fn test_plus_months_wraps_year() {
        let p = BillingPeriod::new(2024, 11);
        assert_eq!(p.plus_months(1), BillingPeriod::new(2024, 12));
        assert_eq!(p.plus_months(2), BillingPeriod::new(2025, 1));
        assert_eq!(p.plus_months(14), BillingPeriod::new(2026, 1));
    }

    #[test]
    fn test_from_date() {
        let d = NaiveDate::from_ymd_opt(2025, 4, 15).unwrap();
        assert_eq!(BillingPeriod::from_date(d), BillingPeriod::new(2025, 4));
    }

    #[test]
    fn test_display() {
        assert_eq!(BillingPeriod::new(2025, 4).to_string(), "2025年4月");
    }
}
