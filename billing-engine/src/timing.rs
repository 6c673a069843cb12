//! Seasonal and textbook due-month resolution
//!
//! Seasonal items (講習 etc.) are billed only inside their calendar
//! window; textbook items follow the selected payment plan. Items outside
//! their window stay listed for visibility but contribute zero, with a
//! human-readable due note attached.

use shared::models::{TextbookOption, TextbookPaymentType};

/// Seasonal keyword windows, checked in order (first match wins)
///
/// 講習 alone (and 合宿 outside this table's 夏期 pairing) carries no
/// window of its own: an item matching no entry is due every month.
const SEASONAL_WINDOWS: [(&[&str], &[u32]); 4] = [
    (&["春期"], &[3, 4]),
    (&["夏期", "合宿"], &[7, 8]),
    (&["冬期"], &[12, 1]),
    (&["テスト対策", "模試"], &[5, 10, 1]),
];

/// The eligible billing months for a seasonal item name
///
/// `None` means unrestricted: the item is due whichever month is billed.
pub fn seasonal_window(product_name: &str) -> Option<&'static [u32]> {
    SEASONAL_WINDOWS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|kw| product_name.contains(kw)))
        .map(|(_, months)| *months)
}

/// Whether a seasonal item is due in `month`
pub fn seasonal_due(product_name: &str, month: u32) -> bool {
    match seasonal_window(product_name) {
        Some(months) => months.contains(&month),
        None => true,
    }
}

/// Human-readable due note for a seasonal item outside its window
pub fn seasonal_due_label(product_name: &str) -> Option<String> {
    let months = seasonal_window(product_name)?;
    let listed = months
        .iter()
        .map(|m| format!("{}月", m))
        .collect::<Vec<_>>()
        .join("・");
    Some(format!("{}に請求", listed))
}

// ==================== Textbook Timing ====================

/// Whether a textbook plan is due in `month`
///
/// Semi-annual plans bill in April and October only; monthly and annual
/// plans are always due.
pub fn textbook_due(payment_type: TextbookPaymentType, month: u32) -> bool {
    match payment_type {
        TextbookPaymentType::SemiAnnual => month == 4 || month == 10,
        TextbookPaymentType::Monthly | TextbookPaymentType::Annual => true,
    }
}

/// Whether a catalog textbook option is due in `month`
///
/// An explicit `billing_months` list from the catalog overrides the
/// payment-type rule.
pub fn option_due(option: &TextbookOption, month: u32) -> bool {
    if !option.billing_months.is_empty() {
        return option.billing_months.contains(&month);
    }
    textbook_due(option.payment_type, month)
}

/// Next due month label for a textbook plan, from `from_month`
///
/// Only semi-annual plans have a gap to report; always-due plans return
/// `None`.
pub fn next_due_month(payment_type: TextbookPaymentType, from_month: u32) -> Option<String> {
    match payment_type {
        TextbookPaymentType::SemiAnnual => Some(match from_month {
            1..=3 => "4月".to_string(),
            4..=9 => "10月".to_string(),
            _ => "翌年4月".to_string(),
        }),
        TextbookPaymentType::Monthly | TextbookPaymentType::Annual => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Seasonal Tests ====================

    #[test]
    fn test_seasonal_windows() {
        assert_eq!(seasonal_window("春期講習"), Some(&[3, 4][..]));
        assert_eq!(seasonal_window("夏期講習"), Some(&[7, 8][..]));
        assert_eq!(seasonal_window("勉強合宿"), Some(&[7, 8][..]));
        assert_eq!(seasonal_window("冬期講習"), Some(&[12, 1][..]));
        assert_eq!(seasonal_window("テスト対策ゼミ"), Some(&[5, 10, 1][..]));
        assert_eq!(seasonal_window("全国模試"), Some(&[5, 10, 1][..]));
        // 講習 alone has no window
        assert_eq!(seasonal_window("特別講習"), None);
    }

    #[test]
    fn test_summer_item_due_only_in_window() {
        for month in 1..=12 {
            let due = seasonal_due("夏期講習", month);
            assert_eq!(due, month == 7 || month == 8, "month {}", month);
        }
    }

    #[test]
    fn test_unrestricted_item_always_due() {
        for month in 1..=12 {
            assert!(seasonal_due("特別講習", month));
        }
    }

    #[test]
    fn test_yearly_contribution_is_exactly_two_months() {
        // Summing a summer item across all 12 months bills exactly twice
        let price = 15000_i64;
        let total: i64 = (1..=12)
            .map(|m| if seasonal_due("夏期講習", m) { price } else { 0 })
            .sum();
        assert_eq!(total, price * 2);
    }

    #[test]
    fn test_seasonal_due_label() {
        assert_eq!(seasonal_due_label("夏期講習").unwrap(), "7月・8月に請求");
        assert_eq!(
            seasonal_due_label("模試代").unwrap(),
            "5月・10月・1月に請求"
        );
        assert_eq!(seasonal_due_label("特別講習"), None);
    }

    // ==================== Textbook Tests ====================

    #[test]
    fn test_semi_annual_due_april_october() {
        for month in 1..=12 {
            let due = textbook_due(TextbookPaymentType::SemiAnnual, month);
            assert_eq!(due, month == 4 || month == 10, "month {}", month);
        }
    }

    #[test]
    fn test_monthly_and_annual_always_due() {
        for month in 1..=12 {
            assert!(textbook_due(TextbookPaymentType::Monthly, month));
            assert!(textbook_due(TextbookPaymentType::Annual, month));
        }
    }

    #[test]
    fn test_next_due_month_labels() {
        assert_eq!(
            next_due_month(TextbookPaymentType::SemiAnnual, 2).unwrap(),
            "4月"
        );
        assert_eq!(
            next_due_month(TextbookPaymentType::SemiAnnual, 4).unwrap(),
            "10月"
        );
        assert_eq!(
            next_due_month(TextbookPaymentType::SemiAnnual, 9).unwrap(),
            "10月"
        );
        assert_eq!(
            next_due_month(TextbookPaymentType::SemiAnnual, 11).unwrap(),
            "翌年4月"
        );
        assert_eq!(next_due_month(TextbookPaymentType::Monthly, 6), None);
    }

    #[test]
    fn test_explicit_billing_months_override_plan() {
        let option = TextbookOption {
            product_id: 1,
            payment_type: TextbookPaymentType::SemiAnnual,
            billing_months: vec![6],
            price_with_tax: 3300,
            enrollment_price_with_tax: None,
            enrollment_month: None,
        };
        assert!(option_due(&option, 6));
        assert!(!option_due(&option, 4));
    }
}
