//! Line-item classification
//!
//! Tags each priced item as one-time/enrollment, recurring/monthly,
//! textbook, or seasonal, with facility as an orthogonal second label for
//! deduplication. Classification combines the catalog item-type code with
//! keyword checks on the free-text product name; the keyword tables are
//! deliberately private to this module so a catalog-driven tag can
//! replace them without touching downstream logic.

use shared::models::{ItemType, PricedItem};

/// Primary billing category of an item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemCategory {
    /// Billed once, in the enrollment month (入会金 etc.)
    EnrollmentOneTime,
    /// Billed every month (月謝 etc.)
    MonthlyRecurring,
    /// Billed per the selected textbook payment plan
    Textbook,
    /// Billed only in the item's seasonal window (講習 etc.)
    Seasonal,
}

/// Classification result: primary category plus the facility label
///
/// Facility items keep their primary category (an enrollment-time
/// facility charge is still an enrollment item) and are additionally
/// subject to cross-contract deduplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemTags {
    pub category: ItemCategory,
    pub is_facility: bool,
}

/// Item-type codes billed once at enrollment
const ENROLLMENT_TYPES: [ItemType; 9] = [
    ItemType::Enrollment,
    ItemType::EnrollmentTuition,
    ItemType::EnrollmentMonthlyFee,
    ItemType::EnrollmentFacility,
    ItemType::EnrollmentTextbook,
    ItemType::EnrollmentExpense,
    ItemType::EnrollmentManagement,
    ItemType::Bag,
    ItemType::Abacus,
];

/// Product-name keyword marking an enrollment fee
const ENROLLMENT_KEYWORD: &str = "入会金";

/// Product-name keywords marking a seasonal item
const SEASONAL_KEYWORDS: [&str; 7] = ["春期", "夏期", "冬期", "講習", "合宿", "テスト対策", "模試"];

/// Classify one priced item
///
/// Priority order, first match wins:
/// 1. Enrollment item-type code, or 入会金 in the product name
/// 2. Textbook/material item-type code
/// 3. Seasonal keyword in the product name
/// 4. Monthly recurring
pub fn classify(item: &PricedItem) -> ItemTags {
    let is_facility = matches!(
        item.item_type,
        ItemType::EnrollmentFacility | ItemType::Facility
    );

    if ENROLLMENT_TYPES.contains(&item.item_type)
        || item.product_name.contains(ENROLLMENT_KEYWORD)
    {
        return ItemTags {
            category: ItemCategory::EnrollmentOneTime,
            is_facility,
        };
    }

    if matches!(item.item_type, ItemType::Textbook | ItemType::Material) {
        return ItemTags {
            category: ItemCategory::Textbook,
            is_facility,
        };
    }

    let name = item.product_name.to_lowercase();
    if SEASONAL_KEYWORDS.iter().any(|kw| name.contains(kw)) {
        return ItemTags {
            category: ItemCategory::Seasonal,
            is_facility,
        };
    }

    ItemTags {
        category: ItemCategory::MonthlyRecurring,
        is_facility,
    }
}
