//! Facility fee deduplication
//!
//! A student enrolled in multiple brands/schools simultaneously pays the
//! shared facility fee once, at the highest applicable rate. Across all
//! facility-tagged items of all contracts under consideration, exactly
//! one survives; the rest are excluded and contribute zero everywhere.

use tracing::debug;

use crate::classify::classify;
use crate::money::with_tax;
use shared::models::PricedItem;
use std::collections::HashSet;

/// Identity of an item across contracts
pub type ItemKey = (i64, i64); // (contract_id, item_id)

/// Result of facility deduplication
#[derive(Debug, Clone, Default)]
pub struct FacilityDedup {
    /// The surviving facility item, if any facility item exists
    pub kept: Option<ItemKey>,
    /// Facility items struck from all totals
    pub excluded: HashSet<ItemKey>,
}

impl FacilityDedup {
    /// Whether an item was struck by deduplication
    pub fn is_excluded(&self, item: &PricedItem) -> bool {
        self.excluded.contains(&(item.contract_id, item.id))
    }
}

/// Deduplicate facility fees across every supplied item
///
/// The item with the highest tax-inclusive price is kept. On a tie the
/// first item in iteration order wins; a strict `>` comparison during a
/// single forward scan guarantees exactly that, and no more.
pub fn dedup_facility(items: &[&PricedItem]) -> FacilityDedup {
    let mut kept: Option<(ItemKey, i64)> = None;

    for item in items {
        if !classify(item).is_facility {
            continue;
        }
        let price = with_tax(item.final_price);
        match kept {
            Some((_, best)) if price > best => {
                kept = Some(((item.contract_id, item.id), price));
            }
            None => {
                kept = Some(((item.contract_id, item.id), price));
            }
            _ => {}
        }
    }

    let kept_key = kept.map(|(key, _)| key);
    let excluded: HashSet<ItemKey> = items
        .iter()
        .filter(|i| classify(i).is_facility)
        .map(|i| (i.contract_id, i.id))
        .filter(|key| Some(*key) != kept_key)
        .collect();

    if let Some(key) = kept_key {
        debug!(
            kept_contract = key.0,
            kept_item = key.1,
            excluded = excluded.len(),
            "facility fee deduplicated"
        );
    }

    FacilityDedup {
        kept: kept_key,
        excluded,
    }
}
