//! Admin dashboard aggregation over a fetched inventory snapshot.

use std::collections::HashSet;

use serde::Serialize;

use crate::money::Money;
use crate::types::Sweet;
use crate::{LOW_STOCK_THRESHOLD, RECENT_SWEETS_LIMIT};

/// Summary figures shown on the admin home page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryStats {
    pub total_sweets: usize,
    /// Items with quantity under the low-stock threshold.
    pub low_stock: usize,
    /// Distinct category names, compared exactly.
    pub total_categories: usize,
    /// Σ price × quantity.
    pub total_value: Money,
}

impl InventoryStats {
    /// Computes the summary using [`LOW_STOCK_THRESHOLD`].
    ///
    /// ## Example
    /// ```rust
    /// use sweetshop_core::{InventoryStats, Money, Sweet};
    ///
    /// let sweet = |qty: i64| Sweet {
    ///     id: qty.to_string(),
    ///     name: "Barfi".into(),
    ///     category: "Milk".into(),
    ///     price: Money::from_minor(100),
    ///     quantity: qty,
    ///     description: None,
    /// };
    /// let stats = InventoryStats::from_sweets(&[sweet(5), sweet(20)]);
    /// assert_eq!(stats.low_stock, 1);
    /// assert_eq!(stats.total_value, Money::from_minor(2500));
    /// ```
    pub fn from_sweets(sweets: &[Sweet]) -> Self {
        Self::with_threshold(sweets, LOW_STOCK_THRESHOLD)
    }

    pub fn with_threshold(sweets: &[Sweet], threshold: i64) -> Self {
        let categories: HashSet<&str> = sweets.iter().map(|s| s.category.as_str()).collect();

        InventoryStats {
            total_sweets: sweets.len(),
            low_stock: sweets.iter().filter(|s| s.quantity < threshold).count(),
            total_categories: categories.len(),
            total_value: sweets.iter().map(Sweet::stock_value).sum(),
        }
    }
}

/// The first few items of the snapshot, in backend order.
pub fn recent_sweets(sweets: &[Sweet]) -> &[Sweet] {
    &sweets[..sweets.len().min(RECENT_SWEETS_LIMIT)]
}

// =============================================================================
// Unit Tests
// =============================================================================
