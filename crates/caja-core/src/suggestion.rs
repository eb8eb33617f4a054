//! # Change Suggestion Engine
//!
//! Proposes which bills to hand over for an amount, using only what the
//! drawer holds.
//!
//! ## Greedy Descent
//! ```text
//! amount 640, drawer {500: 1, 100: 3, 20: 2, 1: 10}
//!
//!   500 → use min(1, 640/500=1) = 1   remaining 140
//!   200 → none in stock
//!   100 → use min(3, 140/100=1) = 1   remaining  40
//!    50 → none in stock
//!    20 → use min(2,  40/20 =2) = 2   remaining   0
//!   ...  → nothing left to cover
//!
//! result {500: 1, 100: 1, 20: 2}   total 640   shortfall 0
//! ```
//!
//! Greedy is not optimal: with `{50: 1, 20: 3}` and amount 60 it takes the 50
//! and stops with a shortfall of 10, although `20 × 3` would have been exact.
//! The shortfall is left for the caller to report, never filled by search.

use crate::bundle::BillBundle;
use crate::denomination::Denomination;
use crate::inventory::InventorySnapshot;
use crate::validation::{validate_amount, ValidationResult};
use std::collections::BTreeMap;

/// Greedy breakdown of `amount` drawn from `inventory`.
///
/// Only denominations actually used appear in the result. Never uses more of a
/// denomination than `inventory` holds and never exceeds `amount`.
///
/// ## Errors
/// [`crate::ValidationError::Negative`] for a negative amount.
///
/// ## Example
/// ```rust
/// use caja_core::{suggest, shortfall, InventorySnapshot};
///
/// let inventory = InventorySnapshot::from_counts([(100, 1)]).unwrap();
/// let bills = suggest(350, &inventory).unwrap();
///
/// assert_eq!(bills.total_value(), 100);
/// assert_eq!(shortfall(350, &bills), 250);
/// ```
pub fn suggest(amount: i64, inventory: &InventorySnapshot) -> ValidationResult<BillBundle> {
    validate_amount("amount", amount)?;

    let mut remaining = amount;
    let mut used = BTreeMap::new();

    for denomination in Denomination::all() {
        let available = inventory.count(denomination);
        let take = available.min(remaining / denomination.value());

        if take > 0 {
            used.insert(denomination, take);
            remaining -= denomination.times(take);
        }
    }

    Ok(BillBundle::from_positive(used))
}

/// Part of `amount` a suggestion leaves uncovered.
pub fn shortfall(amount: i64, suggestion: &BillBundle) -> i64 {
    amount - suggestion.total_value()
}

// =============================================================================
// Unit Tests
// =============================================================================
