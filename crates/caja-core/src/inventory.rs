//! # Inventory Math
//!
//! Pure, storage-independent half of the Inventory Ledger.
//!
//! ## Apply Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    InventorySnapshot::apply                             │
//! │                                                                         │
//! │  current {100: 1, 50: 4}     delta {100: -2, 50: +1}                    │
//! │       │                            │                                    │
//! │       └────────────┬───────────────┘                                    │
//! │                    ▼                                                    │
//! │      for each denomination in delta:                                    │
//! │        next = current + change                                          │
//! │        next < 0 ? ──► Err(InsufficientStock)  (current untouched)       │
//! │        next > MAX_PIECES ? ──► Err(StockLimit)                          │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │      Ok(new snapshot)  ← only built when EVERY entry stays >= 0         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `apply` never mutates `self`; the caller swaps in the returned snapshot (or
//! writes it to storage) only on success, which is what makes it all-or-nothing.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::bundle::BillBundle;
use crate::denomination::Denomination;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::MAX_PIECES;

// =============================================================================
// Inventory Entry
// =============================================================================

/// Stock of one denomination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryEntry {
    pub denomination: Denomination,
    pub count: i64,
}

impl InventoryEntry {
    /// denomination × count.
    #[inline]
    pub fn value(&self) -> i64 {
        self.denomination.times(self.count)
    }
}

// =============================================================================
// Stock Delta
// =============================================================================

/// Signed change per denomination.
///
/// ## Sign Convention
/// | Movement              | Delta           |
/// |-----------------------|-----------------|
/// | create deposit        | `+bills`        |
/// | create expense        | `-bills`        |
/// | delete deposit        | `-bills`        |
/// | delete expense        | `+bills`        |
/// | edit deposit          | `-old + new`    |
/// | edit expense          | `+old - new`    |
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockDelta {
    changes: BTreeMap<Denomination, i64>,
}

impl StockDelta {
    /// A delta that changes nothing.
    pub fn new() -> Self {
        StockDelta::default()
    }

    /// `+bills`: pieces entering the drawer.
    pub fn credit(bills: &BillBundle) -> Self {
        let mut delta = StockDelta::new();
        for (denomination, count) in bills.iter() {
            delta.add(denomination, count);
        }
        delta
    }

    /// `-bills`: pieces leaving the drawer.
    pub fn debit(bills: &BillBundle) -> Self {
        StockDelta::credit(bills).negated()
    }

    /// Adds `change` to one denomination, dropping the entry if it nets to zero.
    ///
    /// Saturates at the `i64` bounds; a saturated change can never pass
    /// [`InventorySnapshot::apply`].
    pub fn add(&mut self, denomination: Denomination, change: i64) {
        let entry = self.changes.entry(denomination).or_insert(0);
        *entry = entry.saturating_add(change);
        if *entry == 0 {
            self.changes.remove(&denomination);
        }
    }

    /// Combines two deltas into their net effect.
    pub fn then(mut self, other: StockDelta) -> Self {
        for (denomination, change) in other.changes {
            self.add(denomination, change);
        }
        self
    }

    /// The inverse delta.
    pub fn negated(self) -> Self {
        StockDelta {
            changes: self
                .changes
                .into_iter()
                .map(|(denomination, change)| (denomination, change.saturating_neg()))
                .collect(),
        }
    }

    /// Change for one denomination (0 when untouched).
    pub fn change(&self, denomination: Denomination) -> i64 {
        self.changes.get(&denomination).copied().unwrap_or(0)
    }

    /// Non-zero changes, largest denomination first.
    pub fn iter(&self) -> impl Iterator<Item = (Denomination, i64)> + '_ {
        self.changes.iter().rev().map(|(&denomination, &change)| (denomination, change))
    }

    /// True when applying this delta is a no-op.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

}

// =============================================================================
// Inventory Snapshot
// =============================================================================

/// Immutable per-denomination counts.
///
/// Always holds one entry per denomination in the set (missing input entries
/// read as 0), and every count is `>= 0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventorySnapshot {
    counts: BTreeMap<Denomination, i64>,
}

impl Default for InventorySnapshot {
    fn default() -> Self {
        InventorySnapshot::empty()
    }
}

impl InventorySnapshot {
    /// A drawer with zero of everything.
    pub fn empty() -> Self {
        InventorySnapshot {
            counts: Denomination::all().map(|denomination| (denomination, 0)).collect(),
        }
    }

    /// Builds a snapshot from stored entries.
    ///
    /// ## Errors
    /// - [`ValidationError::Negative`] if any stored count is below zero
    /// - [`ValidationError::OutOfRange`] if any stored count exceeds [`MAX_PIECES`]
    pub fn from_entries<I>(entries: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = InventoryEntry>,
    {
        let mut snapshot = InventorySnapshot::empty();
        for entry in entries {
            let field = || format!("stock of {}", entry.denomination);
            if entry.count < 0 {
                return Err(ValidationError::Negative {
                    field: field(),
                    value: entry.count,
                });
            }
            if entry.count > MAX_PIECES {
                return Err(ValidationError::OutOfRange {
                    field: field(),
                    min: 0,
                    max: MAX_PIECES,
                });
            }
            snapshot.counts.insert(entry.denomination, entry.count);
        }
        Ok(snapshot)
    }

    /// Builds a snapshot from raw `(denomination, count)` pairs.
    ///
    /// ## Example
    /// ```rust
    /// use caja_core::{Denomination, InventorySnapshot};
    ///
    /// let inventory = InventorySnapshot::from_counts([(100, 1), (1, 10)]).unwrap();
    /// assert_eq!(inventory.count(Denomination::new(100).unwrap()), 1);
    /// assert_eq!(inventory.total_value(), 110);
    /// ```
    pub fn from_counts<I>(pairs: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (i64, i64)>,
    {
        let entries = pairs
            .into_iter()
            .map(|(value, count)| {
                Ok(InventoryEntry {
                    denomination: Denomination::new(value)?,
                    count,
                })
            })
            .collect::<Result<Vec<_>, ValidationError>>()?;

        InventorySnapshot::from_entries(entries)
    }

    /// Pieces of `denomination` available.
    pub fn count(&self, denomination: Denomination) -> i64 {
        self.counts.get(&denomination).copied().unwrap_or(0)
    }

    /// All entries, largest denomination first.
    pub fn entries(&self) -> Vec<InventoryEntry> {
        self.counts
            .iter()
            .rev()
            .map(|(&denomination, &count)| InventoryEntry { denomination, count })
            .collect()
    }

    /// Σ(denomination × count).
    pub fn total_value(&self) -> i64 {
        self.entries().iter().map(InventoryEntry::value).sum()
    }

    /// Returns the snapshot that results from adding `delta`.
    ///
    /// ## Errors
    /// - [`CoreError::InsufficientStock`] naming the first (largest)
    ///   denomination that would go negative
    /// - [`CoreError::StockLimit`] when a count would exceed [`MAX_PIECES`]
    ///
    /// `self` is unchanged either way.
    pub fn apply(&self, delta: &StockDelta) -> CoreResult<InventorySnapshot> {
        let mut next = self.clone();

        for (denomination, change) in delta.iter() {
            let available = self.count(denomination);
            let updated = available.saturating_add(change);

            if updated < 0 {
                return Err(CoreError::InsufficientStock {
                    denomination: denomination.value(),
                    available,
                    requested: change.saturating_neg(),
                });
            }

            if updated > MAX_PIECES {
                return Err(CoreError::StockLimit {
                    denomination: denomination.value(),
                    available,
                    added: change,
                    max: MAX_PIECES,
                });
            }

            next.counts.insert(denomination, updated);
        }

        Ok(next)
    }

    /// Compares this snapshot against `expected`, returning every mismatch.
    pub fn discrepancies(&self, expected: &StockDelta) -> Vec<Discrepancy> {
        Denomination::all()
            .filter_map(|denomination| {
                let actual = self.count(denomination);
                let expected = expected.change(denomination);
                (actual != expected).then_some(Discrepancy {
                    denomination,
                    expected,
                    actual,
                })
            })
            .collect()
    }
}

/// A denomination whose stored count disagrees with the movements on record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discrepancy {
    pub denomination: Denomination,
    /// Net deposits minus net expenses.
    pub expected: i64,
    /// Count held by the ledger.
    pub actual: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn d(value: i64) -> Denomination {
        Denomination::new(value).unwrap()
    }

    fn bills(pairs: &[(i64, i64)]) -> BillBundle {
        BillBundle::from_counts(pairs.iter().copied()).unwrap()
    }

    #[test]
    fn test_empty_has_every_denomination() {
        let snapshot = InventorySnapshot::empty();
        assert_eq!(snapshot.entries().len(), 10);
        assert!(snapshot.entries().iter().all(|entry| entry.count == 0));
        assert_eq!(snapshot.entries()[0].denomination.value(), 1000);
    }

    #[test]
    fn test_apply_credit_and_debit() {
        let snapshot = InventorySnapshot::empty()
            .apply(&StockDelta::credit(&bills(&[(50, 4), (1, 2)])))
            .unwrap();
        assert_eq!(snapshot.count(d(50)), 4);
        assert_eq!(snapshot.total_value(), 202);

        let snapshot = snapshot.apply(&StockDelta::debit(&bills(&[(50, 4)]))).unwrap();
        assert_eq!(snapshot.count(d(50)), 0);
        assert_eq!(snapshot.count(d(1)), 2);
    }

    #[test]
    fn test_apply_is_all_or_nothing() {
        let snapshot = InventorySnapshot::from_counts([(100, 1), (50, 3)]).unwrap();

        // 50 would be fine on its own; 100 is short, so nothing applies.
        let delta = StockDelta::debit(&bills(&[(100, 2), (50, 1)]));
        let err = snapshot.apply(&delta).unwrap_err();

        assert!(matches!(
            err,
            CoreError::InsufficientStock {
                denomination: 100,
                available: 1,
                requested: 2
            }
        ));
        assert_eq!(snapshot.count(d(100)), 1);
        assert_eq!(snapshot.count(d(50)), 3);
    }

    #[test]
    fn test_net_delta_of_an_edit() {
        let old = bills(&[(1000, 2)]);
        let new = bills(&[(1000, 5)]);
        let delta = StockDelta::debit(&old).then(StockDelta::credit(&new));

        assert_eq!(delta.change(d(1000)), 3);
        assert_eq!(delta.iter().count(), 1);

        let unchanged = StockDelta::debit(&old).then(StockDelta::credit(&old));
        assert!(unchanged.is_empty());
    }

    #[test]
    fn test_from_entries_rejects_negative() {
        let entries = [InventoryEntry {
            denomination: d(5),
            count: -1,
        }];
        assert!(InventorySnapshot::from_entries(entries).is_err());
    }

    #[test]
    fn test_from_entries_rejects_counts_past_limit() {
        assert!(InventorySnapshot::from_counts([(1, MAX_PIECES)]).is_ok());
        assert!(matches!(
            InventorySnapshot::from_counts([(1, MAX_PIECES + 1)]),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_apply_past_limit_is_rejected_not_wrapped() {
        let full = InventorySnapshot::from_counts([(1, MAX_PIECES)]).unwrap();

        let err = full.apply(&StockDelta::credit(&bills(&[(1, 1)]))).unwrap_err();
        assert!(matches!(
            err,
            CoreError::StockLimit {
                denomination: 1,
                available: MAX_PIECES,
                added: 1,
                ..
            }
        ));
        assert_eq!(full.count(d(1)), MAX_PIECES);

        let mut huge = StockDelta::new();
        huge.add(d(1000), i64::MAX);
        huge.add(d(1000), i64::MAX);
        assert!(matches!(full.apply(&huge), Err(CoreError::StockLimit { .. })));

        let drained = huge.negated();
        assert!(matches!(
            full.apply(&drained),
            Err(CoreError::InsufficientStock { requested: i64::MAX, .. })
        ));
    }

    #[test]
    fn test_snapshot_serializes_counts_only_through_checked_constructors() {
        let snapshot = InventorySnapshot::from_counts([(20, 2)]).unwrap();
        let json = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(json["counts"]["20"], 2);
        assert_eq!(json["counts"]["1000"], 0);
        assert!(InventorySnapshot::from_counts([(20, -2)]).is_err());
    }

    #[test]
    fn test_full_drawer_total_fits() {
        let full = InventorySnapshot::from_counts(
            crate::DENOMINATIONS.iter().map(|&value| (value, MAX_PIECES)),
        )
        .unwrap();
        assert_eq!(full.total_value(), 1888 * MAX_PIECES);
    }

    #[test]
    fn test_discrepancies() {
        let snapshot = InventorySnapshot::from_counts([(100, 2), (10, 1)]).unwrap();
        let mut expected = StockDelta::new();
        expected.add(d(100), 2);

        let found = snapshot.discrepancies(&expected);
        assert_eq!(
            found,
            vec![Discrepancy {
                denomination: d(10),
                expected: 0,
                actual: 1
            }]
        );

        expected.add(d(10), 1);
        assert!(snapshot.discrepancies(&expected).is_empty());
    }
}
