//! # Bill Bundles
//!
//! A [`BillBundle`] records how many pieces of each denomination were
//! physically handled in one movement.
//!
//! ## Invariants
//! - Every key is a recognized [`Denomination`]
//! - Every stored count is strictly positive (zero counts are accepted on
//!   input and dropped, so `{50: 0}` and `{}` are the same bundle)
//!
//! ## Usage
//! ```rust
//! use caja_core::BillBundle;
//!
//! let bills = BillBundle::from_counts([(1000, 2), (50, 1), (5, 0)]).unwrap();
//! assert_eq!(bills.total_value(), 2050);
//! assert_eq!(bills.len(), 2);
//!
//! // Unknown denominations and negative counts never get this far
//! assert!(BillBundle::from_counts([(30, 1)]).is_err());
//! assert!(BillBundle::from_counts([(100, -1)]).is_err());
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::denomination::Denomination;
use crate::error::ValidationError;
use crate::validation::{validate_count, ValidationResult};

/// Denomination → count used by one movement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<i64, i64>", into = "BTreeMap<i64, i64>")]
pub struct BillBundle {
    counts: BTreeMap<Denomination, i64>,
}

impl BillBundle {
    /// An empty bundle.
    pub fn new() -> Self {
        BillBundle::default()
    }

    /// Builds a bundle from raw `(denomination, count)` pairs.
    ///
    /// ## Errors
    /// - [`ValidationError::UnknownDenomination`] for a key outside the set
    /// - [`ValidationError::Negative`] for a count below zero
    /// - [`ValidationError::OutOfRange`] for a count above [`crate::MAX_PIECES`]
    /// - [`ValidationError::Duplicate`] when a denomination is listed twice
    pub fn from_counts<I>(pairs: I) -> ValidationResult<Self>
    where
        I: IntoIterator<Item = (i64, i64)>,
    {
        let mut counts = BTreeMap::new();
        let mut seen = Vec::new();

        for (value, count) in pairs {
            let denomination = Denomination::new(value)?;
            validate_count(value, count)?;

            if seen.contains(&denomination) {
                return Err(ValidationError::Duplicate {
                    field: "denomination".to_string(),
                    value: value.to_string(),
                });
            }
            seen.push(denomination);

            if count > 0 {
                counts.insert(denomination, count);
            }
        }

        Ok(BillBundle { counts })
    }

    /// Wraps counts that are already known to be positive.
    pub(crate) fn from_positive(counts: BTreeMap<Denomination, i64>) -> Self {
        debug_assert!(counts.values().all(|&count| count > 0));
        BillBundle { counts }
    }

    /// Pieces of `denomination` in the bundle (0 when absent).
    pub fn count(&self, denomination: Denomination) -> i64 {
        self.counts.get(&denomination).copied().unwrap_or(0)
    }

    /// Non-zero entries, largest denomination first.
    pub fn iter(&self) -> impl Iterator<Item = (Denomination, i64)> + '_ {
        self.counts.iter().rev().map(|(&denomination, &count)| (denomination, count))
    }

    /// Σ(denomination × count).
    pub fn total_value(&self) -> i64 {
        self.iter()
            .map(|(denomination, count)| denomination.times(count))
            .sum()
    }

    /// Number of distinct denominations used.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// True when no pieces are used.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl TryFrom<BTreeMap<i64, i64>> for BillBundle {
    type Error = ValidationError;

    fn try_from(raw: BTreeMap<i64, i64>) -> Result<Self, Self::Error> {
        BillBundle::from_counts(raw)
    }
}

impl From<BillBundle> for BTreeMap<i64, i64> {
    fn from(bundle: BillBundle) -> Self {
        bundle
            .counts
            .into_iter()
            .map(|(denomination, count)| (denomination.value(), count))
            .collect()
    }
}

impl fmt::Display for BillBundle {
    /// Formats as `1000x2 50x1`, or `-` for an empty bundle.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "-");
        }

        let mut first = true;
        for (denomination, count) in self.iter() {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{}x{}", denomination, count)?;
            first = false;
        }

        Ok(())
    }
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

    #[test]
    fn test_zero_counts_are_dropped() {
        let with_zero = BillBundle::from_counts([(50, 4), (20, 0)]).unwrap();
        let without = BillBundle::from_counts([(50, 4)]).unwrap();

        assert_eq!(with_zero, without);
        assert_eq!(with_zero.count(d(20)), 0);
        assert_eq!(with_zero.count(d(50)), 4);
    }

    #[test]
    fn test_rejects_invalid_input() {
        assert!(matches!(
            BillBundle::from_counts([(7, 1)]),
            Err(ValidationError::UnknownDenomination { value: 7 })
        ));
        assert!(matches!(
            BillBundle::from_counts([(10, -2)]),
            Err(ValidationError::Negative { value: -2, .. })
        ));
        assert!(matches!(
            BillBundle::from_counts([(10, 1), (10, 2)]),
            Err(ValidationError::Duplicate { .. })
        ));
    }

    #[test]
    fn test_huge_counts_rejected_before_any_math() {
        assert!(matches!(
            BillBundle::from_counts([(1000, i64::MAX / 10)]),
            Err(ValidationError::OutOfRange { .. })
        ));

        let largest = BillBundle::from_counts([(1000, crate::MAX_PIECES)]).unwrap();
        assert_eq!(largest.total_value(), 1000 * crate::MAX_PIECES);
    }

    #[test]
    fn test_totals() {
        let bills = BillBundle::from_counts([(500, 1), (100, 1), (20, 2)]).unwrap();
        assert_eq!(bills.total_value(), 640);
        assert_eq!(BillBundle::new().total_value(), 0);
    }

    #[test]
    fn test_iter_is_descending() {
        let bills = BillBundle::from_counts([(1, 3), (1000, 1), (50, 2)]).unwrap();
        let order: Vec<i64> = bills.iter().map(|(d, _)| d.value()).collect();
        assert_eq!(order, vec![1000, 50, 1]);
    }

    #[test]
    fn test_display() {
        let bills = BillBundle::from_counts([(1000, 2), (5, 1)]).unwrap();
        assert_eq!(bills.to_string(), "1000x2 5x1");
        assert_eq!(BillBundle::new().to_string(), "-");
    }

    #[test]
    fn test_json_shape() {
        let bills: BillBundle = serde_json::from_str(r#"{"100": 3, "20": 0}"#).unwrap();
        assert_eq!(bills.count(d(100)), 3);
        assert_eq!(serde_json::to_string(&bills).unwrap(), r#"{"100":3}"#);

        assert!(serde_json::from_str::<BillBundle>(r#"{"3": 1}"#).is_err());
        assert!(serde_json::from_str::<BillBundle>(r#"{"100": -1}"#).is_err());
    }
}
