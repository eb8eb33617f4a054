//! # Denomination Set
//!
//! The fixed face values a drawer can hold.
//!
//! ```text
//! 1000  500  200  100  50  20  10  5  2  1
//!  ◄──────────── descending, no duplicates ───────────►
//! ```
//!
//! The set is process-wide static configuration: it is never read from the
//! database or the environment, and every other module iterates it through
//! [`Denomination::all`] to get the canonical descending order.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

/// Valid unit values, descending.
pub const DENOMINATIONS: [i64; 10] = [1000, 500, 200, 100, 50, 20, 10, 5, 2, 1];

/// A face value that belongs to [`DENOMINATIONS`].
///
/// Holding a `Denomination` is proof that the value was checked, so maps keyed
/// by it never contain unknown keys.
///
/// ## Example
/// ```rust
/// use caja_core::Denomination;
///
/// let fifty = Denomination::new(50).unwrap();
/// assert_eq!(fifty.value(), 50);
/// assert!(Denomination::new(3).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Denomination(i64);

impl Denomination {
    /// Checks `value` against the denomination set.
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if DENOMINATIONS.contains(&value) {
            Ok(Denomination(value))
        } else {
            Err(ValidationError::UnknownDenomination { value })
        }
    }

    /// Face value in whole currency units.
    #[inline]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Every denomination, largest first.
    pub fn all() -> impl DoubleEndedIterator<Item = Denomination> + ExactSizeIterator {
        DENOMINATIONS.iter().map(|&value| Denomination(value))
    }

    /// Value of `count` pieces of this denomination, saturating at the `i64`
    /// bounds.
    #[inline]
    pub const fn times(self, count: i64) -> i64 {
        self.0.saturating_mul(count)
    }
}

impl TryFrom<i64> for Denomination {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Denomination::new(value)
    }
}

impl From<Denomination> for i64 {
    fn from(denomination: Denomination) -> Self {
        denomination.0
    }
}

impl fmt::Display for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_is_strictly_descending() {
        assert!(DENOMINATIONS.windows(2).all(|pair| pair[0] > pair[1]));
        assert!(DENOMINATIONS.iter().all(|&value| value > 0));
    }

    #[test]
    fn test_all_follows_set_order() {
        let values: Vec<i64> = Denomination::all().map(Denomination::value).collect();
        assert_eq!(values, DENOMINATIONS.to_vec());
    }

    #[test]
    fn test_new_rejects_unknown_values() {
        assert!(Denomination::new(1000).is_ok());
        assert!(Denomination::new(1).is_ok());
        assert!(matches!(
            Denomination::new(25),
            Err(ValidationError::UnknownDenomination { value: 25 })
        ));
        assert!(Denomination::new(0).is_err());
        assert!(Denomination::new(-100).is_err());
    }

    #[test]
    fn test_times_saturates() {
        let thousand = Denomination::new(1000).unwrap();
        assert_eq!(thousand.times(3), 3000);
        assert_eq!(thousand.times(i64::MAX / 10), i64::MAX);
        assert_eq!(thousand.times(i64::MIN / 10), i64::MIN);
    }

    #[test]
    fn test_serde_checks_membership() {
        let parsed: Denomination = serde_json::from_str("200").unwrap();
        assert_eq!(parsed.value(), 200);
        assert!(serde_json::from_str::<Denomination>("300").is_err());
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "200");
    }
}
