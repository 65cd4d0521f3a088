//! # Money
//!
//! Product prices and sale totals are whole numbers of the smallest currency
//! unit. The columns behind them (`products.price`, `sales.total_amount`)
//! are SQLite INTEGERs, so `SUM(total_amount)` is exact and a `Money` read
//! back from storage compares equal to the one written.
//!
//! ```rust
//! use commerce_core::money::Money;
//!
//! let line = Money::from_cents(1_250) * 3;
//! let total: Money = [line, Money::from_cents(99)].into_iter().sum();
//! assert_eq!(total.cents(), 3_849);
//! assert_eq!(total.to_string(), "$38.49");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};
use ts_rs::TS;

/// An amount in cents. Serialized as a bare integer.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(transparent)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    #[inline]
    pub const fn cents(self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Self::ZERO
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// `None` when the sum does not fit in an `i64`.
    #[inline]
    pub const fn checked_add(self, rhs: Money) -> Option<Money> {
        match self.0.checked_add(rhs.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// `None` when the line total does not fit in an `i64`.
    #[inline]
    pub const fn checked_mul(self, quantity: i64) -> Option<Money> {
        match self.0.checked_mul(quantity) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }
}

/// `$12.50`, `-$0.75`. For logs and the seed report, not localized.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let abs = self.0.unsigned_abs();
        if self.0 < 0 {
            f.write_str("-")?;
        }
        write!(f, "${}.{:02}", abs / 100, abs % 100)
    }
}

// The operators saturate at the i64 bounds instead of panicking. Callers that
// must detect overflow use `checked_add` / `checked_mul`.

impl Add for Money {
    type Output = Money;

    #[inline]
    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, rhs: Money) {
        *self = *self + rhs;
    }
}

/// Unit price times quantity.
impl Mul<i64> for Money {
    type Output = Money;

    #[inline]
    fn mul(self, quantity: i64) -> Money {
        Money(self.0.saturating_mul(quantity))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

impl From<i64> for Money {
    fn from(cents: i64) -> Self {
        Money(cents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_pads_minor_units() {
        assert_eq!(Money::from_cents(1_205).to_string(), "$12.05");
        assert_eq!(Money::from_cents(7).to_string(), "$0.07");
        assert_eq!(Money::from_cents(-75).to_string(), "-$0.75");
        assert_eq!(Money::ZERO.to_string(), "$0.00");
    }

    #[test]
    fn test_line_totals_sum() {
        let lines = [Money::from_cents(300) * 2, Money::from_cents(1_000) * 1];
        let by_ref: Money = lines.iter().sum();
        let by_value: Money = lines.into_iter().sum();
        assert_eq!(by_ref, Money::from_cents(1_600));
        assert_eq!(by_ref, by_value);
    }

    #[test]
    fn test_empty_sum_is_zero() {
        let total: Money = Vec::<Money>::new().into_iter().sum();
        assert!(total.is_zero());
    }

    #[test]
    fn test_add_assign() {
        let mut running = Money::default();
        running += Money::from_cents(450);
        running += Money::from(50);
        assert_eq!(running.cents(), 500);
    }

    #[test]
    fn test_overflow_saturates_or_reports() {
        let huge = Money::from_cents(i64::MAX - 1);
        assert_eq!(huge + Money::from_cents(10), Money::from_cents(i64::MAX));
        assert_eq!(huge * 3, Money::from_cents(i64::MAX));
        assert_eq!(Money::from_cents(-5) * i64::MAX, Money::from_cents(i64::MIN));

        let mut running = huge;
        running += huge;
        assert_eq!(running.cents(), i64::MAX);

        assert_eq!(huge.checked_add(Money::from_cents(10)), None);
        assert_eq!(huge.checked_mul(2), None);
        assert_eq!(
            Money::from_cents(250).checked_mul(4),
            Some(Money::from_cents(1_000))
        );
        assert_eq!(
            Money::from_cents(1).checked_add(Money::from_cents(2)),
            Some(Money::from_cents(3))
        );
    }

    #[test]
    fn test_serde_is_transparent() {
        assert_eq!(serde_json::to_string(&Money::from_cents(2_500)).unwrap(), "2500");
        let back: Money = serde_json::from_str("2500").unwrap();
        assert_eq!(back, Money::from_cents(2_500));
    }
}
