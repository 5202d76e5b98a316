//! Type-safe price representation in integer minor units.
//!
//! All monetary amounts move through the system as paise (the smallest
//! currency unit). Conversion to a decimal major unit happens only at the
//! presentation boundary, via [`Price::to_decimal`]. Arithmetic is
//! saturating: a cart of real products never approaches `i64::MAX`, and
//! saturating beats wrapping for money.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A monetary amount in minor units (paise).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Create a price from an amount in minor units.
    #[must_use]
    pub const fn from_minor_units(paise: i64) -> Self {
        Self(paise)
    }

    /// The amount in minor units.
    #[must_use]
    pub const fn minor_units(self) -> i64 {
        self.0
    }

    /// Multiply by a quantity, saturating on overflow.
    #[must_use]
    pub const fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(quantity as i64))
    }

    /// The amount as a decimal in major units (rupees), for display only.
    #[must_use]
    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, 2)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_times_quantity() {
        let unit = Price::from_minor_units(299_999);
        assert_eq!(unit.times(1).minor_units(), 299_999);
        assert_eq!(unit.times(3).minor_units(), 899_997);
    }

    #[test]
    fn test_sum() {
        let total: Price = [
            Price::from_minor_units(100),
            Price::from_minor_units(250),
            Price::from_minor_units(50),
        ]
        .into_iter()
        .sum();
        assert_eq!(total, Price::from_minor_units(400));
    }

    #[test]
    fn test_saturating_multiply() {
        let huge = Price::from_minor_units(i64::MAX);
        assert_eq!(huge.times(2).minor_units(), i64::MAX);
    }

    #[test]
    fn test_to_decimal_major_units() {
        let price = Price::from_minor_units(299_999);
        assert_eq!(price.to_decimal().to_string(), "2999.99");
    }
}
