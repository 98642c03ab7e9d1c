//! Coupon discount percentage.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`DiscountPercentage`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DiscountError {
    /// Below zero or above one hundred.
    #[error("discount percentage must be between 0 and 100 (got {0})")]
    OutOfRange(Decimal),
    /// Not a number.
    #[error("discount percentage is not a number: {0}")]
    NotANumber(String),
}

/// A coupon discount expressed in percent, always within `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct DiscountPercentage(Decimal);

impl DiscountPercentage {
    /// Lowest allowed value.
    pub const MIN: Decimal = Decimal::ZERO;
    /// Highest allowed value.
    pub const MAX: Decimal = Decimal::ONE_HUNDRED;

    /// Validate a raw percentage.
    ///
    /// # Errors
    ///
    /// Returns `DiscountError::OutOfRange` outside `[0, 100]`.
    pub fn new(value: Decimal) -> Result<Self, DiscountError> {
        if value < Self::MIN || value > Self::MAX {
            return Err(DiscountError::OutOfRange(value));
        }
        Ok(Self(value.normalize()))
    }

    /// The percentage as a decimal, e.g. `15` for fifteen percent.
    #[must_use]
    pub const fn value(self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for DiscountPercentage {
    type Error = DiscountError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DiscountPercentage> for Decimal {
    fn from(value: DiscountPercentage) -> Self {
        value.0
    }
}

impl std::str::FromStr for DiscountPercentage {
    type Err = DiscountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<Decimal>()
            .map_err(|_| DiscountError::NotANumber(s.to_owned()))?;
        Self::new(value)
    }
}

impl fmt::Display for DiscountPercentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_are_inclusive() {
        assert!(DiscountPercentage::new(Decimal::ZERO).is_ok());
        assert!(DiscountPercentage::new(Decimal::ONE_HUNDRED).is_ok());
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(matches!(
            DiscountPercentage::new(Decimal::new(-1, 0)),
            Err(DiscountError::OutOfRange(_))
        ));
        assert!(matches!(
            DiscountPercentage::new(Decimal::new(10001, 2)),
            Err(DiscountError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_normalizes_trailing_zeros() {
        // NUMERIC(5,2) hands back 15.00 for a stored 15
        let discount = DiscountPercentage::new(Decimal::new(1500, 2)).unwrap();
        assert_eq!(discount.value().to_string(), "15");
        assert_eq!(discount.to_string(), "15%");
    }

    #[test]
    fn test_from_str() {
        let discount: DiscountPercentage = "12.5".parse().unwrap();
        assert_eq!(discount.value(), Decimal::new(125, 1));
        assert!(matches!(
            "lots".parse::<DiscountPercentage>(),
            Err(DiscountError::NotANumber(_))
        ));
    }
}
