//! Monetary amounts for display.
//!
//! Batch files carry amounts as whole cents. [`Amount`] renders those cents
//! as a decimal with exactly two places using `rust_decimal`.

use crate::error::{GiroError, Result};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt;

/// A currency amount with exactly 2 decimal places.
///
/// # Examples
///
/// ```
/// use giro_batch::Amount;
///
/// let amount = Amount::from_cents(6900).unwrap();
/// assert_eq!(amount.to_string(), "69.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Amount(Decimal);

impl Amount {
    /// The number of decimal places to maintain.
    pub const SCALE: u32 = 2;

    /// Creates an amount from a count of cents.
    pub fn from_cents(cents: u64) -> Result<Self> {
        let cents = i64::try_from(cents).map_err(|_| GiroError::Overflow("amount"))?;
        Ok(Amount(Decimal::new(cents, Self::SCALE)))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents_has_two_places() {
        assert_eq!(Amount::from_cents(1).unwrap().to_string(), "0.01");
        assert_eq!(Amount::from_cents(6900).unwrap().to_string(), "69.00");
        assert_eq!(Amount::from_cents(0).unwrap().to_string(), "0.00");
    }

    #[test]
    fn test_largest_field_value() {
        let amount = Amount::from_cents(99_999_999_999).unwrap();
        assert_eq!(amount.to_string(), "999999999.99");
    }

    #[test]
    fn test_cents_beyond_i64_overflow() {
        assert!(matches!(
            Amount::from_cents(u64::MAX),
            Err(GiroError::Overflow(_))
        ));
    }
}
