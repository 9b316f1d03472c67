//! Amount type for investment figures expressed in millions of USD.
//!
//! The source file writes amounts as plain decimals, but values exported from spreadsheets
//! sometimes carry a dollar sign or thousands separators. `Amount` accepts all of these and keeps
//! the exact decimal value so that grouped sums add up to the grand total without rounding drift.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// An investment amount in millions of USD.
///
/// # Examples
///
/// ```
/// # use ifc_dashboard::model::Amount;
/// # use std::str::FromStr;
/// let a = Amount::from_str("$1,250.5").unwrap();
/// let b = Amount::from_str("1250.50").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.to_string(), "1,250.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Lossy conversion used when handing values to the charting layer.
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or_default()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Adds two amounts, returning `None` when the sum is too large to represent.
    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    /// Sums `amounts`, returning `None` when the sum is too large to represent.
    pub fn checked_sum(amounts: impl IntoIterator<Item = Amount>) -> Option<Amount> {
        amounts
            .into_iter()
            .try_fold(Amount::ZERO, |sum, amount| sum.checked_add(amount))
    }
}

/// An error that can occur when parsing strings into `Amount` values.
pub struct AmountError(rust_decimal::Error);

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        // "-$50.00", "$50.00", "-50.00" and "50.00" are all accepted
        let without_dollar = if let Some(after_minus) = trimmed.strip_prefix('-') {
            match after_minus.strip_prefix('$') {
                Some(after_dollar) => format!("-{after_dollar}"),
                None => trimmed.to_string(),
            }
        } else if let Some(after_dollar) = trimmed.strip_prefix('$') {
            after_dollar.to_string()
        } else {
            trimmed.to_string()
        };

        let without_commas = without_dollar.replace(',', "");

        // Scientific notation shows up in exports of very small or very large figures.
        let value = match Decimal::from_str(&without_commas) {
            Ok(value) => value,
            Err(_) => Decimal::from_scientific(&without_commas).map_err(AmountError)?,
        };
        Ok(Amount(value))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let num = self.0.abs().to_f64().unwrap_or_default();
        write!(f, "{sign}{}", format_num::format_num!(",.2", num))
    }
}

/// Amounts are handed to plotly as plain JSON numbers.
impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.to_f64())
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<u32> for Amount {
    fn from(value: u32) -> Self {
        Amount::new(Decimal::from(value))
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain() {
        let amount = Amount::from_str("50.25").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("50.25").unwrap());
    }

    #[test]
    fn test_parse_with_dollar_sign_and_commas() {
        let amount = Amount::from_str("$1,234,567.89").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("1234567.89").unwrap());
    }

    #[test]
    fn test_parse_negative_with_dollar_sign() {
        let amount = Amount::from_str("-$50.00").unwrap();
        assert!(amount.is_negative());
        assert_eq!(amount.value(), Decimal::from_str("-50.00").unwrap());
    }

    #[test]
    fn test_parse_scientific() {
        let amount = Amount::from_str("1.5e2").unwrap();
        assert_eq!(amount.value(), Decimal::from(150));
    }

    #[test]
    fn test_parse_garbage() {
        assert!(Amount::from_str("Manufacturing").is_err());
        assert!(Amount::from_str("").is_err());
    }

    #[test]
    fn test_display_uses_thousands_separator() {
        let amount = Amount::from_str("60000").unwrap();
        assert_eq!(amount.to_string(), "60,000.00");
        let negative = Amount::from_str("-5.5").unwrap();
        assert_eq!(negative.to_string(), "-5.50");
    }

    #[test]
    fn test_sum_is_exact() {
        let parts = ["0.1", "0.2", "0.3"]
            .iter()
            .map(|s| Amount::from_str(s).unwrap());
        let total = Amount::checked_sum(parts).unwrap();
        assert_eq!(total.value(), Decimal::from_str("0.6").unwrap());
    }

    #[test]
    fn test_sum_past_the_largest_decimal() {
        let big = Amount::from_str("50000000000000000000000000000").unwrap();
        assert!(big.checked_add(big).is_none());
        assert!(Amount::checked_sum([big, big]).is_none());
        assert_eq!(big.checked_add(Amount::ZERO), Some(big));
    }

    #[test]
    fn test_serializes_as_number() {
        let amount = Amount::from_str("12.5").unwrap();
        assert_eq!(serde_json::to_string(&amount).unwrap(), "12.5");
    }
}
