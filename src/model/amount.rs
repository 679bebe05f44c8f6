//! Amount type for handling signed monetary values.
//!
//! This module provides the `Amount` type which wraps `Decimal`. Amounts are parsed from user
//! input that may carry a currency symbol or thousands separators, and they are read from and
//! written to fixture files as plain JSON numbers.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::iter::Sum;
use std::ops::{Add, Neg};
use std::str::FromStr;

/// Represents a signed amount of money: deposits are positive and withdrawals are negative.
///
/// # Examples
///
/// Parsing with a currency symbol and commas:
/// ```
/// # use bankist::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("-€1,000.50").unwrap();
/// assert_eq!(amount.to_string(), "-1000.50");
/// ```
///
/// An empty input is zero:
/// ```
/// # use bankist::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("  ").unwrap();
/// assert!(amount.is_zero());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount {
    value: Decimal,
}

impl Amount {
    pub const ZERO: Amount = Amount::new(Decimal::ZERO);

    pub const fn new(value: Decimal) -> Self {
        Self { value }
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Returns true if the amount is greater than zero.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.value.is_sign_positive()
    }

    /// Returns true if the amount is less than zero.
    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.value.is_sign_negative()
    }

    pub fn abs(&self) -> Self {
        Self::new(self.value.abs())
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
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

const SYMBOLS: [char; 3] = ['€', '$', '£'];

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Amount::default());
        }

        // "-€50", "€50", "50 €" and "50" are all accepted
        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let bare: String = unsigned
            .trim_matches(|c: char| SYMBOLS.contains(&c) || c.is_whitespace())
            .chars()
            .filter(|c| *c != ',')
            .collect();
        // only one sign is allowed, so "--100" and "-€-100" are errors
        if bare.starts_with('-') || (negative && bare.starts_with('+')) {
            return Err(AmountError(rust_decimal::Error::ErrorString(format!(
                "Invalid amount '{trimmed}'"
            ))));
        }

        let value = Decimal::from_str(&bare).map_err(AmountError)?;
        Ok(Amount::new(if negative { -value } else { value }))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.value, f)
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Self) -> Self::Output {
        Amount::new(self.value + rhs.value)
    }
}

impl Neg for Amount {
    type Output = Amount;

    fn neg(self) -> Self::Output {
        Amount::new(-self.value)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<i32> for Amount {
    fn from(value: i32) -> Self {
        Amount::new(Decimal::from(value))
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Amount::new(Decimal::from(value))
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        number::serialize(&self.value, serializer)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        number::deserialize(deserializer).map(Amount::new)
    }
}

/// Serde helpers that write a `Decimal` as a JSON number and read it back from either a number
/// or a string. Use with `#[serde(with = "number")]`.
pub(crate) mod number {
    use super::*;

    pub(crate) fn serialize<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if value.fract().is_zero() {
            if let Some(i) = value.to_i64() {
                return serializer.serialize_i64(i);
            }
        }
        serializer.serialize_f64(value.to_f64().unwrap_or_default())
    }

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(DecimalVisitor)
    }

    struct DecimalVisitor;

    impl Visitor<'_> for DecimalVisitor {
        type Value = Decimal;

        fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
            f.write_str("a number or a numeric string")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Decimal, E> {
            Ok(Decimal::from(v))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Decimal, E> {
            Ok(Decimal::from(v))
        }

        // The shortest round-trip rendering of the float is what the file author typed.
        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Decimal, E> {
            Decimal::from_str(&v.to_string()).map_err(E::custom)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Decimal, E> {
            Amount::from_str(v).map(|a| a.value()).map_err(E::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain() {
        let amount = Amount::from_str("50.00").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("50.00").unwrap());
    }

    #[test]
    fn test_parse_negative_with_symbol() {
        let amount = Amount::from_str("-$50.00").unwrap();
        assert_eq!(amount.value(), Decimal::from(-50));
        let amount = Amount::from_str("-50 €").unwrap();
        assert_eq!(amount.value(), Decimal::from(-50));
    }

    #[test]
    fn test_parse_with_commas() {
        let amount = Amount::from_str("£1,234,567.89").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("1234567.89").unwrap());
    }

    #[test]
    fn test_parse_empty_is_zero() {
        assert_eq!(Amount::from_str("").unwrap(), Amount::ZERO);
    }

    #[test]
    fn test_parse_garbage() {
        assert!(Amount::from_str("lots").is_err());
        assert!(Amount::from_str("12abc").is_err());
    }

    #[test]
    fn test_parse_double_sign() {
        assert!(Amount::from_str("--100").is_err());
        assert!(Amount::from_str("-€-100").is_err());
        assert!(Amount::from_str("-+100").is_err());
        assert!(Amount::from_str("€-100").is_err());
    }

    #[test]
    fn test_zero_is_not_positive_or_negative() {
        let zero = Amount::from_str("-0").unwrap();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());
    }

    #[test]
    fn test_sum_and_neg() {
        let total: Amount = [200, -200, 340, -300].into_iter().map(Amount::from).sum();
        assert_eq!(total, Amount::from(40));
        assert_eq!(-Amount::from(40), Amount::from(-40));
    }

    #[test]
    fn test_serialize_as_number() {
        assert_eq!(serde_json::to_string(&Amount::from(-650)).unwrap(), "-650");
        let cents = Amount::from_str("455.23").unwrap();
        assert_eq!(serde_json::to_string(&cents).unwrap(), "455.23");
    }

    #[test]
    fn test_deserialize_number_or_string() {
        let a: Amount = serde_json::from_str("455.23").unwrap();
        assert_eq!(a.value(), Decimal::from_str("455.23").unwrap());
        let b: Amount = serde_json::from_str("\"-306.5\"").unwrap();
        assert_eq!(b.value(), Decimal::from_str("-306.5").unwrap());
        let c: Amount = serde_json::from_str("3000").unwrap();
        assert_eq!(c, Amount::from(3000));
    }
}
