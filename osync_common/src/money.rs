use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign},
};

use serde::{de::Error as DeError, Deserialize, Deserializer, Serialize, Serializer};
use sqlx::Type;
use thiserror::Error;

use crate::op;

//--------------------------------------       Money        ----------------------------------------------------------
/// A currency amount held as an integer number of cents.
///
/// SellerCloud (and the shipping-cost tables) speak decimal dollars, so `Money` serializes as a decimal dollar
/// amount on the wire, while all arithmetic happens in cents. Rounding (half-up) is applied exactly once, at the
/// dollars-to-cents boundary.
#[derive(Debug, Clone, Copy, Default, Type, Ord, PartialOrd)]
#[sqlx(transparent)]
pub struct Money(i64);

op!(binary Money, Add, add);
op!(binary Money, Sub, sub);
op!(inplace Money, AddAssign, add_assign);
op!(inplace Money, SubAssign, sub_assign);
op!(unary Money, Neg, neg);

impl Mul<i64> for Money {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self::Output {
        Self::from(self.value() * rhs)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented as a currency amount: {0}")]
pub struct MoneyConversionError(String);

impl From<i64> for Money {
    fn from(cents: i64) -> Self {
        Self(cents)
    }
}

impl PartialEq for Money {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Money {}

impl TryFrom<f64> for Money {
    type Error = MoneyConversionError;

    fn try_from(dollars: f64) -> Result<Self, Self::Error> {
        if !dollars.is_finite() || dollars.abs() > (i64::MAX / 100) as f64 {
            Err(MoneyConversionError(format!("{dollars} is not a representable dollar amount")))
        } else {
            Ok(Self::from_dollars(dollars))
        }
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let cents = self.0.abs();
        write!(f, "{sign}${}.{:02}", cents / 100, cents % 100)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_dollars())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let dollars = f64::deserialize(deserializer)?;
        Money::try_from(dollars).map_err(DeError::custom)
    }
}

impl Money {
    pub fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Converts a decimal dollar amount to cents, rounding half-up.
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_dollars(dollars: f64) -> Self {
        Self((dollars * 100.0).round() as i64)
    }

    /// The amount in cents.
    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn to_dollars(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn dollars_round_half_up() {
        assert_eq!(Money::from_dollars(1.5), Money::from_cents(150));
        assert_eq!(Money::from_dollars(0.005), Money::from_cents(1));
        assert_eq!(Money::from_dollars(2.994), Money::from_cents(299));
        assert_eq!(Money::from_dollars(2.995), Money::from_cents(300));
    }

    #[test]
    fn arithmetic_in_cents() {
        let unit = Money::from_dollars(1.5);
        assert_eq!(unit * 2, Money::from_cents(300));
        assert_eq!([unit, unit, Money::from_cents(25)].into_iter().sum::<Money>(), Money::from_cents(325));
    }

    #[test]
    fn display_as_dollars() {
        assert_eq!(Money::from_cents(300).to_string(), "$3.00");
        assert_eq!(Money::from_cents(7).to_string(), "$0.07");
        assert_eq!(Money::from_cents(-150).to_string(), "-$1.50");
    }

    #[test]
    fn wire_format_is_decimal_dollars() {
        let fee = Money::from_cents(1234);
        assert_eq!(serde_json::to_string(&fee).unwrap(), "12.34");
        let parsed: Money = serde_json::from_str("1.5").unwrap();
        assert_eq!(parsed, Money::from_cents(150));
    }
}
