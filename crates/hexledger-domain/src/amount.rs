//! Non-negative monetary quantities backed by a decimal.

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::{
    de::{self, Deserializer, Visitor},
    Deserialize, Serialize, Serializer,
};

/// Largest accepted amount, in whole units.
///
/// Summing up to 79 billion of these still fits in a `Decimal`, so totals
/// over any ledger are exact additions and never overflow.
pub const MAX_WHOLE_UNITS: u64 = 1_000_000_000_000_000;

/// A finite, non-negative decimal amount no larger than [`MAX_WHOLE_UNITS`].
///
/// The scale entered by the user is preserved, so `"1200.00"` is written back
/// as `"1200.00"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(AmountError::Negative(value.to_string()));
        }
        if value > Self::max_value() {
            return Err(AmountError::TooLarge(value.to_string()));
        }
        Ok(Self(value))
    }

    pub fn max_value() -> Decimal {
        Decimal::from(MAX_WHOLE_UNITS)
    }

    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    pub fn value(self) -> Decimal {
        self.0
    }

    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(AmountError::Empty);
        }
        let decimal =
            Decimal::from_str(trimmed).map_err(|_| AmountError::Invalid(trimmed.to_string()))?;
        Amount::new(decimal)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(AmountVisitor)
    }
}

struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative decimal amount")
    }

    fn visit_str<E>(self, value: &str) -> Result<Amount, E>
    where
        E: de::Error,
    {
        value.parse().map_err(E::custom)
    }

    fn visit_u64<E>(self, value: u64) -> Result<Amount, E>
    where
        E: de::Error,
    {
        Amount::new(Decimal::from(value)).map_err(E::custom)
    }

    fn visit_i64<E>(self, value: i64) -> Result<Amount, E>
    where
        E: de::Error,
    {
        Amount::new(Decimal::from(value)).map_err(E::custom)
    }

    fn visit_f64<E>(self, value: f64) -> Result<Amount, E>
    where
        E: de::Error,
    {
        let decimal = Decimal::try_from(value)
            .map_err(|_| E::custom(AmountError::Invalid(value.to_string())))?;
        Amount::new(decimal).map_err(E::custom)
    }
}

/// Reasons an amount string is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    Empty,
    Invalid(String),
    Negative(String),
    TooLarge(String),
}

impl fmt::Display for AmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmountError::Empty => f.write_str("amount is empty"),
            AmountError::Invalid(raw) => write!(f, "`{raw}` is not a decimal number"),
            AmountError::Negative(raw) => write!(f, "amount `{raw}` is negative"),
            AmountError::TooLarge(raw) => {
                write!(f, "amount `{raw}` exceeds {}", MAX_WHOLE_UNITS)
            }
        }
    }
}

impl std::error::Error for AmountError {}
