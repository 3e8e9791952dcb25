use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound of a `decimal(10, 2)` column, in cents.
pub const MAX_PRICE_CENTS: i64 = 9_999_999_999;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PriceError {
    #[error("must be a finite number")]
    NotFinite,

    #[error("must not be negative")]
    Negative,

    #[error("must have at most 2 decimal places")]
    TooManyDecimals,

    #[error("must not exceed 99999999.99")]
    OutOfRange,
}

/// Non-negative fixed-point amount with two decimal places.
///
/// Stored as whole cents; crosses the JSON boundary as a plain number
/// (`25.5`), matching what clients send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Price(i64);

impl Price {
    pub const ZERO: Price = Price(0);

    pub fn from_cents(cents: i64) -> Result<Self, PriceError> {
        if cents < 0 {
            return Err(PriceError::Negative);
        }
        if cents > MAX_PRICE_CENTS {
            return Err(PriceError::OutOfRange);
        }
        Ok(Self(cents))
    }

    pub fn from_decimal(value: f64) -> Result<Self, PriceError> {
        if !value.is_finite() {
            return Err(PriceError::NotFinite);
        }
        if value < 0.0 {
            return Err(PriceError::Negative);
        }

        // `value` must be exactly the double nearest to some whole number of
        // cents; anything else carries digits past the second decimal.
        let cents = (value * 100.0).round();
        if cents / 100.0 != value {
            return Err(PriceError::TooManyDecimals);
        }
        if cents > MAX_PRICE_CENTS as f64 {
            return Err(PriceError::OutOfRange);
        }

        Self::from_cents(cents as i64)
    }

    pub fn cents(&self) -> i64 {
        self.0
    }

    pub fn to_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl TryFrom<f64> for Price {
    type Error = PriceError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::from_decimal(value)
    }
}

impl From<Price> for f64 {
    fn from(value: Price) -> Self {
        value.to_f64()
    }
}

impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}
