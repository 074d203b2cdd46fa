//! Decimal price type with the Treasury fractional codec
//!
//! Uses rust_decimal for exact arithmetic: every quoted Treasury price is a
//! multiple of 1/256, and 1/32 and 1/256 are both exact in decimal, so the
//! fractional round-trip is lossless by construction.
//!
//! Fractional form is `AAA-BBC`: whole points, two zero-padded digits of
//! 32nds, and one digit of eighths-of-a-32nd where `+` stands for 4.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Div, Sub};
use thiserror::Error;

/// Errors from parsing or formatting fractional Treasury prices.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceParseError {
    #[error("missing '-' separator in fractional price: {0}")]
    MissingSeparator(String),

    #[error("invalid whole points: {0}")]
    InvalidWhole(String),

    #[error("32nds out of range (00..31): {0}")]
    InvalidThirtySeconds(String),

    #[error("eighths digit must be 0..7 or '+': {0}")]
    InvalidEighths(String),
}

/// Price with fixed-point decimal representation.
///
/// Non-negative (a bid/offer spread is itself a price-typed quantity).
/// Serialized as string to prevent JSON number precision loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(Decimal);

impl Price {
    pub const ZERO: Price = Price(Decimal::ZERO);

    /// Create a new Price from a Decimal.
    ///
    /// # Panics
    /// Panics if the price is negative.
    pub fn new(value: Decimal) -> Self {
        assert!(value >= Decimal::ZERO, "Price must be non-negative");
        Self(value)
    }

    /// Try to create a Price, returning None if negative.
    pub fn try_new(value: Decimal) -> Option<Self> {
        if value >= Decimal::ZERO {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Create from integer points (for testing/convenience).
    pub fn from_u64(value: u64) -> Self {
        Self(Decimal::from(value))
    }

    /// Get the inner decimal value.
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Midpoint of two prices.
    pub fn midpoint(bid: Price, offer: Price) -> Price {
        Price((bid.0 + offer.0) / Decimal::from(2))
    }

    /// Parse the fractional `AAA-BBC` form.
    ///
    /// `BB` is 32nds (zero-padded, 00..31), `C` is eighths-of-a-32nd with
    /// `+` meaning 4, so one `C` unit is 1/256 of a point.
    pub fn from_fractional(text: &str) -> Result<Self, PriceParseError> {
        let (whole_part, frac_part) = text
            .split_once('-')
            .ok_or_else(|| PriceParseError::MissingSeparator(text.to_string()))?;

        let whole: u32 = whole_part
            .parse()
            .map_err(|_| PriceParseError::InvalidWhole(text.to_string()))?;

        let mut chars = frac_part.chars();
        let (d1, d2, d3) = match (chars.next(), chars.next(), chars.next(), chars.next()) {
            (Some(a), Some(b), Some(c), None) => (a, b, c),
            _ => return Err(PriceParseError::InvalidThirtySeconds(text.to_string())),
        };

        let thirty_seconds = d1
            .to_digit(10)
            .zip(d2.to_digit(10))
            .map(|(tens, ones)| tens * 10 + ones)
            .filter(|n| *n < 32)
            .ok_or_else(|| PriceParseError::InvalidThirtySeconds(text.to_string()))?;

        let eighths = match d3 {
            '+' => 4,
            c => c
                .to_digit(10)
                .filter(|n| *n < 8)
                .ok_or_else(|| PriceParseError::InvalidEighths(text.to_string()))?,
        };

        let value = Decimal::from(whole)
            + Decimal::from(thirty_seconds) / Decimal::from(32)
            + Decimal::from(eighths) / Decimal::from(256);
        Ok(Self(value))
    }

    /// Format as the fractional `AAA-BBC` form.
    ///
    /// Values that are not multiples of 1/256 are truncated to the next
    /// lower 1/256, matching the quoting convention.
    pub fn to_fractional(&self) -> String {
        let whole = self.0.trunc();
        let units256 = ((self.0 - whole) * Decimal::from(256))
            .trunc()
            .to_u32()
            .unwrap_or(0);
        let thirty_seconds = units256 / 8;
        let eighths = units256 % 8;

        let last = if eighths == 4 {
            "+".to_string()
        } else {
            eighths.to_string()
        };
        format!("{}-{:02}{}", whole, thirty_seconds, last)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Price {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        assert!(self.0 >= rhs.0, "Price subtraction would result in negative");
        Self(self.0 - rhs.0)
    }
}

impl Div<Decimal> for Price {
    type Output = Price;

    fn div(self, rhs: Decimal) -> Self::Output {
        assert!(rhs != Decimal::ZERO, "Division by zero");
        Price(self.0 / rhs)
    }
}

// Custom serialization to preserve precision
impl Serialize for Price {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let decimal = Decimal::from_str(&s).map_err(serde::de::Error::custom)?;
        Self::try_new(decimal).ok_or_else(|| serde::de::Error::custom("Price must be non-negative"))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
