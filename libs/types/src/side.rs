//! Trade and pricing side enums

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown side: {0}")]
pub struct ParseSideError(pub String);

/// Direction of a trade or inquiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Signed multiplier applied to quantities: +1 for Buy, -1 for Sell.
    pub fn sign(&self) -> i64 {
        match self {
            Side::Buy => 1,
            Side::Sell => -1,
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

impl FromStr for Side {
    type Err = ParseSideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BUY" => Ok(Side::Buy),
            "SELL" => Ok(Side::Sell),
            other => Err(ParseSideError(other.to_string())),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Side of a quote or order-book entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PricingSide {
    Bid,
    Offer,
}

impl PricingSide {
    pub fn opposite(&self) -> Self {
        match self {
            PricingSide::Bid => PricingSide::Offer,
            PricingSide::Offer => PricingSide::Bid,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PricingSide::Bid => "BID",
            PricingSide::Offer => "OFFER",
        }
    }
}

impl FromStr for PricingSide {
    type Err = ParseSideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BID" => Ok(PricingSide::Bid),
            "OFFER" => Ok(PricingSide::Offer),
            other => Err(ParseSideError(other.to_string())),
        }
    }
}

impl fmt::Display for PricingSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
