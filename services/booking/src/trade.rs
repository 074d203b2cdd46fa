//! Trade types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use types::ids::TradeId;
use types::numeric::Price;
use types::product::Bond;
use types::side::Side;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown trading book: {0}")]
pub struct ParseTradeBookError(pub String);

/// Sub-account a trade is recorded under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeBook {
    Trsy1,
    Trsy2,
    Trsy3,
}

impl TradeBook {
    /// All books, in round-robin assignment order.
    pub const ALL: [TradeBook; 3] = [TradeBook::Trsy1, TradeBook::Trsy2, TradeBook::Trsy3];

    pub fn as_str(&self) -> &'static str {
        match self {
            TradeBook::Trsy1 => "TRSY1",
            TradeBook::Trsy2 => "TRSY2",
            TradeBook::Trsy3 => "TRSY3",
        }
    }
}

impl FromStr for TradeBook {
    type Err = ParseTradeBookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TRSY1" => Ok(TradeBook::Trsy1),
            "TRSY2" => Ok(TradeBook::Trsy2),
            "TRSY3" => Ok(TradeBook::Trsy3),
            other => Err(ParseTradeBookError(other.to_string())),
        }
    }
}

impl fmt::Display for TradeBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A booked trade in a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub product: Bond,
    pub trade_id: TradeId,
    pub price: Price,
    pub book: TradeBook,
    pub quantity: i64,
    pub side: Side,
}

impl Trade {
    pub fn new(
        product: Bond,
        trade_id: TradeId,
        price: Price,
        book: TradeBook,
        quantity: i64,
        side: Side,
    ) -> Self {
        Self {
            product,
            trade_id,
            price,
            book,
            quantity,
            side,
        }
    }

    /// Position delta this trade contributes: +quantity for Buy,
    /// -quantity for Sell.
    pub fn signed_quantity(&self) -> i64 {
        self.side.sign() * self.quantity
    }
}
