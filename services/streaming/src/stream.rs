//! Two-sided price stream types

use serde::{Deserialize, Serialize};
use soa::FieldRecord;
use types::numeric::Price;
use types::product::Bond;
use types::side::PricingSide;

/// One side of a price stream: price plus visible and hidden size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceStreamOrder {
    pub price: Price,
    pub visible_quantity: i64,
    pub hidden_quantity: i64,
    pub side: PricingSide,
}

impl PriceStreamOrder {
    pub fn new(price: Price, visible_quantity: i64, hidden_quantity: i64, side: PricingSide) -> Self {
        Self {
            price,
            visible_quantity,
            hidden_quantity,
            side,
        }
    }
}

/// A two-sided streaming quote for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceStream {
    pub product: Bond,
    pub bid_order: PriceStreamOrder,
    pub offer_order: PriceStreamOrder,
}

impl PriceStream {
    pub fn new(product: Bond, bid_order: PriceStreamOrder, offer_order: PriceStreamOrder) -> Self {
        Self {
            product,
            bid_order,
            offer_order,
        }
    }
}

impl FieldRecord for PriceStream {
    fn record_key(&self) -> String {
        self.product.product_id().to_string()
    }

    fn fields(&self) -> Vec<String> {
        vec![
            self.product.product_id().to_string(),
            self.bid_order.price.to_fractional(),
            self.bid_order.visible_quantity.to_string(),
            self.bid_order.hidden_quantity.to_string(),
            self.bid_order.side.to_string(),
            self.offer_order.price.to_fractional(),
            self.offer_order.visible_quantity.to_string(),
            self.offer_order.hidden_quantity.to_string(),
            self.offer_order.side.to_string(),
        ]
    }
}
