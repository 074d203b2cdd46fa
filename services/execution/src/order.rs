//! Execution order types

use serde::{Deserialize, Serialize};
use soa::FieldRecord;
use types::ids::OrderId;
use types::numeric::Price;
use types::product::Bond;
use types::side::PricingSide;

/// Order type on an exchange-bound order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    Fok,
    Ioc,
    Market,
    Limit,
    Stop,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Fok => "FOK",
            OrderType::Ioc => "IOC",
            OrderType::Market => "MARKET",
            OrderType::Limit => "LIMIT",
            OrderType::Stop => "STOP",
        }
    }
}

/// An execution order that can be placed on an exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionOrder {
    pub product: Bond,
    pub side: PricingSide,
    pub order_id: OrderId,
    pub order_type: OrderType,
    pub price: Price,
    pub visible_quantity: i64,
    pub hidden_quantity: i64,
    pub parent_order_id: Option<OrderId>,
    pub is_child_order: bool,
}

impl ExecutionOrder {
    /// A parentless market order showing its full quantity.
    pub fn market(
        product: Bond,
        side: PricingSide,
        order_id: OrderId,
        price: Price,
        quantity: i64,
    ) -> Self {
        Self {
            product,
            side,
            order_id,
            order_type: OrderType::Market,
            price,
            visible_quantity: quantity,
            hidden_quantity: 0,
            parent_order_id: None,
            is_child_order: false,
        }
    }
}

impl FieldRecord for ExecutionOrder {
    fn record_key(&self) -> String {
        self.product.product_id().to_string()
    }

    fn fields(&self) -> Vec<String> {
        vec![
            self.product.product_id().to_string(),
            self.side.to_string(),
            self.order_id.to_string(),
            self.order_type.as_str().to_string(),
            self.price.to_fractional(),
            self.visible_quantity.to_string(),
            self.hidden_quantity.to_string(),
            self.parent_order_id
                .as_ref()
                .map(OrderId::to_string)
                .unwrap_or_default(),
            self.is_child_order.to_string(),
        ]
    }
}
