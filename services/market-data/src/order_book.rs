//! Order book with a bid and an offer stack
//!
//! Stacks hold one `Order` per source row. Aggregation collapses entries at
//! the same price per side by summing quantities; it is pure and returns a
//! new book, leaving the source untouched.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::numeric::Price;
use types::product::Bond;
use types::side::PricingSide;

/// A market data order with price, quantity, and side. Immutable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub price: Price,
    pub quantity: i64,
    pub side: PricingSide,
}

impl Order {
    pub fn new(price: Price, quantity: i64, side: PricingSide) -> Self {
        Self {
            price,
            quantity,
            side,
        }
    }
}

/// The top of book: best bid and best offer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BidOffer {
    pub bid_order: Order,
    pub offer_order: Order,
}

impl BidOffer {
    /// Offer price minus bid price.
    pub fn spread(&self) -> Decimal {
        self.offer_order.price.as_decimal() - self.bid_order.price.as_decimal()
    }
}

/// Order book for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBook {
    pub product: Bond,
    pub bid_stack: Vec<Order>,
    pub offer_stack: Vec<Order>,
}

impl OrderBook {
    pub fn new(product: Bond, bid_stack: Vec<Order>, offer_stack: Vec<Order>) -> Self {
        Self {
            product,
            bid_stack,
            offer_stack,
        }
    }

    /// Scan both stacks for the best bid (max price) and best offer
    /// (min price). Returns None while either side is empty.
    pub fn best_bid_offer(&self) -> Option<BidOffer> {
        let bid_order = self
            .bid_stack
            .iter()
            .max_by_key(|order| order.price)
            .copied()?;
        let offer_order = self
            .offer_stack
            .iter()
            .min_by_key(|order| order.price)
            .copied()?;
        Some(BidOffer {
            bid_order,
            offer_order,
        })
    }

    /// Collapse duplicate-price entries per side by summing quantities.
    ///
    /// Pure: returns a new book by value. At most one entry per
    /// (side, price) in the result; entry order is unspecified.
    pub fn aggregate(&self) -> OrderBook {
        OrderBook {
            product: self.product.clone(),
            bid_stack: aggregate_side(&self.bid_stack, PricingSide::Bid),
            offer_stack: aggregate_side(&self.offer_stack, PricingSide::Offer),
        }
    }
}

fn aggregate_side(stack: &[Order], side: PricingSide) -> Vec<Order> {
    let mut by_price: HashMap<Decimal, i64> = HashMap::new();
    for order in stack {
        *by_price.entry(order.price.as_decimal()).or_insert(0) += order.quantity;
    }
    by_price
        .into_iter()
        .map(|(price, quantity)| Order::new(Price::new(price), quantity, side))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::product::bond_for;

    fn order(price: &str, quantity: i64, side: PricingSide) -> Order {
        Order::new(Price::from_fractional(price).unwrap(), quantity, side)
    }

    fn sorted_levels(stack: &[Order]) -> Vec<(Decimal, i64)> {
        let mut levels: Vec<(Decimal, i64)> = stack
            .iter()
            .map(|o| (o.price.as_decimal(), o.quantity))
            .collect();
        levels.sort();
        levels
    }

    #[test]
    fn test_best_bid_offer() {
        let book = OrderBook::new(
            bond_for("9128283H1"),
            vec![
                order("99-310", 10_000_000, PricingSide::Bid),
                order("99-31+", 20_000_000, PricingSide::Bid),
                order("99-300", 30_000_000, PricingSide::Bid),
            ],
            vec![
                order("100-002", 10_000_000, PricingSide::Offer),
                order("100-000", 20_000_000, PricingSide::Offer),
            ],
        );

        let top = book.best_bid_offer().unwrap();
        assert_eq!(top.bid_order.price, Price::from_fractional("99-31+").unwrap());
        assert_eq!(top.bid_order.quantity, 20_000_000);
        assert_eq!(
            top.offer_order.price,
            Price::from_fractional("100-000").unwrap()
        );
        assert_eq!(top.offer_order.quantity, 20_000_000);
    }

    #[test]
    fn test_best_bid_offer_empty_side() {
        let book = OrderBook::new(
            bond_for("9128283H1"),
            vec![order("99-310", 10_000_000, PricingSide::Bid)],
            vec![],
        );
        assert!(book.best_bid_offer().is_none());
    }

    #[test]
    fn test_aggregate_sums_duplicate_prices() {
        let book = OrderBook::new(
            bond_for("9128283H1"),
            vec![
                order("100-000", 10, PricingSide::Bid),
                order("100-000", 15, PricingSide::Bid),
                order("99-160", 20, PricingSide::Bid),
            ],
            vec![order("100-010", 5, PricingSide::Offer)],
        );

        let aggregated = book.aggregate();
        assert_eq!(
            sorted_levels(&aggregated.bid_stack),
            vec![
                (Price::from_fractional("99-160").unwrap().as_decimal(), 20),
                (Price::from_fractional("100-000").unwrap().as_decimal(), 25),
            ]
        );
        // source book untouched
        assert_eq!(book.bid_stack.len(), 3);
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let book = OrderBook::new(
            bond_for("9128283H1"),
            vec![
                order("100-000", 10, PricingSide::Bid),
                order("100-000", 15, PricingSide::Bid),
                order("99-160", 20, PricingSide::Bid),
            ],
            vec![
                order("100-010", 5, PricingSide::Offer),
                order("100-010", 7, PricingSide::Offer),
            ],
        );

        let once = book.aggregate();
        let twice = once.aggregate();
        assert_eq!(sorted_levels(&once.bid_stack), sorted_levels(&twice.bid_stack));
        assert_eq!(
            sorted_levels(&once.offer_stack),
            sorted_levels(&twice.offer_stack)
        );
    }

    #[test]
    fn test_aggregate_no_duplicate_side_price() {
        let book = OrderBook::new(
            bond_for("9128283H1"),
            vec![
                order("100-000", 10, PricingSide::Bid),
                order("100-000", 15, PricingSide::Bid),
            ],
            vec![],
        );

        let aggregated = book.aggregate();
        let mut prices: Vec<Decimal> = aggregated
            .bid_stack
            .iter()
            .map(|o| o.price.as_decimal())
            .collect();
        prices.sort();
        prices.dedup();
        assert_eq!(prices.len(), aggregated.bid_stack.len());
    }
}
