//! Market data service: latest order book per product

use std::collections::HashMap;

use soa::{ListenerHub, Service, SharedListener};
use tracing::debug;

use crate::order_book::{BidOffer, OrderBook};

/// Default number of price levels per side of an ingested book.
pub const DEFAULT_BOOK_DEPTH: usize = 5;

/// Service distributing order book market data, keyed on product id.
///
/// `on_message` stores and dispatches the raw book; aggregation is an
/// explicit call and never mutates the stored book.
pub struct MarketDataService {
    order_books: HashMap<String, OrderBook>,
    listeners: ListenerHub<OrderBook>,
    book_depth: usize,
}

impl MarketDataService {
    pub fn new() -> Self {
        Self::with_depth(DEFAULT_BOOK_DEPTH)
    }

    pub fn with_depth(book_depth: usize) -> Self {
        Self {
            order_books: HashMap::new(),
            listeners: ListenerHub::new(),
            book_depth,
        }
    }

    pub fn add_listener(&mut self, listener: SharedListener<OrderBook>) {
        self.listeners.add(listener);
    }

    pub fn book_depth(&self) -> usize {
        self.book_depth
    }

    /// Top of book for a product: O(depth) scan of the stored stacks.
    pub fn best_bid_offer(&self, product_id: &str) -> Option<BidOffer> {
        self.order_books
            .get(product_id)
            .and_then(OrderBook::best_bid_offer)
    }

    /// Aggregated copy of a product's book, one entry per (side, price).
    pub fn aggregate_depth(&self, product_id: &str) -> Option<OrderBook> {
        self.order_books.get(product_id).map(OrderBook::aggregate)
    }
}

impl Service for MarketDataService {
    type Key = String;
    type Value = OrderBook;

    fn get_data(&self, key: &String) -> Option<&OrderBook> {
        self.order_books.get(key)
    }

    fn on_message(&mut self, value: OrderBook) {
        let product_id = value.product.product_id().to_string();
        debug!(
            product = %product_id,
            bids = value.bid_stack.len(),
            offers = value.offer_stack.len(),
            "order book ingested"
        );
        self.order_books.insert(product_id, value.clone());
        self.listeners.process_add(&value);
    }
}

impl Default for MarketDataService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order_book::Order;
    use soa::ServiceListener;
    use std::cell::RefCell;
    use std::rc::Rc;
    use types::numeric::Price;
    use types::product::bond_for;
    use types::side::PricingSide;

    struct StackSizeProbe {
        seen: Rc<RefCell<Vec<usize>>>,
    }

    impl ServiceListener<OrderBook> for StackSizeProbe {
        fn process_add(&mut self, data: &OrderBook) {
            self.seen.borrow_mut().push(data.bid_stack.len());
        }
    }

    fn book_with_duplicate_levels() -> OrderBook {
        let order = |p: &str, q: i64, side| Order::new(Price::from_fractional(p).unwrap(), q, side);
        OrderBook::new(
            bond_for("9128283H1"),
            vec![
                order("99-310", 10, PricingSide::Bid),
                order("99-310", 20, PricingSide::Bid),
            ],
            vec![
                order("100-000", 5, PricingSide::Offer),
                order("100-000", 5, PricingSide::Offer),
            ],
        )
    }

    #[test]
    fn test_dispatches_raw_book_not_aggregated() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut service = MarketDataService::new();
        service.add_listener(Rc::new(RefCell::new(StackSizeProbe { seen: seen.clone() })));

        service.on_message(book_with_duplicate_levels());

        // listener saw the two raw bid rows, not one collapsed level
        assert_eq!(*seen.borrow(), vec![2]);
    }

    #[test]
    fn test_aggregate_depth_leaves_store_untouched() {
        let mut service = MarketDataService::new();
        service.on_message(book_with_duplicate_levels());

        let aggregated = service.aggregate_depth("9128283H1").unwrap();
        assert_eq!(aggregated.bid_stack.len(), 1);
        assert_eq!(aggregated.bid_stack[0].quantity, 30);

        let stored = service.get_data(&"9128283H1".to_string()).unwrap();
        assert_eq!(stored.bid_stack.len(), 2);
    }

    #[test]
    fn test_best_bid_offer_via_service() {
        let mut service = MarketDataService::new();
        service.on_message(book_with_duplicate_levels());

        let top = service.best_bid_offer("9128283H1").unwrap();
        assert_eq!(top.bid_order.price, Price::from_fractional("99-310").unwrap());
        assert_eq!(
            top.offer_order.price,
            Price::from_fractional("100-000").unwrap()
        );
        assert!(service.best_bid_offer("missing").is_none());
    }
}
