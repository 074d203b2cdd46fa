//! Algo execution: spread-triggered crossing
//!
//! Watches every order book update and crosses the top of book when the
//! spread has collapsed to the trigger width or less, alternating between
//! lifting the bid and hitting the offer across triggers.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use market_data::OrderBook;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use soa::{ListenerHub, Service, ServiceListener, SharedListener};
use tracing::debug;
use types::ids::IdGenerator;
use types::side::PricingSide;

use crate::order::ExecutionOrder;

/// Widest spread that still triggers a cross: 1/128 of a point.
pub const SPREAD_THRESHOLD: Decimal = dec!(0.0078125);

/// Crosses tight books, keyed on product id (last cross per product).
pub struct AlgoExecutionService {
    executions: HashMap<String, ExecutionOrder>,
    listeners: ListenerHub<ExecutionOrder>,
    ids: IdGenerator,
    trigger_count: u64,
}

impl AlgoExecutionService {
    pub fn new() -> Self {
        Self::with_id_generator(IdGenerator::new())
    }

    /// Seeded construction for deterministic order ids in tests.
    pub fn with_id_generator(ids: IdGenerator) -> Self {
        Self {
            executions: HashMap::new(),
            listeners: ListenerHub::new(),
            ids,
            trigger_count: 0,
        }
    }

    pub fn add_listener(&mut self, listener: SharedListener<ExecutionOrder>) {
        self.listeners.add(listener);
    }

    /// Evaluate one order book update, crossing if the spread allows.
    ///
    /// Even triggers cross at the bid, odd triggers at the offer; the
    /// counter advances only when a cross fires.
    pub fn execute_against(&mut self, book: &OrderBook) {
        let Some(top) = book.best_bid_offer() else {
            return;
        };
        if top.spread() > SPREAD_THRESHOLD {
            return;
        }

        let (side, order) = if self.trigger_count % 2 == 0 {
            (PricingSide::Bid, top.bid_order)
        } else {
            (PricingSide::Offer, top.offer_order)
        };
        self.trigger_count += 1;

        let execution = ExecutionOrder::market(
            book.product.clone(),
            side,
            self.ids.next_order_id(),
            order.price,
            order.quantity,
        );
        debug!(
            product = %execution.product.product_id(),
            side = %execution.side,
            price = %execution.price,
            "spread trigger crossed"
        );
        self.on_message(execution);
    }
}

impl Service for AlgoExecutionService {
    type Key = String;
    type Value = ExecutionOrder;

    fn get_data(&self, key: &String) -> Option<&ExecutionOrder> {
        self.executions.get(key)
    }

    fn on_message(&mut self, value: ExecutionOrder) {
        self.executions
            .insert(value.product.product_id().to_string(), value.clone());
        self.listeners.process_add(&value);
    }
}

impl Default for AlgoExecutionService {
    fn default() -> Self {
        Self::new()
    }
}

/// Bridges the market data service into algo execution.
pub struct MarketDataToAlgoExecutionListener {
    algo: Rc<RefCell<AlgoExecutionService>>,
}

impl MarketDataToAlgoExecutionListener {
    pub fn new(algo: Rc<RefCell<AlgoExecutionService>>) -> Self {
        Self { algo }
    }
}

impl ServiceListener<OrderBook> for MarketDataToAlgoExecutionListener {
    fn process_add(&mut self, data: &OrderBook) {
        self.algo.borrow_mut().execute_against(data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use market_data::Order;
    use types::numeric::Price;
    use types::product::bond_for;

    fn book(bid: &str, bid_qty: i64, offer: &str, offer_qty: i64) -> OrderBook {
        OrderBook::new(
            bond_for("9128283H1"),
            vec![Order::new(
                Price::from_fractional(bid).unwrap(),
                bid_qty,
                PricingSide::Bid,
            )],
            vec![Order::new(
                Price::from_fractional(offer).unwrap(),
                offer_qty,
                PricingSide::Offer,
            )],
        )
    }

    fn algo() -> AlgoExecutionService {
        AlgoExecutionService::with_id_generator(IdGenerator::from_seed(1))
    }

    #[test]
    fn test_wide_spread_does_not_cross() {
        let mut service = algo();
        // 1/32 spread is four times the trigger width
        service.execute_against(&book("99-31+", 1_000_000, "100-00+", 1_000_000));
        assert!(service.get_data(&"9128283H1".to_string()).is_none());
    }

    #[test]
    fn test_threshold_spread_crosses_at_bid_first() {
        let mut service = algo();
        // 1/256 spread: offer one tick above the bid
        service.execute_against(&book("99-31+", 3_000_000, "99-315", 1_000_000));

        let execution = service.get_data(&"9128283H1".to_string()).unwrap();
        assert_eq!(execution.side, PricingSide::Bid);
        assert_eq!(execution.price, Price::from_fractional("99-31+").unwrap());
        assert_eq!(execution.visible_quantity, 3_000_000);
        assert_eq!(execution.hidden_quantity, 0);
    }

    #[test]
    fn test_exact_threshold_crosses() {
        let mut service = algo();
        // spread exactly 1/128 = 2/256
        service.execute_against(&book("99-310", 1_000_000, "99-312", 1_000_000));
        assert!(service.get_data(&"9128283H1".to_string()).is_some());
    }

    #[test]
    fn test_side_alternates_only_on_fired_triggers() {
        let mut service = algo();

        service.execute_against(&book("99-310", 1_000_000, "99-312", 2_000_000));
        let first = service.get_data(&"9128283H1".to_string()).unwrap().clone();
        assert_eq!(first.side, PricingSide::Bid);

        // wide book in between must not consume the alternation slot
        service.execute_against(&book("99-000", 1_000_000, "99-100", 1_000_000));

        service.execute_against(&book("99-310", 1_000_000, "99-312", 2_000_000));
        let second = service.get_data(&"9128283H1".to_string()).unwrap().clone();
        assert_eq!(second.side, PricingSide::Offer);
        assert_eq!(second.visible_quantity, 2_000_000);
        assert_ne!(first.order_id, second.order_id);
    }
}
