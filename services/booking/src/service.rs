//! Trade booking service

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use execution::ExecutionOrder;
use soa::{ListenerHub, Service, ServiceListener, SharedListener};
use tracing::debug;
use types::ids::{IdGenerator, TradeId};
use types::side::{PricingSide, Side};

use crate::trade::{Trade, TradeBook};

/// Books trades and fans them out to position keeping, keyed on trade id.
///
/// Holds the per-product round-robin counter used when a trade has to be
/// assigned a book (trades derived from executions); trades ingested from
/// a file keep the book written in the row.
pub struct TradeBookingService {
    trades: HashMap<TradeId, Trade>,
    listeners: ListenerHub<Trade>,
    book_rotation: HashMap<String, usize>,
}

impl TradeBookingService {
    pub fn new() -> Self {
        Self {
            trades: HashMap::new(),
            listeners: ListenerHub::new(),
            book_rotation: HashMap::new(),
        }
    }

    pub fn add_listener(&mut self, listener: SharedListener<Trade>) {
        self.listeners.add(listener);
    }

    /// Next book for a product: TRSY1, TRSY2, TRSY3, TRSY1, ...
    pub fn next_book(&mut self, product_id: &str) -> TradeBook {
        let counter = self.book_rotation.entry(product_id.to_string()).or_insert(0);
        let book = TradeBook::ALL[*counter % TradeBook::ALL.len()];
        *counter += 1;
        book
    }

    /// Book a trade: store it and dispatch to listeners.
    pub fn book_trade(&mut self, trade: Trade) {
        debug!(
            product = %trade.product.product_id(),
            trade_id = %trade.trade_id,
            book = %trade.book,
            "trade booked"
        );
        self.trades.insert(trade.trade_id.clone(), trade.clone());
        self.listeners.process_add(&trade);
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }
}

impl Service for TradeBookingService {
    type Key = TradeId;
    type Value = Trade;

    fn get_data(&self, key: &TradeId) -> Option<&Trade> {
        self.trades.get(key)
    }

    fn on_message(&mut self, value: Trade) {
        self.book_trade(value);
    }
}

impl Default for TradeBookingService {
    fn default() -> Self {
        Self::new()
    }
}

/// Turns executed orders into booked trades.
///
/// Crossing at the bid hits a resting bid, so the book sells; crossing at
/// the offer lifts a resting offer, so the book buys. Books are assigned
/// round-robin per product.
pub struct ExecutionToTradeBookingListener {
    booking: Rc<RefCell<TradeBookingService>>,
    ids: IdGenerator,
}

impl ExecutionToTradeBookingListener {
    pub fn new(booking: Rc<RefCell<TradeBookingService>>) -> Self {
        Self::with_id_generator(booking, IdGenerator::new())
    }

    pub fn with_id_generator(booking: Rc<RefCell<TradeBookingService>>, ids: IdGenerator) -> Self {
        Self { booking, ids }
    }
}

impl ServiceListener<ExecutionOrder> for ExecutionToTradeBookingListener {
    fn process_add(&mut self, data: &ExecutionOrder) {
        let side = match data.side {
            PricingSide::Bid => Side::Sell,
            PricingSide::Offer => Side::Buy,
        };
        let quantity = data.visible_quantity + data.hidden_quantity;

        let mut booking = self.booking.borrow_mut();
        let book = booking.next_book(data.product.product_id());
        let trade = Trade::new(
            data.product.clone(),
            self.ids.next_trade_id(),
            data.price,
            book,
            quantity,
            side,
        );
        booking.book_trade(trade);
    }
}
