//! Per-book position keeping

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use soa::{FieldRecord, ListenerHub, Service, ServiceListener, SharedListener};
use tracing::debug;
use types::product::Bond;

use crate::trade::{Trade, TradeBook};

/// Signed position in one product across the trading books.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub product: Bond,
    positions: HashMap<TradeBook, i64>,
}

impl Position {
    pub fn new(product: Bond) -> Self {
        Self {
            product,
            positions: HashMap::new(),
        }
    }

    /// Signed quantity held in one book.
    pub fn quantity(&self, book: TradeBook) -> i64 {
        self.positions.get(&book).copied().unwrap_or(0)
    }

    /// Sum of the signed quantities across all books.
    pub fn aggregate(&self) -> i64 {
        self.positions.values().sum()
    }

    /// Apply a signed delta to one book.
    pub fn apply(&mut self, book: TradeBook, delta: i64) {
        *self.positions.entry(book).or_insert(0) += delta;
    }
}

impl FieldRecord for Position {
    fn record_key(&self) -> String {
        self.product.product_id().to_string()
    }

    fn fields(&self) -> Vec<String> {
        let mut fields = vec![self.product.product_id().to_string()];
        for book in TradeBook::ALL {
            fields.push(book.to_string());
            fields.push(self.quantity(book).to_string());
        }
        fields.push(self.aggregate().to_string());
        fields
    }
}

/// Maintains the position per product and book, keyed on product id.
pub struct PositionService {
    positions: HashMap<String, Position>,
    listeners: ListenerHub<Position>,
}

impl PositionService {
    pub fn new() -> Self {
        Self {
            positions: HashMap::new(),
            listeners: ListenerHub::new(),
        }
    }

    pub fn add_listener(&mut self, listener: SharedListener<Position>) {
        self.listeners.add(listener);
    }

    /// Apply one trade to its product's position and dispatch the update.
    pub fn add_trade(&mut self, trade: &Trade) {
        let product_id = trade.product.product_id().to_string();
        let position = self
            .positions
            .entry(product_id.clone())
            .or_insert_with(|| Position::new(trade.product.clone()));
        position.apply(trade.book, trade.signed_quantity());

        let updated = position.clone();
        debug!(
            product = %product_id,
            book = %trade.book,
            aggregate = updated.aggregate(),
            "position updated"
        );
        self.listeners.process_add(&updated);
    }
}

impl Service for PositionService {
    type Key = String;
    type Value = Position;

    fn get_data(&self, key: &String) -> Option<&Position> {
        self.positions.get(key)
    }

    fn on_message(&mut self, value: Position) {
        self.positions
            .insert(value.product.product_id().to_string(), value.clone());
        self.listeners.process_add(&value);
    }
}

impl Default for PositionService {
    fn default() -> Self {
        Self::new()
    }
}

/// Bridges trade booking into position keeping.
pub struct TradeBookingToPositionListener {
    positions: Rc<RefCell<PositionService>>,
}

impl TradeBookingToPositionListener {
    pub fn new(positions: Rc<RefCell<PositionService>>) -> Self {
        Self { positions }
    }
}

impl ServiceListener<Trade> for TradeBookingToPositionListener {
    fn process_add(&mut self, data: &Trade) {
        self.positions.borrow_mut().add_trade(data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::numeric::Price;
    use types::product::bond_for;
    use types::side::Side;

    fn trade(book: TradeBook, quantity: i64, side: Side) -> Trade {
        Trade::new(
            bond_for("9128283F5"),
            types::ids::TradeId::from(format!("T-{}-{}", book, quantity)),
            Price::from_fractional("99-000").unwrap(),
            book,
            quantity,
            side,
        )
    }

    #[test]
    fn test_aggregate_is_sum_of_books() {
        let mut service = PositionService::new();
        service.add_trade(&trade(TradeBook::Trsy1, 1_000_000, Side::Buy));
        service.add_trade(&trade(TradeBook::Trsy2, 500_000, Side::Sell));

        let position = service.get_data(&"9128283F5".to_string()).unwrap();
        assert_eq!(position.quantity(TradeBook::Trsy1), 1_000_000);
        assert_eq!(position.quantity(TradeBook::Trsy2), -500_000);
        assert_eq!(position.quantity(TradeBook::Trsy3), 0);
        assert_eq!(position.aggregate(), 500_000);
    }

    #[test]
    fn test_position_conservation() {
        let mut service = PositionService::new();
        let trades = [
            trade(TradeBook::Trsy1, 3_000_000, Side::Buy),
            trade(TradeBook::Trsy2, 1_000_000, Side::Sell),
            trade(TradeBook::Trsy1, 2_000_000, Side::Sell),
            trade(TradeBook::Trsy3, 4_000_000, Side::Buy),
        ];
        for t in &trades {
            service.add_trade(t);
        }

        let expected: i64 = trades.iter().map(Trade::signed_quantity).sum();
        let position = service.get_data(&"9128283F5".to_string()).unwrap();
        assert_eq!(position.aggregate(), expected);
    }

    #[test]
    fn test_each_trade_dispatches_updated_position() {
        let aggregates = Rc::new(RefCell::new(Vec::new()));

        struct Probe {
            aggregates: Rc<RefCell<Vec<i64>>>,
        }
        impl ServiceListener<Position> for Probe {
            fn process_add(&mut self, data: &Position) {
                self.aggregates.borrow_mut().push(data.aggregate());
            }
        }

        let mut service = PositionService::new();
        service.add_listener(Rc::new(RefCell::new(Probe {
            aggregates: aggregates.clone(),
        })));

        service.add_trade(&trade(TradeBook::Trsy1, 1_000_000, Side::Buy));
        service.add_trade(&trade(TradeBook::Trsy2, 500_000, Side::Sell));

        assert_eq!(*aggregates.borrow(), vec![1_000_000, 500_000]);
    }

    #[test]
    fn test_fields_list_books_then_aggregate() {
        let mut position = Position::new(bond_for("9128283F5"));
        position.apply(TradeBook::Trsy1, 1_000_000);
        position.apply(TradeBook::Trsy2, -500_000);

        assert_eq!(
            position.fields(),
            vec![
                "9128283F5", "TRSY1", "1000000", "TRSY2", "-500000", "TRSY3", "0", "500000",
            ]
        );
    }
}
