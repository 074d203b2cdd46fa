//! Subscribe-side CSV connector for order-book rows
//!
//! Rows: `productId,price,quantity,side`, no header. Every 2·depth parsed
//! rows for a product (depth bids then depth offers) form one order book,
//! which is pushed into the owning service before the next group starts.

use std::cell::RefCell;
use std::io::BufRead;
use std::rc::Rc;

use soa::{Connector, Service};
use thiserror::Error;
use tracing::warn;
use types::numeric::Price;
use types::product::bond_for;
use types::side::PricingSide;

use crate::order_book::{Order, OrderBook};
use crate::service::MarketDataService;

#[derive(Error, Debug)]
pub enum MarketDataError {
    #[error("read error: {0}")]
    Read(#[from] csv::Error),
}

/// Connector grouping market data rows into fixed-depth books.
pub struct MarketDataConnector {
    service: Rc<RefCell<MarketDataService>>,
}

impl MarketDataConnector {
    pub fn new(service: Rc<RefCell<MarketDataService>>) -> Self {
        Self { service }
    }

    /// Drain a market data source to EOF.
    ///
    /// Returns the number of complete books ingested. A trailing partial
    /// group is dropped. Malformed rows are skipped and do not advance the
    /// group counter.
    pub fn subscribe<R: BufRead>(&mut self, source: R) -> Result<u64, MarketDataError> {
        let rows_per_book = 2 * self.service.borrow().book_depth();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(source);

        let mut bid_stack = Vec::new();
        let mut offer_stack = Vec::new();
        let mut rows_in_group = 0usize;
        let mut books = 0u64;

        for record in reader.records() {
            let record = record?;
            let Some((product_id, order)) = parse_row(&record) else {
                warn!(row = ?record, "skipping malformed market data row");
                continue;
            };

            match order.side {
                PricingSide::Bid => bid_stack.push(order),
                PricingSide::Offer => offer_stack.push(order),
            }
            rows_in_group += 1;

            if rows_in_group == rows_per_book {
                let book = OrderBook::new(
                    bond_for(&product_id),
                    std::mem::take(&mut bid_stack),
                    std::mem::take(&mut offer_stack),
                );
                self.service.borrow_mut().on_message(book);
                rows_in_group = 0;
                books += 1;
            }
        }

        if rows_in_group > 0 {
            warn!(rows = rows_in_group, "dropping incomplete order book group");
        }
        Ok(books)
    }
}

fn parse_row(record: &csv::StringRecord) -> Option<(String, Order)> {
    let product_id = record.get(0)?.to_string();
    let price = Price::from_fractional(record.get(1)?).ok()?;
    let quantity: i64 = record.get(2)?.parse().ok()?;
    let side: PricingSide = record.get(3)?.parse().ok()?;
    Some((product_id, Order::new(price, quantity, side)))
}

impl Connector<OrderBook> for MarketDataConnector {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn group(product: &str) -> String {
        let mut rows = String::new();
        for i in 0..5 {
            rows.push_str(&format!("{},99-3{}0,{},BID\n", product, i.min(1), 1_000_000));
        }
        for _ in 0..5 {
            rows.push_str(&format!("{},100-000,{},OFFER\n", product, 1_000_000));
        }
        rows
    }

    #[test]
    fn test_groups_of_two_depth_rows_form_books() {
        let service = Rc::new(RefCell::new(MarketDataService::new()));
        let mut connector = MarketDataConnector::new(service.clone());

        let data = format!("{}{}", group("9128283H1"), group("9128283L2"));
        let books = connector.subscribe(Cursor::new(data)).unwrap();

        assert_eq!(books, 2);
        let svc = service.borrow();
        let book = svc.get_data(&"9128283H1".to_string()).unwrap();
        assert_eq!(book.bid_stack.len(), 5);
        assert_eq!(book.offer_stack.len(), 5);
    }

    #[test]
    fn test_partial_group_dropped() {
        let service = Rc::new(RefCell::new(MarketDataService::new()));
        let mut connector = MarketDataConnector::new(service.clone());

        let data = "9128283H1,99-310,1000000,BID\n9128283H1,100-000,1000000,OFFER\n";
        let books = connector.subscribe(Cursor::new(data)).unwrap();

        assert_eq!(books, 0);
        assert!(service.borrow().get_data(&"9128283H1".to_string()).is_none());
    }

    #[test]
    fn test_malformed_row_does_not_advance_group() {
        let service = Rc::new(RefCell::new(MarketDataService::new()));
        let mut connector = MarketDataConnector::new(service.clone());

        let mut data = String::from("9128283H1,garbage,1000000,BID\n");
        data.push_str(&group("9128283H1"));
        let books = connector.subscribe(Cursor::new(data)).unwrap();

        assert_eq!(books, 1);
        let svc = service.borrow();
        let book = svc.get_data(&"9128283H1".to_string()).unwrap();
        assert_eq!(book.bid_stack.len(), 5);
    }
}
