//! Subscribe-side CSV connector for trades
//!
//! Rows: `productId,tradeId,price,book,quantity,side` with fractional
//! prices, no header. The book column is taken as written; round-robin
//! assignment applies only to trades derived from executions.

use std::cell::RefCell;
use std::io::BufRead;
use std::rc::Rc;

use soa::{Connector, Service};
use thiserror::Error;
use tracing::warn;
use types::ids::TradeId;
use types::numeric::Price;
use types::product::bond_for;

use crate::service::TradeBookingService;
use crate::trade::Trade;

#[derive(Error, Debug)]
pub enum TradeBookingError {
    #[error("read error: {0}")]
    Read(#[from] csv::Error),
}

/// Connector pushing trade rows into the owning [`TradeBookingService`].
pub struct TradeBookingConnector {
    service: Rc<RefCell<TradeBookingService>>,
}

impl TradeBookingConnector {
    pub fn new(service: Rc<RefCell<TradeBookingService>>) -> Self {
        Self { service }
    }

    /// Drain a trade source to EOF. Returns the number of booked trades.
    pub fn subscribe<R: BufRead>(&mut self, source: R) -> Result<u64, TradeBookingError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(source);
        let mut booked = 0u64;

        for record in reader.records() {
            let record = record?;
            match parse_row(&record) {
                Some(trade) => {
                    self.service.borrow_mut().on_message(trade);
                    booked += 1;
                }
                None => warn!(row = ?record, "skipping malformed trade row"),
            }
        }
        Ok(booked)
    }
}

fn parse_row(record: &csv::StringRecord) -> Option<Trade> {
    let product_id = record.get(0)?;
    let trade_id = TradeId::from(record.get(1)?);
    let price = Price::from_fractional(record.get(2)?).ok()?;
    let book = record.get(3)?.parse().ok()?;
    let quantity: i64 = record.get(4)?.parse().ok()?;
    let side = record.get(5)?.parse().ok()?;
    Some(Trade::new(
        bond_for(product_id),
        trade_id,
        price,
        book,
        quantity,
        side,
    ))
}

impl Connector<Trade> for TradeBookingConnector {}
