//! Subscribe-side CSV connector for prices
//!
//! Rows: `productId,bidPrice,offerPrice` with fractional prices, no header.
//! Malformed rows are skipped with a warning; read failures are fatal to
//! the subscription.

use std::cell::RefCell;
use std::io::BufRead;
use std::rc::Rc;

use soa::{Connector, Service};
use thiserror::Error;
use tracing::warn;
use types::numeric::Price;
use types::product::bond_for;

use crate::price::BondPrice;
use crate::service::PricingService;

#[derive(Error, Debug)]
pub enum PricingError {
    #[error("read error: {0}")]
    Read(#[from] csv::Error),
}

/// Counts reported back from one subscription drain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubscribeSummary {
    pub ingested: u64,
    pub skipped: u64,
}

/// Connector pushing price rows into the owning [`PricingService`].
pub struct PricingConnector {
    service: Rc<RefCell<PricingService>>,
}

impl PricingConnector {
    pub fn new(service: Rc<RefCell<PricingService>>) -> Self {
        Self { service }
    }

    /// Drain a price source to EOF, one fully dispatched row at a time.
    pub fn subscribe<R: BufRead>(&mut self, source: R) -> Result<SubscribeSummary, PricingError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(source);
        let mut summary = SubscribeSummary::default();

        for record in reader.records() {
            let record = record?;
            match parse_row(&record) {
                Some(price) => {
                    self.service.borrow_mut().on_message(price);
                    summary.ingested += 1;
                }
                None => {
                    warn!(row = ?record, "skipping malformed price row");
                    summary.skipped += 1;
                }
            }
        }
        Ok(summary)
    }
}

fn parse_row(record: &csv::StringRecord) -> Option<BondPrice> {
    let product_id = record.get(0)?;
    let bid = Price::from_fractional(record.get(1)?).ok()?;
    let offer = Price::from_fractional(record.get(2)?).ok()?;
    if offer < bid {
        return None;
    }
    Some(BondPrice::from_bid_offer(bond_for(product_id), bid, offer))
}

impl Connector<BondPrice> for PricingConnector {}
