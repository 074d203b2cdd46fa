//! Bidirectional CSV connector for inquiries
//!
//! Subscribe side reads `inquiryId,productId,side,quantity,price,state`
//! rows and pushes them into the owning service. Publish side carries the
//! outgoing quote back toward the client. Rows with an unknown state
//! string are rejected outright.

use std::cell::RefCell;
use std::io::BufRead;
use std::rc::Rc;

use soa::{Connector, Service};
use thiserror::Error;
use tracing::{error, info, warn};
use types::ids::InquiryId;
use types::numeric::Price;
use types::product::bond_for;

use crate::model::{Inquiry, InquiryState};
use crate::service::InquiryService;

#[derive(Error, Debug)]
pub enum InquiryError {
    #[error("read error: {0}")]
    Read(#[from] csv::Error),

    #[error("unknown inquiry state: {0}")]
    UnknownState(String),
}

/// Outcome of one subscription drain: counts plus the per-row rejection
/// errors (rejections do not abort the drain).
#[derive(Debug, Default)]
pub struct InquirySummary {
    pub ingested: u64,
    pub rejected: u64,
    pub errors: Vec<InquiryError>,
}

/// Connector between the inquiry service and the client side.
pub struct InquiryConnector {
    service: Rc<RefCell<InquiryService>>,
}

impl InquiryConnector {
    pub fn new(service: Rc<RefCell<InquiryService>>) -> Self {
        Self { service }
    }

    /// Drain an inquiry source to EOF.
    pub fn subscribe<R: BufRead>(&mut self, source: R) -> Result<InquirySummary, InquiryError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(source);
        let mut summary = InquirySummary::default();

        for record in reader.records() {
            let record = record?;

            // unknown state strings are rejected, not silently skipped
            if let Some(state_field) = record.get(5) {
                if state_field.parse::<InquiryState>().is_err() {
                    let err = InquiryError::UnknownState(state_field.to_string());
                    error!(row = ?record, error = %err, "rejecting inquiry");
                    summary.rejected += 1;
                    summary.errors.push(err);
                    continue;
                }
            }

            match parse_row(&record) {
                Some(inquiry) => {
                    let was_received = inquiry.state() == InquiryState::Received;
                    let inquiry_id = inquiry.inquiry_id.clone();
                    self.service.borrow_mut().on_message(inquiry);
                    summary.ingested += 1;

                    // a received inquiry has been quoted and completed;
                    // carry the quote back toward the client
                    if was_received {
                        let completed = self.service.borrow().get_data(&inquiry_id).cloned();
                        if let Some(completed) = completed {
                            self.publish(&completed);
                        }
                    }
                }
                None => {
                    warn!(row = ?record, "skipping malformed inquiry row");
                    summary.rejected += 1;
                }
            }
        }
        Ok(summary)
    }
}

fn parse_row(record: &csv::StringRecord) -> Option<Inquiry> {
    let inquiry_id = InquiryId::from(record.get(0)?);
    let product_id = record.get(1)?;
    let side = record.get(2)?.parse().ok()?;
    let quantity: i64 = record.get(3)?.parse().ok()?;
    let price = Price::from_fractional(record.get(4)?).ok()?;
    let state = record.get(5)?.parse().ok()?;
    Some(Inquiry::new(
        inquiry_id,
        bond_for(product_id),
        side,
        quantity,
        price,
        state,
    ))
}

impl Connector<Inquiry> for InquiryConnector {
    /// Publish the outgoing quote toward the client.
    fn publish(&mut self, value: &Inquiry) {
        info!(
            inquiry = %value.inquiry_id,
            price = %value.price(),
            state = %value.state(),
            "quote published to client"
        );
    }
}
