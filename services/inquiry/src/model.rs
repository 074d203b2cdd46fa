//! Customer inquiry model

use serde::{Deserialize, Serialize};
use soa::FieldRecord;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use types::ids::InquiryId;
use types::numeric::Price;
use types::product::Bond;
use types::side::Side;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown inquiry state: {0}")]
pub struct ParseInquiryStateError(pub String);

/// Lifecycle state of an inquiry.
///
/// Done, Rejected, and CustomerRejected are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InquiryState {
    Received,
    Quoted,
    Done,
    Rejected,
    CustomerRejected,
}

impl InquiryState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            InquiryState::Done | InquiryState::Rejected | InquiryState::CustomerRejected
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InquiryState::Received => "RECEIVED",
            InquiryState::Quoted => "QUOTED",
            InquiryState::Done => "DONE",
            InquiryState::Rejected => "REJECTED",
            InquiryState::CustomerRejected => "CUSTOMER_REJECTED",
        }
    }
}

impl FromStr for InquiryState {
    type Err = ParseInquiryStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RECEIVED" => Ok(InquiryState::Received),
            "QUOTED" => Ok(InquiryState::Quoted),
            "DONE" => Ok(InquiryState::Done),
            "REJECTED" => Ok(InquiryState::Rejected),
            "CUSTOMER_REJECTED" => Ok(InquiryState::CustomerRejected),
            other => Err(ParseInquiryStateError(other.to_string())),
        }
    }
}

impl fmt::Display for InquiryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A customer inquiry for a quote in one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inquiry {
    pub inquiry_id: InquiryId,
    pub product: Bond,
    pub side: Side,
    pub quantity: i64,
    price: Price,
    state: InquiryState,
}

impl Inquiry {
    pub fn new(
        inquiry_id: InquiryId,
        product: Bond,
        side: Side,
        quantity: i64,
        price: Price,
        state: InquiryState,
    ) -> Self {
        Self {
            inquiry_id,
            product,
            side,
            quantity,
            price,
            state,
        }
    }

    pub fn price(&self) -> Price {
        self.price
    }

    /// Update the quoted price (used by `send_quote`).
    pub fn set_price(&mut self, price: Price) {
        self.price = price;
    }

    pub fn state(&self) -> InquiryState {
        self.state
    }

    pub fn set_state(&mut self, state: InquiryState) {
        self.state = state;
    }
}

impl FieldRecord for Inquiry {
    fn record_key(&self) -> String {
        self.inquiry_id.to_string()
    }

    fn fields(&self) -> Vec<String> {
        vec![
            self.inquiry_id.to_string(),
            self.product.product_id().to_string(),
            self.side.to_string(),
            self.quantity.to_string(),
            self.price.to_fractional(),
            self.state.to_string(),
        ]
    }
}
