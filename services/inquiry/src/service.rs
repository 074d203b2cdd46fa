//! Inquiry quoting workflow
//!
//! A received inquiry is stored, quoted, and completed inside one
//! `on_message` call: the quote round-trip is a bounded two-phase state
//! transition, not mutual recursion with the connector, so stack depth is
//! independent of input size.

use std::collections::HashMap;

use soa::{ListenerHub, Service, SharedListener};
use tracing::{debug, info};
use types::ids::InquiryId;
use types::numeric::Price;

use crate::model::{Inquiry, InquiryState};

/// Service for customer inquiries, keyed on inquiry id (each inquiry is
/// unique; this is not a product key).
pub struct InquiryService {
    inquiries: HashMap<InquiryId, Inquiry>,
    listeners: ListenerHub<Inquiry>,
}

impl InquiryService {
    pub fn new() -> Self {
        Self {
            inquiries: HashMap::new(),
            listeners: ListenerHub::new(),
        }
    }

    pub fn add_listener(&mut self, listener: SharedListener<Inquiry>) {
        self.listeners.add(listener);
    }

    /// Send a quote back to the client: update the stored price and
    /// dispatch the updated inquiry.
    pub fn send_quote(&mut self, inquiry_id: &InquiryId, price: Price) {
        let Some(inquiry) = self.inquiries.get_mut(inquiry_id) else {
            return;
        };
        inquiry.set_price(price);
        let updated = inquiry.clone();
        info!(inquiry = %inquiry_id, price = %price, "quote sent");
        self.listeners.process_add(&updated);
    }

    /// Reject an inquiry from the client. No dispatch.
    pub fn reject_inquiry(&mut self, inquiry_id: &InquiryId) {
        if let Some(inquiry) = self.inquiries.get_mut(inquiry_id) {
            inquiry.set_state(InquiryState::Rejected);
        }
    }

    pub fn len(&self) -> usize {
        self.inquiries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inquiries.is_empty()
    }
}

impl Service for InquiryService {
    type Key = InquiryId;
    type Value = Inquiry;

    fn get_data(&self, key: &InquiryId) -> Option<&Inquiry> {
        self.inquiries.get(key)
    }

    fn on_message(&mut self, mut value: Inquiry) {
        loop {
            match value.state() {
                InquiryState::Received => {
                    // store, then run the quote round-trip: the quoted copy
                    // re-enters the state machine below
                    self.inquiries
                        .insert(value.inquiry_id.clone(), value.clone());
                    value.set_state(InquiryState::Quoted);
                }
                InquiryState::Quoted => {
                    value.set_state(InquiryState::Done);
                    self.inquiries
                        .insert(value.inquiry_id.clone(), value.clone());
                    debug!(inquiry = %value.inquiry_id, "inquiry completed");
                    self.listeners.process_add(&value);
                    break;
                }
                InquiryState::Done | InquiryState::Rejected | InquiryState::CustomerRejected => {
                    break;
                }
            }
        }
    }
}

impl Default for InquiryService {
    fn default() -> Self {
        Self::new()
    }
}
