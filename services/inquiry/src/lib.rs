//! Inquiry Service
//!
//! Stateful customer inquiry workflow: received inquiries are quoted and
//! completed in one ingress event; rejections are terminal.

pub mod connector;
pub mod model;
pub mod service;

pub use connector::{InquiryConnector, InquiryError, InquirySummary};
pub use model::{Inquiry, InquiryState};
pub use service::InquiryService;
