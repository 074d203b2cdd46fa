//! Trade Booking, Position, and Risk services
//!
//! Trades fan out to per-book positions, position updates roll up into
//! PV01 risk per product and per sector bucket.

pub mod connector;
pub mod position;
pub mod risk;
pub mod service;
pub mod trade;

pub use connector::{TradeBookingConnector, TradeBookingError};
pub use position::{Position, PositionService, TradeBookingToPositionListener};
pub use risk::{PositionToRiskListener, Pv01, RiskBucket, RiskService};
pub use service::{ExecutionToTradeBookingListener, TradeBookingService};
pub use trade::{Trade, TradeBook};
