//! Historical Data Service
//!
//! One sink per emitting service. Every event becomes a text line:
//! a `YYYY-MM-DD HH:MM:SS.mmm` timestamp followed by the entity's fields
//! in definition order, comma-separated. The output file is acquired when
//! the sink is built and flushed on every write.

pub mod sink;

pub use sink::{HistoricalDataConnector, HistoricalDataListener, HistoricalDataService, HistoricalError};
