//! Execution Services
//!
//! The algo side watches order books and crosses the spread when it is
//! tight enough; the execution service proper stores orders and dispatches
//! them to downstream consumers (trade booking, sinks) via `execute_order`.

pub mod algo;
pub mod order;
pub mod service;

pub use algo::{AlgoExecutionService, MarketDataToAlgoExecutionListener};
pub use order::{ExecutionOrder, OrderType};
pub use service::{AlgoExecutionToExecutionListener, ExecutionService};
