//! Streaming Services
//!
//! The algo side turns every incoming price into a two-sided stream with
//! tiered visible size; the streaming service proper stores the streams and
//! publishes them downstream.

pub mod algo;
pub mod service;
pub mod stream;

pub use algo::{AlgoStreamingConfig, AlgoStreamingService, PricingToAlgoStreamingListener};
pub use service::{AlgoStreamingToStreamingListener, StreamingService};
pub use stream::{PriceStream, PriceStreamOrder};
