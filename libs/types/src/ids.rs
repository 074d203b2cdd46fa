//! Identifier types and generation
//!
//! Order, trade, and inquiry ids are distinct newtypes around a
//! 12-character base-36 string drawn from a fixed alphabet, so an id of
//! one kind cannot be passed where another is expected. The generator is
//! seeded from the millisecond clock by default; tests seed it explicitly
//! for determinism.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Fixed 36-symbol alphabet used for generated ids.
pub const ID_ALPHABET: &[u8; 36] = b"0123456789QWERTYUIOPASDFGHJKLZXCVBNM";

/// Length of every generated id.
pub const ID_LEN: usize = 12;

/// Unique identifier for an execution order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for OrderId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a booked trade.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradeId(String);

impl TradeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TradeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TradeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for TradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a customer inquiry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InquiryId(String);

impl InquiryId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for InquiryId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for InquiryId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for InquiryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Random id generator for orders, trades, and inquiries.
pub struct IdGenerator {
    rng: StdRng,
}

impl IdGenerator {
    /// Create a generator seeded from the millisecond clock.
    pub fn new() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self::from_seed(millis)
    }

    /// Create a generator with an explicit seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn next_order_id(&mut self) -> OrderId {
        OrderId(self.next_id())
    }

    pub fn next_trade_id(&mut self) -> TradeId {
        TradeId(self.next_id())
    }

    pub fn next_inquiry_id(&mut self) -> InquiryId {
        InquiryId(self.next_id())
    }

    /// Generate the next 12-character base-36 id.
    fn next_id(&mut self) -> String {
        (0..ID_LEN)
            .map(|_| {
                let i = self.rng.gen_range(0..ID_ALPHABET.len());
                ID_ALPHABET[i] as char
            })
            .collect()
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_shape() {
        let mut gen = IdGenerator::from_seed(42);
        let id = gen.next_order_id();
        assert_eq!(id.as_str().len(), ID_LEN);
        assert!(id.as_str().bytes().all(|b| ID_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_ids_differ_within_generator() {
        let mut gen = IdGenerator::from_seed(42);
        let a = gen.next_trade_id();
        let b = gen.next_trade_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut g1 = IdGenerator::from_seed(7);
        let mut g2 = IdGenerator::from_seed(7);
        for _ in 0..10 {
            assert_eq!(g1.next_inquiry_id(), g2.next_inquiry_id());
        }
    }

    #[test]
    fn test_id_serialization_is_transparent() {
        let id = OrderId::from("ORDER1SAMPLE");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"ORDER1SAMPLE\"");

        let deserialized: OrderId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn test_id_display() {
        let id = InquiryId::from("INQ000000001");
        assert_eq!(id.to_string(), "INQ000000001");
    }
}
