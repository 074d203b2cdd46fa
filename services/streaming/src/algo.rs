//! Algo streaming: prices in, tiered two-sided streams out

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use pricing::BondPrice;
use rust_decimal::Decimal;
use soa::{ListenerHub, Service, ServiceListener, SharedListener};
use tracing::debug;
use types::side::PricingSide;

use crate::stream::{PriceStream, PriceStreamOrder};

/// Streaming configuration: the tier ladder for visible sizes and the
/// hidden-size multiple.
#[derive(Debug, Clone)]
pub struct AlgoStreamingConfig {
    /// Visible sizes the stream steps through, in order.
    pub visible_tiers: Vec<i64>,
    /// Hidden quantity as a multiple of the visible quantity.
    pub hidden_multiple: i64,
}

impl Default for AlgoStreamingConfig {
    fn default() -> Self {
        Self {
            visible_tiers: vec![1_000_000, 2_000_000],
            hidden_multiple: 2,
        }
    }
}

/// Turns each incoming price into a [`PriceStream`], keyed on product id.
///
/// Bid/offer prices sit half the spread either side of the mid. Visible
/// quantity steps through the configured tier ladder on a global counter.
pub struct AlgoStreamingService {
    streams: HashMap<String, PriceStream>,
    listeners: ListenerHub<PriceStream>,
    config: AlgoStreamingConfig,
    tick: u64,
}

impl AlgoStreamingService {
    pub fn new() -> Self {
        Self::with_config(AlgoStreamingConfig::default())
    }

    /// # Panics
    /// Panics if the tier ladder is empty.
    pub fn with_config(config: AlgoStreamingConfig) -> Self {
        assert!(
            !config.visible_tiers.is_empty(),
            "tier ladder must not be empty"
        );
        Self {
            streams: HashMap::new(),
            listeners: ListenerHub::new(),
            config,
            tick: 0,
        }
    }

    pub fn add_listener(&mut self, listener: SharedListener<PriceStream>) {
        self.listeners.add(listener);
    }

    /// Build and dispatch the stream for one incoming price.
    pub fn publish_two_way_price(&mut self, price: &BondPrice) {
        let half_spread = price.bid_offer_spread / Decimal::from(2);
        let bid_price = price.mid - half_spread;
        let offer_price = price.mid + half_spread;

        let tiers = &self.config.visible_tiers;
        let visible = tiers[(self.tick % tiers.len() as u64) as usize];
        let hidden = self.config.hidden_multiple * visible;
        self.tick += 1;

        let stream = PriceStream::new(
            price.product.clone(),
            PriceStreamOrder::new(bid_price, visible, hidden, PricingSide::Bid),
            PriceStreamOrder::new(offer_price, visible, hidden, PricingSide::Offer),
        );

        debug!(
            product = %stream.product.product_id(),
            visible,
            "two-way stream published"
        );
        self.on_message(stream);
    }
}

impl Service for AlgoStreamingService {
    type Key = String;
    type Value = PriceStream;

    fn get_data(&self, key: &String) -> Option<&PriceStream> {
        self.streams.get(key)
    }

    fn on_message(&mut self, value: PriceStream) {
        self.streams
            .insert(value.product.product_id().to_string(), value.clone());
        self.listeners.process_add(&value);
    }
}

impl Default for AlgoStreamingService {
    fn default() -> Self {
        Self::new()
    }
}

/// Bridges the pricing service into algo streaming.
pub struct PricingToAlgoStreamingListener {
    algo: Rc<RefCell<AlgoStreamingService>>,
}

impl PricingToAlgoStreamingListener {
    pub fn new(algo: Rc<RefCell<AlgoStreamingService>>) -> Self {
        Self { algo }
    }
}

impl ServiceListener<BondPrice> for PricingToAlgoStreamingListener {
    fn process_add(&mut self, data: &BondPrice) {
        self.algo.borrow_mut().publish_two_way_price(data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::numeric::Price;
    use types::product::bond_for;

    fn price(bid: &str, offer: &str) -> BondPrice {
        BondPrice::from_bid_offer(
            bond_for("9128283H1"),
            Price::from_fractional(bid).unwrap(),
            Price::from_fractional(offer).unwrap(),
        )
    }

    #[test]
    fn test_stream_prices_straddle_mid() {
        let mut algo = AlgoStreamingService::new();
        algo.publish_two_way_price(&price("99-310", "100-010"));

        let stream = algo.get_data(&"9128283H1".to_string()).unwrap();
        assert_eq!(stream.bid_order.price, Price::from_fractional("99-310").unwrap());
        assert_eq!(
            stream.offer_order.price,
            Price::from_fractional("100-010").unwrap()
        );
        assert_eq!(stream.bid_order.side, PricingSide::Bid);
        assert_eq!(stream.offer_order.side, PricingSide::Offer);
    }

    #[test]
    fn test_visible_size_alternates_globally() {
        let mut algo = AlgoStreamingService::new();
        let mut visibles = Vec::new();
        let mut hiddens = Vec::new();

        // three prices, two products: the counter is global, not per product
        for (cusip, bid, offer) in [
            ("9128283H1", "99-000", "99-010"),
            ("9128283L2", "99-100", "99-110"),
            ("9128283H1", "99-020", "99-030"),
        ] {
            let p = BondPrice::from_bid_offer(
                bond_for(cusip),
                Price::from_fractional(bid).unwrap(),
                Price::from_fractional(offer).unwrap(),
            );
            algo.publish_two_way_price(&p);
            let stream = algo.get_data(&cusip.to_string()).unwrap();
            visibles.push(stream.bid_order.visible_quantity);
            hiddens.push(stream.bid_order.hidden_quantity);
        }

        assert_eq!(visibles, vec![1_000_000, 2_000_000, 1_000_000]);
        assert_eq!(hiddens, vec![2_000_000, 4_000_000, 2_000_000]);
    }

    #[test]
    fn test_custom_tier_ladder_honored() {
        let mut algo = AlgoStreamingService::with_config(AlgoStreamingConfig {
            visible_tiers: vec![500_000, 1_000_000, 3_000_000],
            hidden_multiple: 4,
        });

        let mut visibles = Vec::new();
        for _ in 0..4 {
            algo.publish_two_way_price(&price("99-000", "99-010"));
            let stream = algo.get_data(&"9128283H1".to_string()).unwrap();
            visibles.push(stream.bid_order.visible_quantity);
            assert_eq!(
                stream.bid_order.hidden_quantity,
                4 * stream.bid_order.visible_quantity
            );
        }

        assert_eq!(visibles, vec![500_000, 1_000_000, 3_000_000, 500_000]);
    }

    #[test]
    #[should_panic(expected = "tier ladder must not be empty")]
    fn test_empty_tier_ladder_panics() {
        AlgoStreamingService::with_config(AlgoStreamingConfig {
            visible_tiers: Vec::new(),
            hidden_multiple: 2,
        });
    }
}
