//! Pricing service: keyed store of the latest price per product

use std::collections::HashMap;

use soa::{ListenerHub, Service, SharedListener};
use tracing::debug;

use crate::price::BondPrice;

/// Service managing mid prices and bid/offer spreads, keyed on product id.
///
/// Last write wins; every ingested price dispatches one add event.
pub struct PricingService {
    prices: HashMap<String, BondPrice>,
    listeners: ListenerHub<BondPrice>,
}

impl PricingService {
    pub fn new() -> Self {
        Self {
            prices: HashMap::new(),
            listeners: ListenerHub::new(),
        }
    }

    pub fn add_listener(&mut self, listener: SharedListener<BondPrice>) {
        self.listeners.add(listener);
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

impl Service for PricingService {
    type Key = String;
    type Value = BondPrice;

    fn get_data(&self, key: &String) -> Option<&BondPrice> {
        self.prices.get(key)
    }

    fn on_message(&mut self, value: BondPrice) {
        let product_id = value.product.product_id().to_string();
        debug!(product = %product_id, mid = %value.mid, "price ingested");
        self.prices.insert(product_id, value.clone());
        self.listeners.process_add(&value);
    }
}

impl Default for PricingService {
    fn default() -> Self {
        Self::new()
    }
}
