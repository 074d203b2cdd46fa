//! Streaming service: stores streams and publishes them downstream

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use soa::{ListenerHub, Service, ServiceListener, SharedListener};

use crate::stream::PriceStream;

/// Service publishing two-sided streams, keyed on product id.
pub struct StreamingService {
    streams: HashMap<String, PriceStream>,
    listeners: ListenerHub<PriceStream>,
}

impl StreamingService {
    pub fn new() -> Self {
        Self {
            streams: HashMap::new(),
            listeners: ListenerHub::new(),
        }
    }

    pub fn add_listener(&mut self, listener: SharedListener<PriceStream>) {
        self.listeners.add(listener);
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }
}

impl Service for StreamingService {
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

impl Default for StreamingService {
    fn default() -> Self {
        Self::new()
    }
}

/// Bridges algo streaming into the streaming service.
pub struct AlgoStreamingToStreamingListener {
    streaming: Rc<RefCell<StreamingService>>,
}

impl AlgoStreamingToStreamingListener {
    pub fn new(streaming: Rc<RefCell<StreamingService>>) -> Self {
        Self { streaming }
    }
}

impl ServiceListener<PriceStream> for AlgoStreamingToStreamingListener {
    fn process_add(&mut self, data: &PriceStream) {
        self.streaming.borrow_mut().on_message(data.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::AlgoStreamingService;
    use pricing::BondPrice;
    use types::numeric::Price;
    use types::product::bond_for;

    #[test]
    fn test_streams_flow_from_algo_to_streaming() {
        let streaming = Rc::new(RefCell::new(StreamingService::new()));
        let algo = Rc::new(RefCell::new(AlgoStreamingService::new()));
        algo.borrow_mut()
            .add_listener(Rc::new(RefCell::new(AlgoStreamingToStreamingListener::new(
                streaming.clone(),
            ))));

        let price = BondPrice::from_bid_offer(
            bond_for("912828M80"),
            Price::from_fractional("99-000").unwrap(),
            Price::from_fractional("99-010").unwrap(),
        );
        algo.borrow_mut().publish_two_way_price(&price);

        let svc = streaming.borrow();
        let stream = svc.get_data(&"912828M80".to_string()).unwrap();
        assert_eq!(stream.bid_order.visible_quantity, 1_000_000);
        assert_eq!(stream.offer_order.hidden_quantity, 2_000_000);
    }
}
