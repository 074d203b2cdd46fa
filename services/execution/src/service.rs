//! Execution service: order store with explicit dispatch

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use soa::{ListenerHub, Service, ServiceListener, SharedListener};
use tracing::info;

use crate::order::ExecutionOrder;

/// Service for executing orders on an exchange, keyed on product id.
///
/// `on_message` only stores; listeners hear about an order solely through
/// [`ExecutionService::execute_order`].
pub struct ExecutionService {
    execution_orders: HashMap<String, ExecutionOrder>,
    listeners: ListenerHub<ExecutionOrder>,
}

impl ExecutionService {
    pub fn new() -> Self {
        Self {
            execution_orders: HashMap::new(),
            listeners: ListenerHub::new(),
        }
    }

    pub fn add_listener(&mut self, listener: SharedListener<ExecutionOrder>) {
        self.listeners.add(listener);
    }

    /// Place an order: store it and dispatch to listeners.
    pub fn execute_order(&mut self, order: ExecutionOrder) {
        info!(
            product = %order.product.product_id(),
            order_id = %order.order_id,
            side = %order.side,
            "order executed"
        );
        self.execution_orders
            .insert(order.product.product_id().to_string(), order.clone());
        self.listeners.process_add(&order);
    }
}

impl Service for ExecutionService {
    type Key = String;
    type Value = ExecutionOrder;

    fn get_data(&self, key: &String) -> Option<&ExecutionOrder> {
        self.execution_orders.get(key)
    }

    fn on_message(&mut self, value: ExecutionOrder) {
        self.execution_orders
            .insert(value.product.product_id().to_string(), value);
    }
}

impl Default for ExecutionService {
    fn default() -> Self {
        Self::new()
    }
}

/// Bridges algo execution into the execution service.
pub struct AlgoExecutionToExecutionListener {
    execution: Rc<RefCell<ExecutionService>>,
}

impl AlgoExecutionToExecutionListener {
    pub fn new(execution: Rc<RefCell<ExecutionService>>) -> Self {
        Self { execution }
    }
}

impl ServiceListener<ExecutionOrder> for AlgoExecutionToExecutionListener {
    fn process_add(&mut self, data: &ExecutionOrder) {
        self.execution.borrow_mut().execute_order(data.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::numeric::Price;
    use types::product::bond_for;
    use types::side::PricingSide;

    struct CountingListener {
        count: Rc<RefCell<usize>>,
    }

    impl ServiceListener<ExecutionOrder> for CountingListener {
        fn process_add(&mut self, _data: &ExecutionOrder) {
            *self.count.borrow_mut() += 1;
        }
    }

    fn order() -> ExecutionOrder {
        ExecutionOrder::market(
            bond_for("9128283F5"),
            PricingSide::Bid,
            types::ids::OrderId::from("ORDER1SAMPLE"),
            Price::from_fractional("99-316").unwrap(),
            1_000_000,
        )
    }

    #[test]
    fn test_on_message_stores_without_dispatch() {
        let count = Rc::new(RefCell::new(0));
        let mut service = ExecutionService::new();
        service.add_listener(Rc::new(RefCell::new(CountingListener {
            count: count.clone(),
        })));

        service.on_message(order());

        assert!(service.get_data(&"9128283F5".to_string()).is_some());
        assert_eq!(*count.borrow(), 0);
    }

    #[test]
    fn test_execute_order_stores_and_dispatches() {
        let count = Rc::new(RefCell::new(0));
        let mut service = ExecutionService::new();
        service.add_listener(Rc::new(RefCell::new(CountingListener {
            count: count.clone(),
        })));

        service.execute_order(order());

        assert!(service.get_data(&"9128283F5".to_string()).is_some());
        assert_eq!(*count.borrow(), 1);
    }
}
