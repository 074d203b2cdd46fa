//! Service-oriented substrate for the trading pipeline
//!
//! Every trading service is a keyed store of domain values that receives
//! updates through `on_message` and fans them out to typed listeners.
//! Connectors sit at the edges: subscribe-side connectors read rows from a
//! file and push values into their owning service, publish-side connectors
//! emit values outward.
//!
//! The pipeline is single-threaded and synchronous. Services and listeners
//! are shared as `Rc<RefCell<_>>`; one ingress row is driven through every
//! transitive listener callback before the next row is read, so no locking
//! is needed anywhere.

use std::cell::RefCell;
use std::rc::Rc;

/// A keyed store of domain values with a typed ingress path.
pub trait Service {
    type Key;
    type Value;

    /// Look up the current entity for a key, if one has been ingested.
    fn get_data(&self, key: &Self::Key) -> Option<&Self::Value>;

    /// Ingress path invoked by a connector or an upstream listener.
    fn on_message(&mut self, value: Self::Value);
}

/// Callback interface for reacting to service events.
///
/// Only `process_add` is driven by the pipeline; update and remove events
/// exist in the contract and default to no-ops.
pub trait ServiceListener<V> {
    fn process_add(&mut self, data: &V);

    fn process_update(&mut self, _data: &V) {}

    fn process_remove(&mut self, _data: &V) {}
}

/// Egress adapter for a service.
///
/// Subscribe-side connectors expose their own reader methods (sources
/// differ per service); `publish` defaults to a no-op for subscribe-only
/// connectors.
pub trait Connector<V> {
    fn publish(&mut self, _value: &V) {}
}

/// A value that can be flattened into a text record for the historical
/// sinks: a store key plus its fields in definition order.
pub trait FieldRecord {
    /// Key the sink stores this record under.
    fn record_key(&self) -> String;

    /// The entity's fields, in definition order.
    fn fields(&self) -> Vec<String>;
}

/// Shared handle to a listener.
pub type SharedListener<V> = Rc<RefCell<dyn ServiceListener<V>>>;

/// Listener registry embedded in each service.
///
/// Dispatch iterates in registration order; listeners are referenced, not
/// owned, so the same listener can bridge several services.
pub struct ListenerHub<V> {
    listeners: Vec<SharedListener<V>>,
}

impl<V> ListenerHub<V> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Register a listener. Order of registration is preserved.
    pub fn add(&mut self, listener: SharedListener<V>) {
        self.listeners.push(listener);
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Dispatch an add event to every listener in registration order.
    pub fn process_add(&self, data: &V) {
        for listener in &self.listeners {
            listener.borrow_mut().process_add(data);
        }
    }

    /// Dispatch an update event to every listener in registration order.
    pub fn process_update(&self, data: &V) {
        for listener in &self.listeners {
            listener.borrow_mut().process_update(data);
        }
    }

    /// Dispatch a remove event to every listener in registration order.
    pub fn process_remove(&self, data: &V) {
        for listener in &self.listeners {
            listener.borrow_mut().process_remove(data);
        }
    }
}

impl<V> Default for ListenerHub<V> {
    fn default() -> Self {
        Self::new()
    }
}
