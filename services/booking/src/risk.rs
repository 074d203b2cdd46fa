//! PV01 risk roll-up
//!
//! Per-product risk is |aggregate position| × PV01 per unit notional.
//! Bucketed risk sums the per-product values over a named sector.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use soa::{FieldRecord, ListenerHub, Service, ServiceListener, SharedListener};
use tracing::debug;
use types::product::{pv01_per_unit, Bond};

use crate::position::Position;

/// PV01 risk carried in one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pv01 {
    pub product: Bond,
    pub pv01: Decimal,
    pub quantity: i64,
}

impl Pv01 {
    pub fn new(product: Bond, pv01: Decimal, quantity: i64) -> Self {
        Self {
            product,
            pv01,
            quantity,
        }
    }
}

impl FieldRecord for Pv01 {
    fn record_key(&self) -> String {
        self.product.product_id().to_string()
    }

    fn fields(&self) -> Vec<String> {
        vec![
            self.product.product_id().to_string(),
            self.pv01.to_string(),
            self.quantity.to_string(),
        ]
    }
}

/// A named group of products whose risks are summed for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskBucket {
    pub name: String,
    pub members: Vec<String>,
}

impl RiskBucket {
    pub fn new(name: impl Into<String>, members: &[&str]) -> Self {
        Self {
            name: name.into(),
            members: members.iter().map(|m| m.to_string()).collect(),
        }
    }
}

/// Default sector partition of the Treasury curve.
pub fn default_buckets() -> Vec<RiskBucket> {
    vec![
        RiskBucket::new("FrontEnd", &["9128283H1", "9128283L2", "912828M80"]),
        RiskBucket::new("LongEnd", &["9128283J7", "9128283F5", "912810RZ3"]),
    ]
}

/// Computes and stores PV01 risk, keyed on product id.
pub struct RiskService {
    risks: HashMap<String, Pv01>,
    buckets: Vec<RiskBucket>,
    listeners: ListenerHub<Pv01>,
}

impl RiskService {
    pub fn new() -> Self {
        Self::with_buckets(default_buckets())
    }

    pub fn with_buckets(buckets: Vec<RiskBucket>) -> Self {
        Self {
            risks: HashMap::new(),
            buckets,
            listeners: ListenerHub::new(),
        }
    }

    pub fn add_listener(&mut self, listener: SharedListener<Pv01>) {
        self.listeners.add(listener);
    }

    pub fn buckets(&self) -> &[RiskBucket] {
        &self.buckets
    }

    /// Recompute a product's risk from its updated position.
    pub fn add_position(&mut self, position: &Position) {
        let product_id = position.product.product_id().to_string();
        let aggregate = position.aggregate();
        let risk_value = Decimal::from(aggregate.abs()) * pv01_per_unit(&product_id);

        let pv01 = Pv01::new(position.product.clone(), risk_value, aggregate);
        debug!(product = %product_id, risk = %risk_value, "risk updated");
        self.risks.insert(product_id, pv01.clone());
        self.listeners.process_add(&pv01);
    }

    /// Total risk carried across a named bucket's members.
    pub fn bucketed_risk(&self, bucket_name: &str) -> Decimal {
        let Some(bucket) = self.buckets.iter().find(|b| b.name == bucket_name) else {
            return Decimal::ZERO;
        };
        bucket
            .members
            .iter()
            .filter_map(|cusip| self.risks.get(cusip))
            .fold(Decimal::ZERO, |acc, pv01| acc + pv01.pv01)
    }
}

impl Service for RiskService {
    type Key = String;
    type Value = Pv01;

    fn get_data(&self, key: &String) -> Option<&Pv01> {
        self.risks.get(key)
    }

    fn on_message(&mut self, value: Pv01) {
        self.risks
            .insert(value.product.product_id().to_string(), value.clone());
        self.listeners.process_add(&value);
    }
}

impl Default for RiskService {
    fn default() -> Self {
        Self::new()
    }
}

/// Bridges position keeping into the risk roll-up.
pub struct PositionToRiskListener {
    risk: Rc<RefCell<RiskService>>,
}

impl PositionToRiskListener {
    pub fn new(risk: Rc<RefCell<RiskService>>) -> Self {
        Self { risk }
    }
}

impl ServiceListener<Position> for PositionToRiskListener {
    fn process_add(&mut self, data: &Position) {
        self.risk.borrow_mut().add_position(data);
    }
}
