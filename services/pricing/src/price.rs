//! Internal price representation: mid and bid/offer spread

use serde::{Deserialize, Serialize};
use soa::FieldRecord;
use types::numeric::Price;
use types::product::Bond;

/// A product price as a mid and a bid/offer spread around it.
///
/// Spread is non-negative by construction (it is a `Price`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondPrice {
    pub product: Bond,
    pub mid: Price,
    pub bid_offer_spread: Price,
}

impl BondPrice {
    pub fn new(product: Bond, mid: Price, bid_offer_spread: Price) -> Self {
        Self {
            product,
            mid,
            bid_offer_spread,
        }
    }

    /// Build from a quoted bid and offer: mid = (bid+offer)/2,
    /// spread = offer - bid.
    pub fn from_bid_offer(product: Bond, bid: Price, offer: Price) -> Self {
        Self {
            product,
            mid: Price::midpoint(bid, offer),
            bid_offer_spread: offer - bid,
        }
    }
}

impl FieldRecord for BondPrice {
    fn record_key(&self) -> String {
        self.product.product_id().to_string()
    }

    fn fields(&self) -> Vec<String> {
        vec![
            self.product.product_id().to_string(),
            self.mid.to_fractional(),
            self.bid_offer_spread.to_fractional(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::product::bond_for;

    #[test]
    fn test_from_bid_offer() {
        let bid = Price::from_fractional("99-316").unwrap();
        let offer = Price::from_fractional("100-002").unwrap();
        let price = BondPrice::from_bid_offer(bond_for("9128283H1"), bid, offer);

        assert_eq!(price.mid, Price::midpoint(bid, offer));
        assert_eq!(price.bid_offer_spread, offer - bid);
    }

    #[test]
    fn test_fields_are_fractional() {
        let bid = Price::from_fractional("99-310").unwrap();
        let offer = Price::from_fractional("100-010").unwrap();
        let price = BondPrice::from_bid_offer(bond_for("9128283H1"), bid, offer);

        let fields = price.fields();
        assert_eq!(fields[0], "9128283H1");
        assert_eq!(fields[1], "100-000");
        assert_eq!(fields[2], "0-020");
    }
}
