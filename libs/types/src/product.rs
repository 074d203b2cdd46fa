//! Bond reference data
//!
//! Fixed table of on-the-run U.S. Treasury instruments keyed by CUSIP.
//! Lookups for an unknown CUSIP return a default bond with empty fields so
//! downstream services can proceed.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A U.S. Treasury bond identified by CUSIP.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bond {
    pub cusip: String,
    pub ticker: String,
    pub coupon: Decimal,
    pub maturity: Option<NaiveDate>,
}

impl Bond {
    pub fn new(
        cusip: impl Into<String>,
        ticker: impl Into<String>,
        coupon: Decimal,
        maturity: NaiveDate,
    ) -> Self {
        Self {
            cusip: cusip.into(),
            ticker: ticker.into(),
            coupon,
            maturity: Some(maturity),
        }
    }

    /// Identifier this product is keyed on throughout the pipeline.
    pub fn product_id(&self) -> &str {
        &self.cusip
    }
}

impl fmt::Display for Bond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.cusip, self.ticker)
    }
}

/// CUSIPs of the six on-the-run Treasuries, front end first.
pub const TREASURY_CUSIPS: [&str; 6] = [
    "9128283H1", // US2Y
    "9128283L2", // US3Y
    "912828M80", // US5Y
    "9128283J7", // US7Y
    "9128283F5", // US10Y
    "912810RZ3", // US30Y
];

/// Look up the reference bond for a CUSIP.
///
/// Unknown CUSIPs yield `Bond::default()` with empty fields.
pub fn bond_for(cusip: &str) -> Bond {
    let entry = |ticker: &str, coupon: &str, y: i32, m: u32, d: u32| {
        Bond::new(
            cusip,
            ticker,
            Decimal::from_str_exact(coupon).unwrap(),
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
        )
    };

    match cusip {
        "9128283H1" => entry("US2Y", "0.01750", 2019, 11, 30),
        "9128283L2" => entry("US3Y", "0.01875", 2020, 12, 15),
        "912828M80" => entry("US5Y", "0.02000", 2022, 11, 30),
        "9128283J7" => entry("US7Y", "0.02125", 2024, 11, 30),
        "9128283F5" => entry("US10Y", "0.02250", 2027, 12, 15),
        "912810RZ3" => entry("US30Y", "0.02750", 2047, 12, 15),
        _ => Bond::default(),
    }
}

/// PV01 per unit notional for a CUSIP; zero for unknown products.
pub fn pv01_per_unit(cusip: &str) -> Decimal {
    let v = |s: &str| Decimal::from_str_exact(s).unwrap();
    match cusip {
        "9128283H1" => v("0.01948992"),
        "9128283L2" => v("0.02865304"),
        "912828M80" => v("0.04581119"),
        "9128283J7" => v("0.06127718"),
        "9128283F5" => v("0.08161449"),
        "912810RZ3" => v("0.15013155"),
        _ => Decimal::ZERO,
    }
}
