//! Treasury trading back-office pipeline
//!
//! Generates the four CSV inputs, wires the service graph, and drains the
//! files in order: prices, market data, trades, inquiries. Historical
//! sinks land next to the inputs.

use std::path::PathBuf;

use anyhow::Context;
use pipeline::{generate, TradingSystem};
use tracing::info;

const ROWS_PER_PRODUCT: u32 = 20;
const SEED: u64 = 20261202;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let base: PathBuf = std::env::args().nth(1).unwrap_or_else(|| ".".into()).into();
    let input_dir = base.join("data");
    let output_dir = base.join("output");

    generate::write_input_files(&input_dir, ROWS_PER_PRODUCT, SEED)
        .context("generating input files")?;
    info!(dir = %input_dir.display(), "input files generated");

    let system = TradingSystem::new(&output_dir).context("building service graph")?;
    let summary = system.run(&input_dir).context("draining inputs")?;

    info!(
        prices = summary.prices,
        order_books = summary.order_books,
        trades = summary.trades,
        inquiries = summary.inquiries,
        "pipeline complete"
    );

    let risk = system.risk.borrow();
    for bucket in risk.buckets() {
        info!(bucket = %bucket.name, pv01 = %risk.bucketed_risk(&bucket.name), "bucketed risk");
    }

    Ok(())
}
