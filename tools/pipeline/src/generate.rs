//! Input file generation
//!
//! Produces the four CSV inputs over the six on-the-run Treasuries:
//! oscillating fractional price ladders, fixed-depth order books whose
//! top-of-book spread periodically collapses to the crossing trigger,
//! round-robin booked trades, and received inquiries.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use types::ids::IdGenerator;
use types::numeric::Price;
use types::product::TREASURY_CUSIPS;

/// Price in 1/256 units above a 99-point floor.
fn ladder_price(units256: i64) -> Price {
    Price::new(Decimal::from(99) + Decimal::from(units256) / Decimal::from(256))
}

/// Triangle oscillation between one and three whole points above the
/// ladder floor, in 1/256 ticks.
fn triangle(step: i64) -> i64 {
    let phase = step % 1024;
    let wave = if phase < 512 { phase } else { 1024 - phase };
    256 + wave
}

/// Write `rows_per_product` price rows per product.
///
/// The mid walks a 100..102 triangle in 1/256 ticks; the bid/offer spread
/// alternates randomly between 1/128 and 1/64.
pub fn write_price_file(path: &Path, rows_per_product: u32, seed: u64) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    let mut rng = StdRng::seed_from_u64(seed);

    for cusip in TREASURY_CUSIPS {
        for i in 0..rows_per_product {
            let mid_units = triangle(i as i64);
            let half_spread = if rng.gen_bool(0.5) { 1 } else { 2 };
            let bid = ladder_price(mid_units - half_spread);
            let offer = ladder_price(mid_units + half_spread);
            writeln!(
                out,
                "{},{},{}",
                cusip,
                bid.to_fractional(),
                offer.to_fractional()
            )?;
        }
    }
    out.flush()
}

/// Write `books_per_product` order books per product, 5 bids then
/// 5 offers each.
///
/// The top-of-book spread cycles 1/128, 1/64, 3/128, 1/32 so every fourth
/// book triggers a cross; deeper levels step away by 1/128 with sizes
/// 10M..50M.
pub fn write_market_data_file(path: &Path, books_per_product: u32) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);

    for cusip in TREASURY_CUSIPS {
        for book in 0..books_per_product {
            let mid_units = triangle(book as i64);
            let half_spread = 1 + (book as i64 % 4);

            for level in 0..5i64 {
                let price = ladder_price(mid_units - half_spread - 2 * level);
                let quantity = 10_000_000 * (level + 1);
                writeln!(out, "{},{},{},BID", cusip, price.to_fractional(), quantity)?;
            }
            for level in 0..5i64 {
                let price = ladder_price(mid_units + half_spread + 2 * level);
                let quantity = 10_000_000 * (level + 1);
                writeln!(out, "{},{},{},OFFER", cusip, price.to_fractional(), quantity)?;
            }
        }
    }
    out.flush()
}

/// Write `trades_per_product` trades per product: alternating Buy/Sell,
/// books assigned round-robin, quantities cycling 1M..5M.
pub fn write_trade_file(path: &Path, trades_per_product: u32, seed: u64) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    let mut ids = IdGenerator::from_seed(seed);
    let books = ["TRSY1", "TRSY2", "TRSY3"];

    for cusip in TREASURY_CUSIPS {
        for i in 0..trades_per_product {
            let side = if i % 2 == 0 { "BUY" } else { "SELL" };
            let price = if i % 2 == 0 { "99-000" } else { "100-000" };
            let quantity = 1_000_000 * (i as i64 % 5 + 1);
            writeln!(
                out,
                "{},{},{},{},{},{}",
                cusip,
                ids.next_trade_id(),
                price,
                books[i as usize % books.len()],
                quantity,
                side
            )?;
        }
    }
    out.flush()
}

/// Write `inquiries_per_product` received inquiries per product.
pub fn write_inquiry_file(path: &Path, inquiries_per_product: u32, seed: u64) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    let mut ids = IdGenerator::from_seed(seed);

    for cusip in TREASURY_CUSIPS {
        for i in 0..inquiries_per_product {
            let side = if i % 2 == 0 { "BUY" } else { "SELL" };
            let quantity = 1_000_000 * (i as i64 % 5 + 1);
            writeln!(
                out,
                "{},{},{},{},100-000,RECEIVED",
                ids.next_inquiry_id(),
                cusip,
                side,
                quantity
            )?;
        }
    }
    out.flush()
}

/// Generate all four input files under one directory.
pub fn write_input_files(
    dir: &Path,
    rows_per_product: u32,
    seed: u64,
) -> io::Result<()> {
    std::fs::create_dir_all(dir)?;
    write_price_file(&dir.join("prices.csv"), rows_per_product, seed)?;
    write_market_data_file(&dir.join("marketdata.csv"), rows_per_product)?;
    write_trade_file(&dir.join("trades.csv"), rows_per_product.min(10), seed)?;
    write_inquiry_file(&dir.join("inquiries.csv"), rows_per_product.min(10), seed)?;
    Ok(())
}
