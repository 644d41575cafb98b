//! Order-book aggregation
//!
//! Maps raw matcher levels into [`OrderBook`] one-to-one. Source order is
//! kept and equal prices are not merged.

use serde::Deserialize;

use types::errors::{DexError, DexResult};
use types::order_book::{OrderBook, OrderBookLevel};

/// A level exactly as the matcher sends it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RawLevel {
    pub price: i64,
    pub amount: i64,
}

impl RawLevel {
    pub fn new(price: i64, amount: i64) -> Self {
        Self { price, amount }
    }
}

fn level(side: &str, index: usize, raw: &RawLevel) -> DexResult<OrderBookLevel> {
    if raw.price < 0 || raw.amount < 0 {
        return Err(DexError::decode(format!(
            "{} level {}: negative price {} or amount {}",
            side, index, raw.price, raw.amount
        )));
    }
    Ok(OrderBookLevel {
        price: raw.price,
        amount: raw.amount,
    })
}

fn side(name: &str, raw: &[RawLevel]) -> DexResult<Vec<OrderBookLevel>> {
    raw.iter()
        .enumerate()
        .map(|(index, raw)| level(name, index, raw))
        .collect()
}

/// Build an [`OrderBook`] from raw bids and asks.
///
/// A malformed level fails the whole book.
pub fn aggregate(raw_bids: &[RawLevel], raw_asks: &[RawLevel]) -> DexResult<OrderBook> {
    Ok(OrderBook {
        bids: side("bid", raw_bids)?,
        asks: side("ask", raw_asks)?,
    })
}
