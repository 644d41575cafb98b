//! Order book snapshot types

use serde::{Deserialize, Serialize};

/// One price level, in matcher integer units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderBookLevel {
    pub price: i64,
    pub amount: i64,
}

/// Bids and asks in the order the matcher sent them.
///
/// Levels are never merged or re-sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBook {
    pub bids: Vec<OrderBookLevel>,
    pub asks: Vec<OrderBookLevel>,
}

impl OrderBook {
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    /// First bid as received (the matcher sends best first)
    pub fn top_bid(&self) -> Option<&OrderBookLevel> {
        self.bids.first()
    }

    /// First ask as received
    pub fn top_ask(&self) -> Option<&OrderBookLevel> {
        self.asks.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_book() {
        let book = OrderBook::default();
        assert!(book.is_empty());
        assert!(book.top_bid().is_none());
    }

    #[test]
    fn test_top_levels_follow_source_order() {
        let book = OrderBook {
            bids: vec![
                OrderBookLevel { price: 90, amount: 1 },
                OrderBookLevel { price: 95, amount: 2 },
            ],
            asks: vec![OrderBookLevel { price: 100, amount: 3 }],
        };
        assert_eq!(book.top_bid().unwrap().price, 90);
        assert_eq!(book.top_ask().unwrap().amount, 3);
    }
}
