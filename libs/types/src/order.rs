//! Order lifecycle types
//!
//! Parameters a caller supplies, the signed order submitted to the matcher,
//! and the matcher's view of the caller's own orders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::asset::AssetPair;
use crate::ids::OrderId;
use crate::keys::{PublicKey, Signature};
use crate::numeric::Money;

/// Version marker of the signed order layout.
pub const ORDER_VERSION: u8 = 2;

/// Order direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Buy,
    Sell,
}

impl OrderType {
    /// Byte written into the signed order payload
    pub fn as_byte(&self) -> u8 {
        match self {
            OrderType::Buy => 0,
            OrderType::Sell => 1,
        }
    }
}

/// Order status as reported by the matcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Accepted,
    PartiallyFilled,
    Filled,
    Cancelled,
}

impl OrderStatus {
    /// Still resting on the book
    pub fn is_active(&self) -> bool {
        matches!(self, OrderStatus::Accepted | OrderStatus::PartiallyFilled)
    }
}

/// Caller-supplied parameters for a new order.
///
/// `timestamp` is the local clock in unix millis; the service rebases it
/// onto matcher time before signing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOrderParams {
    pub matcher_public_key: PublicKey,
    pub pair: AssetPair,
    pub order_type: OrderType,
    pub price: i64,
    pub amount: i64,
    pub matcher_fee: i64,
    pub timestamp: i64,
    pub expiration_minutes: i64,
}

/// A signed order, serialized as the matcher's create-order body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub version: u8,
    pub sender_public_key: PublicKey,
    pub matcher_public_key: PublicKey,
    pub asset_pair: AssetPair,
    pub order_type: OrderType,
    pub price: i64,
    pub amount: i64,
    pub timestamp: i64,
    pub expiration: i64,
    pub matcher_fee: i64,
    pub proofs: Vec<Signature>,
}

/// One of the caller's orders as tracked by the matcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MyOrder {
    pub id: OrderId,
    pub order_type: OrderType,
    pub status: OrderStatus,
    pub pair: AssetPair,
    pub price: Money,
    pub amount: Money,
    pub filled: Money,
    pub time: DateTime<Utc>,
}

impl MyOrder {
    /// Unfilled amount, never negative.
    pub fn remaining(&self) -> Money {
        Money::new(
            self.amount.amount.saturating_sub(self.filled.amount).max(0),
            self.amount.decimals,
        )
    }
}
