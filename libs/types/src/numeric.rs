//! Integer money amounts
//!
//! The matcher speaks in integer units of an asset's smallest denomination.
//! `Money` keeps that integer and the asset decimals together so values can
//! be shown as exact decimals without floating point.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{DexError, DexResult};

/// An amount in the smallest units of an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    pub amount: i64,
    pub decimals: u32,
}

impl Money {
    pub fn new(amount: i64, decimals: u32) -> Self {
        Self { amount, decimals }
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    /// Exact decimal value, e.g. `150_000_000` with 8 decimals is `1.5`.
    pub fn to_decimal(&self) -> DexResult<Decimal> {
        Decimal::try_new(self.amount, self.decimals)
            .map_err(|e| DexError::decode(format!("money scale {}: {}", self.decimals, e)))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_decimal() {
            Ok(value) => write!(f, "{}", value),
            Err(_) => write!(f, "{}e-{}", self.amount, self.decimals),
        }
    }
}
