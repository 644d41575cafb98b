//! Matcher wire models
//!
//! Request and response bodies as the matcher's REST API shapes them.
//! Unknown response fields are ignored.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dex_core::order_book::RawLevel;
use types::asset::{Asset, AssetPair, HasAssetPair};
use types::errors::{DexError, DexResult};
use types::ids::{AssetId, OrderId};
use types::keys::{PublicKey, Signature};
use types::numeric::Money;
use types::order::{MyOrder, OrderStatus, OrderType};

/// Decimals assumed when the matcher omits asset info.
pub const DEFAULT_ASSET_DECIMALS: u32 = 8;

/// Fixed decimal shift of matcher prices.
pub const PRICE_CONSTANT_DECIMALS: u32 = 8;

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// `GET /matcher/orderbook/{amount}/{price}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderBookResponse {
    #[serde(default)]
    pub bids: Vec<RawLevel>,
    #[serde(default)]
    pub asks: Vec<RawLevel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct MarketAssetInfo {
    pub decimals: u32,
}

/// One entry of the matcher's market list
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatcherMarket {
    pub amount_asset: AssetId,
    #[serde(default)]
    pub amount_asset_name: String,
    #[serde(default)]
    pub amount_asset_info: Option<MarketAssetInfo>,
    pub price_asset: AssetId,
    #[serde(default)]
    pub price_asset_name: String,
    #[serde(default)]
    pub price_asset_info: Option<MarketAssetInfo>,
}

impl MatcherMarket {
    pub fn amount_decimals(&self) -> u32 {
        self.amount_asset_info
            .map_or(DEFAULT_ASSET_DECIMALS, |info| info.decimals)
    }

    pub fn price_decimals(&self) -> u32 {
        self.price_asset_info
            .map_or(DEFAULT_ASSET_DECIMALS, |info| info.decimals)
    }
}

impl HasAssetPair for MatcherMarket {
    fn amount_asset_id(&self) -> &AssetId {
        &self.amount_asset
    }

    fn price_asset_id(&self) -> &AssetId {
        &self.price_asset
    }
}

/// `GET /matcher/orderbook`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketsResponse {
    pub matcher_public_key: PublicKey,
    #[serde(default)]
    pub markets: Vec<MatcherMarket>,
}

/// `GET /matcher/settings/rates`: fee rate per asset id.
pub type RatesResponse = BTreeMap<AssetId, f64>;

/// `GET /matcher/settings`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatcherSettingsResponse {
    #[serde(default)]
    pub price_assets: Vec<AssetId>,
}

/// One of the caller's orders, `GET .../publicKey/{pk}`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatcherOrder {
    pub id: OrderId,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub status: OrderStatus,
    pub price: i64,
    pub amount: i64,
    #[serde(default)]
    pub filled: i64,
    pub timestamp: i64,
    pub asset_pair: AssetPair,
}

impl MatcherOrder {
    /// Attach display decimals of the pair's assets.
    pub fn into_my_order(self, amount_asset: &Asset, price_asset: &Asset) -> DexResult<MyOrder> {
        let time = DateTime::<Utc>::from_timestamp_millis(self.timestamp).ok_or_else(|| {
            DexError::decode(format!("order {}: timestamp {} out of range", self.id, self.timestamp))
        })?;
        let price_decimals =
            (PRICE_CONSTANT_DECIMALS + price_asset.decimals).saturating_sub(amount_asset.decimals);

        Ok(MyOrder {
            id: self.id,
            order_type: self.order_type,
            status: self.status,
            pair: self.asset_pair,
            price: Money::new(self.price, price_decimals),
            amount: Money::new(self.amount, amount_asset.decimals),
            filled: Money::new(self.filled, amount_asset.decimals),
            time,
        })
    }
}

/// `GET /utils/time` on a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct NodeTime {
    pub system: i64,
    #[serde(rename = "NTP")]
    pub ntp: i64,
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// `Timestamp` and `Signature` headers of an authenticated query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampAuth {
    pub timestamp: i64,
    pub signature: Signature,
}

/// `POST /matcher/orderbook/{amount}/{price}/cancel`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelOrderBody {
    pub order_id: OrderId,
    pub signature: Signature,
    pub sender: PublicKey,
}
