//! Matcher transport
//!
//! [`MatcherTransport`] is the seam between the service and the matcher's
//! REST API. Every method takes the matcher base URL resolved from the
//! current services environment. No retries happen at this layer.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::from_reqwest;
use crate::models::{
    CancelOrderBody, MarketsResponse, MatcherOrder, MatcherSettingsResponse, OrderBookResponse,
    RatesResponse, TimestampAuth,
};
use types::asset::AssetPair;
use types::errors::DexResult;
use types::keys::PublicKey;
use types::order::Order;

#[async_trait]
pub trait MatcherTransport: Send + Sync {
    async fn order_book(&self, matcher_url: &str, pair: &AssetPair)
    -> DexResult<OrderBookResponse>;

    async fn markets(&self, matcher_url: &str) -> DexResult<MarketsResponse>;

    async fn rates(&self, matcher_url: &str) -> DexResult<RatesResponse>;

    async fn settings(&self, matcher_url: &str) -> DexResult<MatcherSettingsResponse>;

    async fn my_orders(
        &self,
        matcher_url: &str,
        pair: &AssetPair,
        public_key: &PublicKey,
        auth: &TimestampAuth,
    ) -> DexResult<Vec<MatcherOrder>>;

    /// `Ok(false)` when the matcher answers but rejects the order.
    async fn create_order(&self, matcher_url: &str, order: &Order) -> DexResult<bool>;

    /// `Ok(false)` when the matcher answers but rejects the cancel.
    async fn cancel_order(
        &self,
        matcher_url: &str,
        pair: &AssetPair,
        body: &CancelOrderBody,
    ) -> DexResult<bool>;
}

fn orderbook_url(matcher_url: &str, pair: &AssetPair) -> String {
    format!(
        "{}/matcher/orderbook/{}/{}",
        matcher_url.trim_end_matches('/'),
        pair.amount_asset,
        pair.price_asset
    )
}

fn matcher_path(matcher_url: &str, path: &str) -> String {
    format!("{}{}", matcher_url.trim_end_matches('/'), path)
}

/// [`MatcherTransport`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpMatcherTransport {
    client: Client,
}

impl HttpMatcherTransport {
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> DexResult<T> {
        debug!(%url, "GET");
        self.client
            .get(url)
            .send()
            .await
            .and_then(Response::error_for_status)
            .map_err(from_reqwest)?
            .json::<T>()
            .await
            .map_err(from_reqwest)
    }

    async fn accepted(response: Response, what: &str) -> bool {
        let status = response.status();
        if status.is_success() {
            return true;
        }
        let body = response.text().await.unwrap_or_default();
        warn!(%status, %body, "matcher rejected {}", what);
        false
    }
}

#[async_trait]
impl MatcherTransport for HttpMatcherTransport {
    async fn order_book(
        &self,
        matcher_url: &str,
        pair: &AssetPair,
    ) -> DexResult<OrderBookResponse> {
        self.get_json(&orderbook_url(matcher_url, pair)).await
    }

    async fn markets(&self, matcher_url: &str) -> DexResult<MarketsResponse> {
        self.get_json(&matcher_path(matcher_url, "/matcher/orderbook"))
            .await
    }

    async fn rates(&self, matcher_url: &str) -> DexResult<RatesResponse> {
        self.get_json(&matcher_path(matcher_url, "/matcher/settings/rates"))
            .await
    }

    async fn settings(&self, matcher_url: &str) -> DexResult<MatcherSettingsResponse> {
        self.get_json(&matcher_path(matcher_url, "/matcher/settings"))
            .await
    }

    async fn my_orders(
        &self,
        matcher_url: &str,
        pair: &AssetPair,
        public_key: &PublicKey,
        auth: &TimestampAuth,
    ) -> DexResult<Vec<MatcherOrder>> {
        let url = format!(
            "{}/publicKey/{}",
            orderbook_url(matcher_url, pair),
            public_key
        );
        debug!(%url, timestamp = auth.timestamp, "GET (signed)");
        self.client
            .get(&url)
            .header("Timestamp", auth.timestamp.to_string())
            .header("Signature", auth.signature.to_base58())
            .send()
            .await
            .and_then(Response::error_for_status)
            .map_err(from_reqwest)?
            .json::<Vec<MatcherOrder>>()
            .await
            .map_err(from_reqwest)
    }

    async fn create_order(&self, matcher_url: &str, order: &Order) -> DexResult<bool> {
        let url = matcher_path(matcher_url, "/matcher/orderbook");
        debug!(%url, pair = %order.asset_pair, "POST order");
        let response = self
            .client
            .post(&url)
            .json(order)
            .send()
            .await
            .map_err(from_reqwest)?;
        Ok(Self::accepted(response, "order").await)
    }

    async fn cancel_order(
        &self,
        matcher_url: &str,
        pair: &AssetPair,
        body: &CancelOrderBody,
    ) -> DexResult<bool> {
        let url = format!("{}/cancel", orderbook_url(matcher_url, pair));
        debug!(%url, order_id = %body.order_id, "POST cancel");
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(from_reqwest)?;
        Ok(Self::accepted(response, "cancel").await)
    }
}
