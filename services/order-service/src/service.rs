//! DexOrderService
//!
//! Orchestrates the pure core against the remote collaborators:
//!
//! - order book: environment -> transport -> aggregation
//! - markets: (markets ‖ spam list) -> spam filter -> name resolution ->
//!   display sort -> per-address cache
//! - orders: environment -> clock correction -> signature -> transport
//!
//! Every call resolves the services environment first. Nothing here
//! retries; errors surface to the caller, except fee settings which fall
//! back to a fixed default.

use std::collections::HashMap;
use std::sync::Arc;

use futures::FutureExt;
use tracing::{debug, info, warn};

use crate::cache::MarketsCache;
use crate::environment::{EnvironmentRepository, ServicesEnvironment};
use crate::models::{CancelOrderBody, MatcherMarket, TimestampAuth};
use crate::settings::{FavoritePairsRepository, SettingsStore};
use crate::spam::SpamAssetsRepository;
use crate::transport::MatcherTransport;
use dex_core::market_filter::{SpamList, filter_spam};
use dex_core::market_sort::sort_markets;
use dex_core::order_book::aggregate;
use dex_core::pair::PairCanonicalizer;
use dex_core::search;
use dex_core::signing::{
    CreateOrderPayload, Wallet, cancel_order_signature, sign_order, timestamp_signature,
};
use types::asset::{Asset, AssetPair};
use types::errors::DexResult;
use types::fee::SettingsOrderFee;
use types::ids::{Address, AssetId, OrderId};
use types::keys::PublicKey;
use types::market::MarketPair;
use types::order::{CreateOrderParams, MyOrder};
use types::order_book::OrderBook;
use types::settings::AssetInfo;

#[derive(Clone)]
pub struct DexOrderService {
    transport: Arc<dyn MatcherTransport>,
    environment: Arc<dyn EnvironmentRepository>,
    spam: Arc<dyn SpamAssetsRepository>,
    settings: Arc<dyn SettingsStore>,
    favorites: Arc<dyn FavoritePairsRepository>,
    cache: Arc<MarketsCache>,
}

impl DexOrderService {
    pub fn new(
        transport: Arc<dyn MatcherTransport>,
        environment: Arc<dyn EnvironmentRepository>,
        spam: Arc<dyn SpamAssetsRepository>,
        settings: Arc<dyn SettingsStore>,
        favorites: Arc<dyn FavoritePairsRepository>,
    ) -> Self {
        Self {
            transport,
            environment,
            spam,
            settings,
            favorites,
            cache: Arc::new(MarketsCache::new()),
        }
    }

    pub fn cache(&self) -> &MarketsCache {
        &self.cache
    }

    async fn environment(&self) -> DexResult<ServicesEnvironment> {
        self.environment.services_environment().await
    }

    // -----------------------------------------------------------------------
    // Order book
    // -----------------------------------------------------------------------

    pub async fn fetch_order_book(&self, pair: &AssetPair) -> DexResult<OrderBook> {
        let env = self.environment().await?;
        let raw = self.transport.order_book(&env.matcher_url, pair).await?;
        let book = aggregate(&raw.bids, &raw.asks)?;
        debug!(%pair, bids = book.bids.len(), asks = book.asks.len(), "order book");
        Ok(book)
    }

    // -----------------------------------------------------------------------
    // Markets
    // -----------------------------------------------------------------------

    /// Display-ordered, spam-free markets for `address`.
    ///
    /// Served from the cache when present, with checked flags refreshed.
    /// Otherwise loaded once, however many callers ask concurrently.
    pub async fn fetch_markets(&self, address: &Address) -> DexResult<Vec<MarketPair>> {
        if self.cache.contains(address) {
            let checked = self.favorites.checked_pairs(address).await?;
            self.cache.refresh_checked(address, &checked);
            if let Some(markets) = self.cache.get(address) {
                debug!(%address, markets = markets.len(), "markets cache hit");
                return Ok(markets);
            }
        }

        let service = self.clone();
        let owner = address.clone();
        let generation = self.cache.generation(address);
        let shared = self.cache.shared_or_else(address, move || {
            service.load_markets(owner, generation).boxed()
        });
        let result = shared.await;
        self.cache.release(address);
        result
    }

    /// Drop the cached markets of `address` and load them again. A load
    /// already in flight is not joined.
    pub async fn refresh_markets(&self, address: &Address) -> DexResult<Vec<MarketPair>> {
        self.invalidate_markets(address);
        self.fetch_markets(address).await
    }

    pub fn invalidate_markets(&self, address: &Address) {
        self.cache.invalidate(address);
        info!(%address, "markets cache invalidated");
    }

    async fn load_markets(self, address: Address, generation: u64) -> DexResult<Vec<MarketPair>> {
        let env = self.environment().await?;
        let (response, spam_ids) = futures::try_join!(
            self.transport.markets(&env.matcher_url),
            self.spam.spam_assets(&address),
        )?;
        let total = response.markets.len();
        let spam: SpamList = spam_ids.into_iter().collect();
        let markets = filter_spam(response.markets, &spam);

        let (priority, infos, checked) = futures::try_join!(
            self.settings.general_priority(&address),
            self.settings.asset_infos(&address),
            self.favorites.checked_pairs(&address),
        )?;

        let resolved = markets
            .into_iter()
            .map(|market| {
                let pair = resolve_market(market, &infos);
                let is_checked = checked.contains(&pair.id());
                MarketPair { is_checked, ..pair }
            })
            .collect();
        let sorted = sort_markets(resolved, priority.ids());

        info!(
            %address,
            total,
            spam = spam.len(),
            shown = sorted.len(),
            "markets loaded"
        );
        if !self.cache.insert_loaded(address.clone(), generation, sorted.clone()) {
            debug!(%address, "markets invalidated while loading, not cached");
        }
        Ok(sorted)
    }

    /// Flip the favorite flag of `pair_id` and persist it. Returns the new
    /// state.
    pub async fn toggle_checked(&self, address: &Address, pair_id: &str) -> DexResult<bool> {
        let checked = match self.cache.toggle_checked(address, pair_id) {
            Some(checked) => checked,
            None => !self
                .favorites
                .checked_pairs(address)
                .await?
                .contains(pair_id),
        };
        if checked {
            self.favorites.save(address, pair_id).await?;
        } else {
            self.favorites.remove(address, pair_id).await?;
        }
        debug!(%address, pair_id, checked, "toggled checked pair");
        Ok(checked)
    }

    /// Markets of `address` whose assets match `text`, in display order.
    pub async fn search_markets(&self, address: &Address, text: &str) -> DexResult<Vec<MarketPair>> {
        let markets = self.fetch_markets(address).await?;
        Ok(search::search_markets(&markets, text))
    }

    /// Canonicalize `pairs` against the matcher's price-asset priority.
    pub async fn correct_pairs(&self, pairs: &[AssetPair]) -> DexResult<Vec<AssetPair>> {
        let env = self.environment().await?;
        let settings = self.transport.settings(&env.matcher_url).await?;
        Ok(PairCanonicalizer::new(&settings.price_assets).correct_pairs(pairs))
    }

    pub async fn matcher_public_key(&self) -> DexResult<PublicKey> {
        let env = self.environment().await?;
        Ok(self.transport.markets(&env.matcher_url).await?.matcher_public_key)
    }

    // -----------------------------------------------------------------------
    // Orders
    // -----------------------------------------------------------------------

    /// The wallet's orders in `market`, in the matcher's order.
    pub async fn fetch_my_orders(
        &self,
        wallet: &dyn Wallet,
        market: &MarketPair,
    ) -> DexResult<Vec<MyOrder>> {
        let env = self.environment().await?;
        let timestamp = env.clock().now()?;
        let signature = timestamp_signature(wallet, timestamp)?;
        let public_key = wallet.public_key();

        let orders = self
            .transport
            .my_orders(
                &env.matcher_url,
                &market.pair(),
                &public_key,
                &TimestampAuth {
                    timestamp,
                    signature,
                },
            )
            .await?;
        debug!(pair = %market.id(), orders = orders.len(), "my orders");

        orders
            .into_iter()
            .map(|order| order.into_my_order(&market.amount_asset, &market.price_asset))
            .collect()
    }

    pub async fn cancel_order(
        &self,
        wallet: &dyn Wallet,
        order_id: &OrderId,
        pair: &AssetPair,
    ) -> DexResult<bool> {
        let env = self.environment().await?;
        let signature = cancel_order_signature(wallet, order_id)?;
        let body = CancelOrderBody {
            order_id: order_id.clone(),
            signature,
            sender: wallet.public_key(),
        };
        let accepted = self
            .transport
            .cancel_order(&env.matcher_url, pair, &body)
            .await?;
        info!(%order_id, %pair, accepted, "cancel submitted");
        Ok(accepted)
    }

    /// Rebase the local timestamp, sign and submit. The order carries a
    /// single proof.
    pub async fn create_order(
        &self,
        wallet: &dyn Wallet,
        params: CreateOrderParams,
    ) -> DexResult<bool> {
        let env = self.environment().await?;
        let stamped = env
            .clock()
            .stamp(params.timestamp, params.expiration_minutes)?;

        let payload = CreateOrderPayload {
            sender_public_key: wallet.public_key(),
            matcher_public_key: params.matcher_public_key,
            pair: params.pair,
            order_type: params.order_type,
            price: params.price,
            amount: params.amount,
            timestamp: stamped.timestamp,
            expiration: stamped.expiration,
            matcher_fee: params.matcher_fee,
        };
        let order = sign_order(wallet, payload)?;

        let accepted = self.transport.create_order(&env.matcher_url, &order).await?;
        info!(
            pair = %order.asset_pair,
            order_type = ?order.order_type,
            timestamp = order.timestamp,
            accepted,
            "order submitted"
        );
        Ok(accepted)
    }

    // -----------------------------------------------------------------------
    // Fees
    // -----------------------------------------------------------------------

    /// Matcher fee settings. Any failure yields
    /// [`SettingsOrderFee::fallback`] instead of an error.
    pub async fn fetch_order_fee_settings(&self) -> SettingsOrderFee {
        match self.try_fetch_order_fee_settings().await {
            Ok(settings) => settings,
            Err(err) => {
                warn!(%err, "fee rates unavailable, using default fee settings");
                SettingsOrderFee::fallback()
            }
        }
    }

    async fn try_fetch_order_fee_settings(&self) -> DexResult<SettingsOrderFee> {
        let env = self.environment().await?;
        let rates = self.transport.rates(&env.matcher_url).await?;
        SettingsOrderFee::from_rates(rates)
    }
}

/// Local display names win over the matcher's.
fn resolve_asset(
    id: AssetId,
    remote_name: String,
    decimals: u32,
    infos: &HashMap<AssetId, AssetInfo>,
) -> Asset {
    match infos.get(&id) {
        Some(info) => Asset {
            name: info.display_name.clone(),
            short_name: info
                .ticker
                .clone()
                .unwrap_or_else(|| info.display_name.clone()),
            decimals,
            is_general: info.is_general,
            id,
        },
        None => Asset {
            name: remote_name.clone(),
            short_name: remote_name,
            decimals,
            is_general: false,
            id,
        },
    }
}

fn resolve_market(market: MatcherMarket, infos: &HashMap<AssetId, AssetInfo>) -> MarketPair {
    let amount_decimals = market.amount_decimals();
    let price_decimals = market.price_decimals();
    let amount = resolve_asset(
        market.amount_asset,
        market.amount_asset_name,
        amount_decimals,
        infos,
    );
    let price = resolve_asset(
        market.price_asset,
        market.price_asset_name,
        price_decimals,
        infos,
    );
    MarketPair::new(amount, price, false)
}
