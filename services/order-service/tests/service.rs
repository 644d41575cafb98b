//! DexOrderService against in-memory collaborators
//!
//! Covers:
//! - Market listing: spam filtering, display order, name resolution
//! - Single-flight loading, cache refresh and failed loads
//! - Checked pairs
//! - Signed create/cancel/my-orders requests
//! - Fee settings fallback

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use dex_core::clock::local_now_millis;
use dex_core::order_book::RawLevel;
use dex_core::signing::{
    CreateOrderPayload, Ed25519Wallet, Wallet, cancel_order_bytes, timestamp_bytes, verify,
};
use order_service::DexOrderService;
use order_service::environment::{ServicesEnvironment, StaticEnvironmentRepository};
use order_service::models::{
    CancelOrderBody, MarketsResponse, MatcherMarket, MatcherOrder, MatcherSettingsResponse,
    OrderBookResponse, RatesResponse, TimestampAuth,
};
use order_service::settings::InMemorySettingsStore;
use order_service::spam::{SpamAssetsRepository, StaticSpamAssetsRepository};
use order_service::transport::MatcherTransport;
use types::asset::AssetPair;
use types::errors::{DexError, DexResult};
use types::fee::SettingsOrderFee;
use types::ids::{Address, AssetId, OrderId};
use types::keys::PublicKey;
use types::order::{CreateOrderParams, Order, OrderStatus, OrderType};

const MATCHER_URL: &str = "http://matcher.test";
const SERVER_DIFF: i64 = 50;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

#[derive(Default)]
struct MockMatcher {
    markets: Vec<MatcherMarket>,
    relisted: Vec<MatcherMarket>,
    markets_down: bool,
    markets_delay: Option<Duration>,
    market_calls: AtomicUsize,
    rates: Option<RatesResponse>,
    price_assets: Vec<AssetId>,
    order_book: OrderBookResponse,
    my_orders: Vec<MatcherOrder>,
    created: Mutex<Vec<Order>>,
    cancelled: Mutex<Vec<CancelOrderBody>>,
    my_orders_auth: Mutex<Option<TimestampAuth>>,
}

#[async_trait]
impl MatcherTransport for MockMatcher {
    async fn order_book(&self, matcher_url: &str, _pair: &AssetPair) -> DexResult<OrderBookResponse> {
        assert_eq!(matcher_url, MATCHER_URL);
        Ok(self.order_book.clone())
    }

    async fn markets(&self, _matcher_url: &str) -> DexResult<MarketsResponse> {
        let call = self.market_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.markets_delay {
            tokio::time::sleep(delay).await;
        }
        if self.markets_down {
            return Err(DexError::network("matcher down"));
        }
        let markets = if call > 0 && !self.relisted.is_empty() {
            &self.relisted
        } else {
            &self.markets
        };
        Ok(MarketsResponse {
            matcher_public_key: matcher_key(),
            markets: markets.clone(),
        })
    }

    async fn rates(&self, _matcher_url: &str) -> DexResult<RatesResponse> {
        self.rates
            .clone()
            .ok_or_else(|| DexError::network("connection refused"))
    }

    async fn settings(&self, _matcher_url: &str) -> DexResult<MatcherSettingsResponse> {
        Ok(MatcherSettingsResponse {
            price_assets: self.price_assets.clone(),
        })
    }

    async fn my_orders(
        &self,
        _matcher_url: &str,
        _pair: &AssetPair,
        _public_key: &PublicKey,
        auth: &TimestampAuth,
    ) -> DexResult<Vec<MatcherOrder>> {
        *self.my_orders_auth.lock().unwrap() = Some(*auth);
        Ok(self.my_orders.clone())
    }

    async fn create_order(&self, _matcher_url: &str, order: &Order) -> DexResult<bool> {
        self.created.lock().unwrap().push(order.clone());
        Ok(true)
    }

    async fn cancel_order(
        &self,
        _matcher_url: &str,
        _pair: &AssetPair,
        body: &CancelOrderBody,
    ) -> DexResult<bool> {
        self.cancelled.lock().unwrap().push(body.clone());
        Ok(true)
    }
}

struct UnreachableSpamList;

#[async_trait]
impl SpamAssetsRepository for UnreachableSpamList {
    async fn spam_assets(&self, _address: &Address) -> DexResult<Vec<AssetId>> {
        Err(DexError::network("spam list down"))
    }
}

fn matcher_key() -> PublicKey {
    Ed25519Wallet::from_seed(Address::new("matcher"), [9u8; 32]).public_key()
}

fn wallet() -> Ed25519Wallet {
    Ed25519Wallet::from_seed(Address::new("3PAddress"), [7u8; 32])
}

fn address() -> Address {
    Address::new("3PAddress")
}

fn market(amount: &str, price: &str) -> MatcherMarket {
    MatcherMarket {
        amount_asset: AssetId::new(amount),
        amount_asset_name: format!("{} name", amount),
        amount_asset_info: None,
        price_asset: AssetId::new(price),
        price_asset_name: format!("{} name", price),
        price_asset_info: None,
    }
}

const SETTINGS: &str = r#"{
    "assets": [
        {"id": "WAVES", "displayName": "Waves", "ticker": "WAVES", "isGeneral": true},
        {"id": "USDN", "displayName": "Neutrino USD", "ticker": "USDN", "isGeneral": true},
        {"id": "BTC", "displayName": "Bitcoin", "ticker": "BTC", "isGeneral": true}
    ],
    "generalAssets": [
        {"assetId": "WAVES", "sortLevel": 0},
        {"assetId": "BTC", "sortLevel": 1},
        {"assetId": "USDN", "sortLevel": 2}
    ],
    "checkedPairs": ["BTC/USDN"]
}"#;

fn service_with(matcher: Arc<MockMatcher>, spam: Vec<&str>) -> DexOrderService {
    service_with_spam(
        matcher,
        Arc::new(StaticSpamAssetsRepository::new(
            spam.into_iter().map(AssetId::new).collect(),
        )),
    )
}

fn service_with_spam(
    matcher: Arc<MockMatcher>,
    spam: Arc<dyn SpamAssetsRepository>,
) -> DexOrderService {
    let settings = Arc::new(InMemorySettingsStore::from_json(SETTINGS).unwrap());
    DexOrderService::new(
        matcher,
        Arc::new(StaticEnvironmentRepository::new(ServicesEnvironment::new(
            MATCHER_URL,
            SERVER_DIFF,
        ))),
        spam,
        settings.clone(),
        settings,
    )
}

fn listed_matcher() -> MockMatcher {
    MockMatcher {
        markets: vec![
            market("SCAM", "WAVES"),
            market("ETH", "LTC"),
            market("BTC", "USDN"),
            market("WAVES", "USDN"),
            market("USDN", "SCAM"),
        ],
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Markets
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_markets_filtered_sorted_and_resolved() {
    let service = service_with(Arc::new(listed_matcher()), vec!["SCAM"]);
    let markets = service.fetch_markets(&address()).await.unwrap();

    let ids: Vec<String> = markets.iter().map(|m| m.id()).collect();
    assert_eq!(ids, vec!["WAVES/USDN", "BTC/USDN", "ETH/LTC"]);

    assert_eq!(markets[0].amount_asset.name, "Waves");
    assert!(markets[0].is_general);
    assert_eq!(markets[2].amount_asset.name, "ETH name");
    assert!(!markets[2].is_general);
    assert!(markets[1].is_checked);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_fetches_share_one_load() {
    let matcher = Arc::new(MockMatcher {
        markets_delay: Some(Duration::from_millis(100)),
        ..listed_matcher()
    });
    let service = service_with(matcher.clone(), vec![]);

    let addr = address();
    let (first, second, third) = tokio::join!(
        service.fetch_markets(&addr),
        service.fetch_markets(&addr),
        service.fetch_markets(&addr),
    );
    assert_eq!(first.unwrap(), second.as_ref().unwrap().clone());
    assert_eq!(third.unwrap().len(), 5);
    assert_eq!(matcher.market_calls.load(Ordering::SeqCst), 1);
    assert_eq!(service.cache().in_flight_len(), 0);
}

#[tokio::test]
async fn test_cache_hit_and_refresh() {
    let matcher = Arc::new(listed_matcher());
    let service = service_with(matcher.clone(), vec![]);

    service.fetch_markets(&address()).await.unwrap();
    service.fetch_markets(&address()).await.unwrap();
    assert_eq!(matcher.market_calls.load(Ordering::SeqCst), 1);

    service.refresh_markets(&address()).await.unwrap();
    assert_eq!(matcher.market_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_refresh_does_not_join_older_load() {
    let matcher = Arc::new(MockMatcher {
        relisted: vec![market("ETH", "LTC")],
        markets_delay: Some(Duration::from_millis(100)),
        ..listed_matcher()
    });
    let service = service_with(matcher.clone(), vec![]);

    let addr = address();
    let (first, refreshed) = tokio::join!(service.fetch_markets(&addr), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        service.refresh_markets(&address()).await
    });
    assert_eq!(first.unwrap().len(), 5);
    assert_eq!(refreshed.unwrap().len(), 1);
    assert_eq!(matcher.market_calls.load(Ordering::SeqCst), 2);

    // the older load finished first but was not stored
    let cached = service.cache().get(&address()).unwrap();
    let ids: Vec<String> = cached.iter().map(|m| m.id()).collect();
    assert_eq!(ids, vec!["ETH/LTC"]);
}

#[tokio::test]
async fn test_failing_spam_list_fails_markets() {
    let matcher = Arc::new(listed_matcher());
    let service = service_with_spam(matcher, Arc::new(UnreachableSpamList));

    let err = service.fetch_markets(&address()).await.unwrap_err();
    assert_eq!(err, DexError::network("spam list down"));
    assert!(service.cache().is_empty());
    assert_eq!(service.cache().in_flight_len(), 0);
}

#[tokio::test]
async fn test_failing_markets_fetch_fails_markets() {
    let matcher = Arc::new(MockMatcher {
        markets_down: true,
        ..listed_matcher()
    });
    let service = service_with(matcher.clone(), vec![]);

    let err = service.fetch_markets(&address()).await.unwrap_err();
    assert!(matches!(err, DexError::NetworkFailure(_)));
    assert!(service.cache().is_empty());

    // nothing cached, so the next call asks the matcher again
    service.fetch_markets(&address()).await.unwrap_err();
    assert_eq!(matcher.market_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_toggle_checked_updates_cache_and_store() {
    let service = service_with(Arc::new(listed_matcher()), vec![]);
    service.fetch_markets(&address()).await.unwrap();

    assert!(service.toggle_checked(&address(), "ETH/LTC").await.unwrap());
    assert!(!service.toggle_checked(&address(), "BTC/USDN").await.unwrap());

    let markets = service.fetch_markets(&address()).await.unwrap();
    let checked: Vec<String> = markets
        .iter()
        .filter(|m| m.is_checked)
        .map(|m| m.id())
        .collect();
    assert_eq!(checked, vec!["ETH/LTC"]);

    // survives a reload from the matcher
    let markets = service.refresh_markets(&address()).await.unwrap();
    assert!(markets.iter().any(|m| m.id() == "ETH/LTC" && m.is_checked));
}

#[tokio::test]
async fn test_toggle_checked_without_cache() {
    let service = service_with(Arc::new(listed_matcher()), vec![]);
    assert!(service.toggle_checked(&address(), "ETH/LTC").await.unwrap());
    assert!(!service.toggle_checked(&address(), "ETH/LTC").await.unwrap());
}

#[tokio::test]
async fn test_search_markets() {
    let service = service_with(Arc::new(listed_matcher()), vec!["SCAM"]);
    let found = service.search_markets(&address(), "waves/usdn").await.unwrap();
    let ids: Vec<String> = found.iter().map(|m| m.id()).collect();
    assert_eq!(ids, vec!["WAVES/USDN"]);
}

#[tokio::test]
async fn test_correct_pairs_uses_matcher_price_assets() {
    let matcher = Arc::new(MockMatcher {
        price_assets: vec![AssetId::new("USDN"), AssetId::new("BTC")],
        ..Default::default()
    });
    let service = service_with(matcher, vec![]);
    let corrected = service
        .correct_pairs(&[
            AssetPair::new(AssetId::new("USDN"), AssetId::new("BTC")),
            AssetPair::new(AssetId::new("BTC"), AssetId::new("ETH")),
        ])
        .await
        .unwrap();
    assert_eq!(corrected[0].key(), "BTC/USDN");
    assert_eq!(corrected[1].key(), "ETH/BTC");
}

// ---------------------------------------------------------------------------
// Order book and fees
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_order_book_passes_levels_through() {
    let matcher = Arc::new(MockMatcher {
        order_book: OrderBookResponse {
            bids: vec![RawLevel::new(10, 1), RawLevel::new(10, 2)],
            asks: vec![RawLevel::new(12, 3)],
        },
        ..Default::default()
    });
    let service = service_with(matcher, vec![]);
    let book = service
        .fetch_order_book(&AssetPair::new(AssetId::native(), AssetId::new("USDN")))
        .await
        .unwrap();
    assert_eq!(book.bids.len(), 2);
    assert_eq!(book.top_ask().unwrap().amount, 3);
}

#[tokio::test]
async fn test_malformed_order_book_level_is_an_error() {
    let matcher = Arc::new(MockMatcher {
        order_book: OrderBookResponse {
            bids: vec![RawLevel::new(10, -1)],
            asks: vec![],
        },
        ..Default::default()
    });
    let service = service_with(matcher, vec![]);
    let err = service
        .fetch_order_book(&AssetPair::new(AssetId::native(), AssetId::new("USDN")))
        .await
        .unwrap_err();
    assert!(matches!(err, DexError::DecodeFailure(_)));
}

#[tokio::test]
async fn test_fee_settings_from_rates() {
    let matcher = Arc::new(MockMatcher {
        rates: Some(BTreeMap::from([
            (AssetId::native(), 1.0),
            (AssetId::new("USDN"), 0.5),
        ])),
        ..Default::default()
    });
    let service = service_with(matcher, vec![]);
    let fees = service.fetch_order_fee_settings().await;
    assert_eq!(fees.base_fee, 300_000);
    assert_eq!(fees.fee_in(&AssetId::new("USDN")), Some(150_000));
}

#[tokio::test]
async fn test_fee_settings_fall_back_on_invalid_rate() {
    let matcher = Arc::new(MockMatcher {
        rates: Some(BTreeMap::from([
            (AssetId::native(), 1.0),
            (AssetId::new("USDN"), f64::NAN),
        ])),
        ..Default::default()
    });
    let service = service_with(matcher, vec![]);
    let fees = service.fetch_order_fee_settings().await;
    assert_eq!(fees, SettingsOrderFee::fallback());
}

#[tokio::test]
async fn test_fee_settings_fall_back_on_failure() {
    let service = service_with(Arc::new(MockMatcher::default()), vec![]);
    let fees = service.fetch_order_fee_settings().await;
    assert_eq!(fees, SettingsOrderFee::fallback());
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

fn create_params(timestamp: i64) -> CreateOrderParams {
    CreateOrderParams {
        matcher_public_key: matcher_key(),
        pair: AssetPair::new(AssetId::native(), AssetId::new("USDN")),
        order_type: OrderType::Buy,
        price: 100,
        amount: 200,
        matcher_fee: 300_000,
        timestamp,
        expiration_minutes: 30,
    }
}

#[tokio::test]
async fn test_create_order_is_corrected_and_signed() {
    let matcher = Arc::new(MockMatcher::default());
    let service = service_with(matcher.clone(), vec![]);
    let wallet = wallet();

    assert!(service.create_order(&wallet, create_params(1_000)).await.unwrap());

    let created = matcher.created.lock().unwrap();
    let order = &created[0];
    assert_eq!(order.timestamp, 950);
    assert_eq!(order.expiration, 1_800_950);
    assert_eq!(order.proofs.len(), 1);
    assert_eq!(order.sender_public_key, wallet.public_key());

    let payload = CreateOrderPayload {
        sender_public_key: order.sender_public_key,
        matcher_public_key: order.matcher_public_key,
        pair: order.asset_pair.clone(),
        order_type: order.order_type,
        price: order.price,
        amount: order.amount,
        timestamp: order.timestamp,
        expiration: order.expiration,
        matcher_fee: order.matcher_fee,
    };
    assert!(verify(&wallet.public_key(), &payload.to_bytes().unwrap(), &order.proofs[0]).is_ok());
}

#[tokio::test]
async fn test_create_order_overflow_is_reported() {
    let matcher = Arc::new(MockMatcher::default());
    let service = service_with(matcher.clone(), vec![]);
    let err = service
        .create_order(&wallet(), create_params(i64::MIN))
        .await
        .unwrap_err();
    assert!(matches!(err, DexError::TimestampOverflow(_)));
    assert!(matcher.created.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_locked_wallet_cannot_sign() {
    let matcher = Arc::new(MockMatcher::default());
    let service = service_with(matcher.clone(), vec![]);
    let mut wallet = wallet();
    wallet.lock();

    let err = service
        .create_order(&wallet, create_params(1_000))
        .await
        .unwrap_err();
    assert_eq!(err, DexError::AuthenticationRequired);
    assert!(matcher.created.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_cancel_order_signs_sender_and_id() {
    let matcher = Arc::new(MockMatcher::default());
    let service = service_with(matcher.clone(), vec![]);
    let wallet = wallet();
    let order_id = OrderId::new("9Wa5");

    let pair = AssetPair::new(AssetId::native(), AssetId::new("USDN"));
    assert!(service.cancel_order(&wallet, &order_id, &pair).await.unwrap());

    let cancelled = matcher.cancelled.lock().unwrap();
    let body = &cancelled[0];
    assert_eq!(body.order_id, order_id);
    assert_eq!(body.sender, wallet.public_key());
    let message = cancel_order_bytes(&wallet.public_key(), &order_id).unwrap();
    assert!(verify(&wallet.public_key(), &message, &body.signature).is_ok());
}

#[tokio::test]
async fn test_my_orders_authenticated_and_mapped() {
    let matcher = Arc::new(MockMatcher {
        markets: vec![market("WAVES", "USDN")],
        my_orders: vec![
            MatcherOrder {
                id: OrderId::new("first"),
                order_type: OrderType::Sell,
                status: OrderStatus::Accepted,
                price: 100,
                amount: 10,
                filled: 0,
                timestamp: 1_700_000_000_000,
                asset_pair: AssetPair::new(AssetId::native(), AssetId::new("USDN")),
            },
            MatcherOrder {
                id: OrderId::new("second"),
                order_type: OrderType::Buy,
                status: OrderStatus::Filled,
                price: 90,
                amount: 5,
                filled: 5,
                timestamp: 1_600_000_000_000,
                asset_pair: AssetPair::new(AssetId::native(), AssetId::new("USDN")),
            },
        ],
        ..Default::default()
    });
    let service = service_with(matcher.clone(), vec![]);
    let wallet = wallet();
    let market = service.fetch_markets(&address()).await.unwrap().remove(0);

    let before = local_now_millis();
    let orders = service.fetch_my_orders(&wallet, &market).await.unwrap();
    let after = local_now_millis();
    let ids: Vec<&str> = orders.iter().map(|o| o.id.as_str()).collect();
    assert_eq!(ids, vec!["first", "second"]);
    assert!(orders[1].remaining().is_zero());

    let auth = matcher.my_orders_auth.lock().unwrap().unwrap();
    assert!((before - SERVER_DIFF..=after - SERVER_DIFF).contains(&auth.timestamp));
    let message = timestamp_bytes(&wallet.public_key(), auth.timestamp);
    assert!(verify(&wallet.public_key(), &message, &auth.signature).is_ok());
}
