use std::sync::Arc;

use anyhow::{Context, bail};
use clap::Parser;
use reqwest::Client;

use dex_core::clock::local_now_millis;
use dex_core::signing::Wallet;
use order_service::DexOrderService;
use order_service::config::{Arguments, Command, PairArgs};
use order_service::environment::{HttpEnvironmentRepository, NodeClock};
use order_service::settings::InMemorySettingsStore;
use order_service::spam::{HttpSpamAssetsRepository, SpamAssetsRepository, StaticSpamAssetsRepository};
use order_service::telemetry::init_tracing;
use order_service::transport::HttpMatcherTransport;
use types::asset::{Asset, AssetPair};
use types::ids::{Address, AssetId, OrderId};
use types::market::MarketPair;
use types::order::CreateOrderParams;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let args = Arguments::parse();
    init_tracing(&args.log_filter);
    tracing::info!("running with arguments:\n{}", args);

    let service = build_service(&args)?;
    run(&service, args.command).await
}

fn build_service(args: &Arguments) -> anyhow::Result<DexOrderService> {
    let client = Client::builder()
        .timeout(args.request_timeout())
        .build()
        .context("building HTTP client")?;

    let settings = match &args.settings {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading settings {}", path.display()))?;
            InMemorySettingsStore::from_json(&json)?
        }
        None => InMemorySettingsStore::default(),
    };
    let settings = Arc::new(settings);

    let spam: Arc<dyn SpamAssetsRepository> = match &args.spam_list_url {
        Some(url) => Arc::new(HttpSpamAssetsRepository::new(client.clone(), url.clone())),
        None => Arc::new(StaticSpamAssetsRepository::default()),
    };

    let environment = HttpEnvironmentRepository::new(
        NodeClock::new(client.clone(), args.node_url.clone()),
        args.matcher_url.clone(),
        args.environment_ttl(),
    );

    Ok(DexOrderService::new(
        Arc::new(HttpMatcherTransport::with_client(client)),
        Arc::new(environment),
        spam,
        settings.clone(),
        settings,
    ))
}

fn pair_of(pair: &PairArgs) -> AssetPair {
    AssetPair::new(
        AssetId::new(pair.amount_asset.as_str()),
        AssetId::new(pair.price_asset.as_str()),
    )
}

fn parse_pair(text: &str) -> anyhow::Result<AssetPair> {
    match text.split_once('/') {
        Some((amount, price)) if !amount.is_empty() && !price.is_empty() => Ok(AssetPair::new(
            AssetId::new(amount),
            AssetId::new(price),
        )),
        _ => bail!("expected AMOUNT/PRICE, got {:?}", text),
    }
}

/// Market of `pair` from the account's market list, or a bare one with
/// default decimals when the matcher does not list it.
async fn market_of(
    service: &DexOrderService,
    address: &Address,
    pair: &AssetPair,
) -> anyhow::Result<MarketPair> {
    let markets = service.fetch_markets(address).await?;
    if let Some(market) = markets.into_iter().find(|m| m.id() == pair.key()) {
        return Ok(market);
    }
    let bare = |id: &AssetId| Asset {
        id: id.clone(),
        name: id.to_string(),
        short_name: id.to_string(),
        decimals: order_service::models::DEFAULT_ASSET_DECIMALS,
        is_general: false,
    };
    Ok(MarketPair::new(
        bare(&pair.amount_asset),
        bare(&pair.price_asset),
        false,
    ))
}

async fn run(service: &DexOrderService, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Markets { address, search } => {
            let address = Address::new(address);
            let markets = match search {
                Some(text) => service.search_markets(&address, &text).await?,
                None => service.fetch_markets(&address).await?,
            };
            for market in markets {
                println!(
                    "{:<60} {}/{}{}{}",
                    market.id(),
                    market.amount_asset.short_name,
                    market.price_asset.short_name,
                    if market.is_general { " [general]" } else { "" },
                    if market.is_checked { " [checked]" } else { "" },
                );
            }
        }
        Command::OrderBook { pair } => {
            let book = service.fetch_order_book(&pair_of(&pair)).await?;
            println!("{:>20} {:>20}", "bid price", "amount");
            for level in &book.bids {
                println!("{:>20} {:>20}", level.price, level.amount);
            }
            println!("{:>20} {:>20}", "ask price", "amount");
            for level in &book.asks {
                println!("{:>20} {:>20}", level.price, level.amount);
            }
        }
        Command::Fees => {
            let fees = service.fetch_order_fee_settings().await;
            println!("base fee: {}", fees.base_fee);
            for asset in &fees.fee_assets {
                let fee = fees.fee_in(&asset.asset_id).unwrap_or_default();
                println!("{:<45} rate {:<12} fee {}", asset.asset_id, asset.rate, fee);
            }
        }
        Command::CorrectPairs { pairs } => {
            let pairs = pairs
                .iter()
                .map(|text| parse_pair(text))
                .collect::<anyhow::Result<Vec<_>>>()?;
            for (input, corrected) in pairs.iter().zip(service.correct_pairs(&pairs).await?) {
                println!("{} -> {}", input, corrected);
            }
        }
        Command::MyOrders { account, pair } => {
            let wallet = account.wallet()?;
            let market = market_of(service, wallet.address(), &pair_of(&pair)).await?;
            for order in service.fetch_my_orders(&wallet, &market).await? {
                println!(
                    "{} {:?} {:?} price {} amount {} filled {} at {}",
                    order.id,
                    order.order_type,
                    order.status,
                    order.price.to_decimal()?,
                    order.amount.to_decimal()?,
                    order.filled.to_decimal()?,
                    order.time.to_rfc3339(),
                );
            }
        }
        Command::CancelOrder {
            account,
            pair,
            order_id,
        } => {
            let wallet = account.wallet()?;
            let accepted = service
                .cancel_order(&wallet, &OrderId::new(order_id), &pair_of(&pair))
                .await?;
            println!("cancel accepted: {}", accepted);
        }
        Command::CreateOrder {
            account,
            pair,
            side,
            price,
            amount,
            matcher_fee,
            expiration_minutes,
        } => {
            let wallet = account.wallet()?;
            let matcher_fee = match matcher_fee {
                Some(fee) => fee,
                None => service.fetch_order_fee_settings().await.base_fee,
            };
            let params = CreateOrderParams {
                matcher_public_key: service.matcher_public_key().await?,
                pair: pair_of(&pair),
                order_type: side.into(),
                price,
                amount,
                matcher_fee,
                timestamp: local_now_millis(),
                expiration_minutes,
            };
            let accepted = service.create_order(&wallet, params).await?;
            println!("order accepted: {}", accepted);
        }
    }
    Ok(())
}
