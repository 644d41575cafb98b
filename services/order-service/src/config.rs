//! Command line and environment configuration

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use thiserror::Error;

use dex_core::signing::Ed25519Wallet;
use types::ids::Address;
use types::order::OrderType;

#[derive(Debug, Parser)]
#[command(name = "order-service", about = "DEX order client")]
pub struct Arguments {
    #[arg(long, env, default_value = "info,order_service=debug")]
    pub log_filter: String,

    /// Matcher base URL
    #[arg(long, env, default_value = "https://matcher.waves.exchange")]
    pub matcher_url: String,

    /// Node base URL, used to measure the clock offset
    #[arg(long, env, default_value = "https://nodes.wavesnodes.com")]
    pub node_url: String,

    /// CSV spam list; no filtering when unset
    #[arg(long, env)]
    pub spam_list_url: Option<String>,

    /// How long a measured clock offset stays valid
    #[arg(long, env, default_value_t = 300)]
    pub environment_ttl_secs: u64,

    #[arg(long, env, default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// JSON settings file (assets, general sort levels, checked pairs)
    #[arg(long, env)]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Arguments {
    pub fn environment_ttl(&self) -> Duration {
        Duration::from_secs(self.environment_ttl_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl std::fmt::Display for Arguments {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "log_filter: {}", self.log_filter)?;
        writeln!(f, "matcher_url: {}", self.matcher_url)?;
        writeln!(f, "node_url: {}", self.node_url)?;
        writeln!(f, "spam_list_url: {:?}", self.spam_list_url)?;
        writeln!(f, "environment_ttl_secs: {}", self.environment_ttl_secs)?;
        writeln!(f, "request_timeout_secs: {}", self.request_timeout_secs)?;
        writeln!(f, "settings: {:?}", self.settings)?;
        Ok(())
    }
}

/// Signing account
#[derive(Debug, Clone, Args)]
pub struct AccountArgs {
    #[arg(long, env = "DEX_ADDRESS")]
    pub address: String,

    /// Base58 32-byte Ed25519 seed
    #[arg(long, env = "DEX_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: String,
}

impl AccountArgs {
    pub fn wallet(&self) -> Result<Ed25519Wallet, KeyError> {
        let seed = decode_seed(&self.private_key)?;
        Ok(Ed25519Wallet::from_seed(Address::new(self.address.clone()), seed))
    }
}

#[derive(Debug, Clone, Args)]
pub struct PairArgs {
    #[arg(long)]
    pub amount_asset: String,

    #[arg(long)]
    pub price_asset: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Side {
    Buy,
    Sell,
}

impl From<Side> for OrderType {
    fn from(side: Side) -> Self {
        match side {
            Side::Buy => OrderType::Buy,
            Side::Sell => OrderType::Sell,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List markets in display order
    Markets {
        #[arg(long)]
        address: String,

        /// Only markets whose asset names match
        #[arg(long)]
        search: Option<String>,
    },
    /// Print the order book of a pair
    OrderBook {
        #[command(flatten)]
        pair: PairArgs,
    },
    /// Print matcher fee settings
    Fees,
    /// Canonicalize pairs given as `AMOUNT/PRICE`
    CorrectPairs { pairs: Vec<String> },
    /// List the account's orders in a pair
    MyOrders {
        #[command(flatten)]
        account: AccountArgs,

        #[command(flatten)]
        pair: PairArgs,
    },
    /// Cancel an order
    CancelOrder {
        #[command(flatten)]
        account: AccountArgs,

        #[command(flatten)]
        pair: PairArgs,

        #[arg(long)]
        order_id: String,
    },
    /// Sign and submit an order
    CreateOrder {
        #[command(flatten)]
        account: AccountArgs,

        #[command(flatten)]
        pair: PairArgs,

        #[arg(long, value_enum)]
        side: Side,

        #[arg(long)]
        price: i64,

        #[arg(long)]
        amount: i64,

        /// Fee in the native asset; the matcher's base fee when unset
        #[arg(long)]
        matcher_fee: Option<i64>,

        #[arg(long, default_value_t = 60 * 24 * 28)]
        expiration_minutes: i64,
    },
}

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("private key is not base58: {0}")]
    Encoding(#[from] bs58::decode::Error),

    #[error("private key must be 32 bytes, got {0}")]
    Length(usize),
}

pub fn decode_seed(encoded: &str) -> Result<[u8; 32], KeyError> {
    let bytes = bs58::decode(encoded.trim()).into_vec()?;
    <[u8; 32]>::try_from(bytes.as_slice()).map_err(|_| KeyError::Length(bytes.len()))
}
