//! Order Service: async DEX order client
//!
//! Talks to a remote matcher on behalf of a wallet: lists and caches
//! markets, reads order books and fee settings, and submits signed
//! create/cancel requests. All deterministic work is delegated to
//! `dex-core`; this crate owns I/O, collaborators and the markets cache.
//!
//! # Modules
//! - `service`: [`DexOrderService`], the orchestration root
//! - `transport`: Matcher REST API
//! - `environment`: Matcher endpoint and clock offset discovery
//! - `spam`: Spam asset list
//! - `settings`: Local settings and favorite pairs
//! - `cache`: Per-address markets cache with single-flight loads
//! - `models`: Matcher wire models
//! - `config`, `telemetry`: Binary configuration and logging

pub mod cache;
pub mod config;
pub mod environment;
pub mod error;
pub mod models;
pub mod service;
pub mod settings;
pub mod spam;
pub mod telemetry;
pub mod transport;

pub use service::DexOrderService;
