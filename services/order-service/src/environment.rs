//! Services environment
//!
//! Resolves the matcher endpoint and the clock offset between this host
//! and the network. The offset is measured against a node's clock and
//! kept for a TTL.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::error::from_reqwest;
use crate::models::NodeTime;
use dex_core::clock::{ClockSkewCorrector, local_now_millis};
use types::errors::DexResult;

/// Matcher endpoint and `local - server` clock offset in millis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServicesEnvironment {
    pub matcher_url: String,
    pub timestamp_server_diff: i64,
}

impl ServicesEnvironment {
    pub fn new(matcher_url: impl Into<String>, timestamp_server_diff: i64) -> Self {
        Self {
            matcher_url: matcher_url.into(),
            timestamp_server_diff,
        }
    }

    pub fn clock(&self) -> ClockSkewCorrector {
        ClockSkewCorrector::new(self.timestamp_server_diff)
    }
}

#[async_trait]
pub trait EnvironmentRepository: Send + Sync {
    async fn services_environment(&self) -> DexResult<ServicesEnvironment>;
}

/// Fixed environment.
#[derive(Debug, Clone)]
pub struct StaticEnvironmentRepository {
    environment: ServicesEnvironment,
}

impl StaticEnvironmentRepository {
    pub fn new(environment: ServicesEnvironment) -> Self {
        Self { environment }
    }
}

#[async_trait]
impl EnvironmentRepository for StaticEnvironmentRepository {
    async fn services_environment(&self) -> DexResult<ServicesEnvironment> {
        Ok(self.environment.clone())
    }
}

// ---------------------------------------------------------------------------
// Measured environment
// ---------------------------------------------------------------------------

/// A remote clock to measure the local offset against.
#[async_trait]
pub trait ServerClock: Send + Sync {
    /// Server time in unix millis.
    async fn server_time(&self) -> DexResult<i64>;
}

/// Node `/utils/time`, preferring the NTP reading.
#[derive(Debug, Clone)]
pub struct NodeClock {
    client: Client,
    node_url: String,
}

impl NodeClock {
    pub fn new(client: Client, node_url: impl Into<String>) -> Self {
        Self {
            client,
            node_url: node_url.into(),
        }
    }
}

#[async_trait]
impl ServerClock for NodeClock {
    async fn server_time(&self) -> DexResult<i64> {
        let url = format!("{}/utils/time", self.node_url.trim_end_matches('/'));
        let time: NodeTime = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(Response::error_for_status)
            .map_err(from_reqwest)?
            .json()
            .await
            .map_err(from_reqwest)?;
        Ok(time.ntp)
    }
}

/// Environment whose clock offset is measured against a [`ServerClock`]
/// and cached for `ttl`.
pub struct MeasuredEnvironmentRepository<C> {
    clock: C,
    matcher_url: String,
    ttl: Duration,
    cached: Mutex<Option<(Instant, ServicesEnvironment)>>,
}

/// Measured environment against a node over HTTP.
pub type HttpEnvironmentRepository = MeasuredEnvironmentRepository<NodeClock>;

impl<C: ServerClock> MeasuredEnvironmentRepository<C> {
    pub fn new(clock: C, matcher_url: impl Into<String>, ttl: Duration) -> Self {
        Self {
            clock,
            matcher_url: matcher_url.into(),
            ttl,
            cached: Mutex::new(None),
        }
    }

    async fn measure(&self) -> DexResult<ServicesEnvironment> {
        let server = self.clock.server_time().await?;
        let local = local_now_millis();
        let skew = ClockSkewCorrector::measure(server, local)?;
        info!(diff_ms = skew.server_diff(), "measured server clock offset");
        Ok(ServicesEnvironment::new(
            self.matcher_url.clone(),
            skew.server_diff(),
        ))
    }
}

#[async_trait]
impl<C: ServerClock> EnvironmentRepository for MeasuredEnvironmentRepository<C> {
    async fn services_environment(&self) -> DexResult<ServicesEnvironment> {
        // Held across the measurement so concurrent callers measure once
        let mut cached = self.cached.lock().await;
        if let Some((measured_at, environment)) = cached.as_ref() {
            if measured_at.elapsed() < self.ttl {
                return Ok(environment.clone());
            }
            debug!("services environment expired");
        }
        let environment = self.measure().await?;
        *cached = Some((Instant::now(), environment.clone()));
        Ok(environment)
    }
}
