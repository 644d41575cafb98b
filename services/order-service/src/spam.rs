//! Spam asset list
//!
//! The published list is a headerless CSV whose first column is an asset
//! id; further columns are ignored.

use async_trait::async_trait;
use reqwest::{Client, Response};
use tracing::debug;

use crate::error::{from_csv, from_reqwest};
use types::errors::DexResult;
use types::ids::{Address, AssetId};

#[async_trait]
pub trait SpamAssetsRepository: Send + Sync {
    async fn spam_assets(&self, address: &Address) -> DexResult<Vec<AssetId>>;
}

/// Parse the published CSV. Blank ids are skipped.
pub fn parse_spam_csv(text: &str) -> DexResult<Vec<AssetId>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut ids = Vec::new();
    for record in reader.records() {
        let record = record.map_err(from_csv)?;
        match record.get(0) {
            Some(id) if !id.is_empty() => ids.push(AssetId::new(id)),
            _ => {}
        }
    }
    Ok(ids)
}

/// Spam list downloaded from a fixed URL.
#[derive(Debug, Clone)]
pub struct HttpSpamAssetsRepository {
    client: Client,
    url: String,
}

impl HttpSpamAssetsRepository {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl SpamAssetsRepository for HttpSpamAssetsRepository {
    async fn spam_assets(&self, address: &Address) -> DexResult<Vec<AssetId>> {
        debug!(url = %self.url, %address, "fetching spam list");
        let text = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(Response::error_for_status)
            .map_err(from_reqwest)?
            .text()
            .await
            .map_err(from_reqwest)?;
        parse_spam_csv(&text)
    }
}

/// Fixed spam list, the same for every address.
#[derive(Debug, Clone, Default)]
pub struct StaticSpamAssetsRepository {
    ids: Vec<AssetId>,
}

impl StaticSpamAssetsRepository {
    pub fn new(ids: Vec<AssetId>) -> Self {
        Self { ids }
    }
}

#[async_trait]
impl SpamAssetsRepository for StaticSpamAssetsRepository {
    async fn spam_assets(&self, _address: &Address) -> DexResult<Vec<AssetId>> {
        Ok(self.ids.clone())
    }
}
