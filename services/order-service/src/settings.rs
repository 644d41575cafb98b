//! Local settings: asset display info, general-asset priority and
//! favorite (checked) pairs.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use dashmap::DashMap;
use serde::Deserialize;

use crate::error::from_json;
use types::errors::DexResult;
use types::ids::{Address, AssetId};
use types::settings::{AssetInfo, GeneralAssetSetting, GeneralPriorityList};

/// Read-only view of locally persisted settings.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// General assets in display priority order.
    async fn general_priority(&self, address: &Address) -> DexResult<GeneralPriorityList>;

    /// Locally known assets by id.
    async fn asset_infos(&self, address: &Address) -> DexResult<HashMap<AssetId, AssetInfo>>;
}

/// Favorite pairs per address, keyed by pair id (`"{amount}/{price}"`).
#[async_trait]
pub trait FavoritePairsRepository: Send + Sync {
    async fn checked_pairs(&self, address: &Address) -> DexResult<HashSet<String>>;

    async fn save(&self, address: &Address, pair_id: &str) -> DexResult<()>;

    async fn remove(&self, address: &Address, pair_id: &str) -> DexResult<()>;
}

/// JSON layout of a settings file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsDocument {
    #[serde(default)]
    pub assets: Vec<AssetInfo>,
    #[serde(default)]
    pub general_assets: Vec<GeneralAssetSetting>,
    #[serde(default)]
    pub checked_pairs: Vec<String>,
}

/// Settings held in memory, shared by every address.
///
/// Checked pairs start from the document and then diverge per address.
#[derive(Debug, Default)]
pub struct InMemorySettingsStore {
    assets: HashMap<AssetId, AssetInfo>,
    priority: GeneralPriorityList,
    initial_checked: HashSet<String>,
    checked: DashMap<Address, HashSet<String>>,
}

impl InMemorySettingsStore {
    pub fn new(document: SettingsDocument) -> Self {
        let assets: HashMap<AssetId, AssetInfo> = document
            .assets
            .into_iter()
            .map(|info| (info.id.clone(), info))
            .collect();

        // an asset flagged general in the asset table counts as general here too
        let general_assets = document
            .general_assets
            .into_iter()
            .map(|mut setting| {
                setting.is_general |= assets
                    .get(&setting.asset_id)
                    .is_some_and(|info| info.is_general);
                setting
            })
            .collect();

        Self {
            assets,
            priority: GeneralPriorityList::from_settings(general_assets),
            initial_checked: document.checked_pairs.into_iter().collect(),
            checked: DashMap::new(),
        }
    }

    pub fn from_json(json: &str) -> DexResult<Self> {
        let document: SettingsDocument = serde_json::from_str(json).map_err(from_json)?;
        Ok(Self::new(document))
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn general_priority(&self, _address: &Address) -> DexResult<GeneralPriorityList> {
        Ok(self.priority.clone())
    }

    async fn asset_infos(&self, _address: &Address) -> DexResult<HashMap<AssetId, AssetInfo>> {
        Ok(self.assets.clone())
    }
}

#[async_trait]
impl FavoritePairsRepository for InMemorySettingsStore {
    async fn checked_pairs(&self, address: &Address) -> DexResult<HashSet<String>> {
        Ok(self
            .checked
            .get(address)
            .map(|pairs| pairs.value().clone())
            .unwrap_or_else(|| self.initial_checked.clone()))
    }

    async fn save(&self, address: &Address, pair_id: &str) -> DexResult<()> {
        self.checked
            .entry(address.clone())
            .or_insert_with(|| self.initial_checked.clone())
            .insert(pair_id.to_owned());
        Ok(())
    }

    async fn remove(&self, address: &Address, pair_id: &str) -> DexResult<()> {
        self.checked
            .entry(address.clone())
            .or_insert_with(|| self.initial_checked.clone())
            .remove(pair_id);
        Ok(())
    }
}
