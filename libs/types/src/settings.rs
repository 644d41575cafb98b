//! Local display settings
//!
//! General assets carry a `sort_level`; ascending sort level is descending
//! display priority.

use serde::{Deserialize, Serialize};

use crate::ids::AssetId;

/// Locally known metadata of an asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetInfo {
    pub id: AssetId,
    pub display_name: String,
    #[serde(default)]
    pub ticker: Option<String>,
    #[serde(default)]
    pub is_general: bool,
}

/// Display-order setting of one asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralAssetSetting {
    pub asset_id: AssetId,
    pub sort_level: i64,
    #[serde(default)]
    pub is_general: bool,
}

/// Asset ids in display priority order (index 0 = highest)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneralPriorityList(Vec<AssetId>);

impl GeneralPriorityList {
    pub fn new(ids: Vec<AssetId>) -> Self {
        Self(ids)
    }

    /// Keep general entries only, ordered by ascending `sort_level`.
    ///
    /// The sort is stable: equal levels keep their stored order.
    pub fn from_settings(mut settings: Vec<GeneralAssetSetting>) -> Self {
        settings.retain(|s| s.is_general);
        settings.sort_by_key(|s| s.sort_level);
        Self(settings.into_iter().map(|s| s.asset_id).collect())
    }

    pub fn ids(&self) -> &[AssetId] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}
