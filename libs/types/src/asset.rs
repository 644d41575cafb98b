//! Assets and asset pairs

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::AssetId;

/// A tradable asset with display metadata
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: AssetId,
    pub name: String,
    /// Ticker when known, otherwise the name
    pub short_name: String,
    pub decimals: u32,
    /// Marked for priority display in local settings
    pub is_general: bool,
}

/// Ordered (amount, price) pair of asset ids
///
/// Serializes as `{"amountAsset": .., "priceAsset": ..}` which is also the
/// matcher's `assetPair` shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetPair {
    pub amount_asset: AssetId,
    pub price_asset: AssetId,
}

impl AssetPair {
    pub fn new(amount_asset: AssetId, price_asset: AssetId) -> Self {
        Self {
            amount_asset,
            price_asset,
        }
    }

    /// Identity key, `"{amount}/{price}"`
    pub fn key(&self) -> String {
        pair_key(&self.amount_asset, &self.price_asset)
    }

    /// Same assets with the roles swapped
    pub fn reversed(&self) -> Self {
        Self::new(self.price_asset.clone(), self.amount_asset.clone())
    }
}

impl fmt::Display for AssetPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.amount_asset, self.price_asset)
    }
}

/// Identity key of a pair of asset ids.
pub fn pair_key(amount_asset: &AssetId, price_asset: &AssetId) -> String {
    format!("{}/{}", amount_asset, price_asset)
}

/// Anything that references an (amount, price) pair of assets.
pub trait HasAssetPair {
    fn amount_asset_id(&self) -> &AssetId;
    fn price_asset_id(&self) -> &AssetId;

    fn pair_key(&self) -> String {
        pair_key(self.amount_asset_id(), self.price_asset_id())
    }
}

impl HasAssetPair for AssetPair {
    fn amount_asset_id(&self) -> &AssetId {
        &self.amount_asset
    }

    fn price_asset_id(&self) -> &AssetId {
        &self.price_asset
    }
}
