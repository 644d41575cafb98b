//! Displayable markets

use serde::{Deserialize, Serialize};

use crate::asset::{pair_key, Asset, AssetPair, HasAssetPair};
use crate::ids::AssetId;

/// A market ready for display: both assets resolved, flags attached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketPair {
    pub amount_asset: Asset,
    pub price_asset: Asset,
    /// Both assets are general
    pub is_general: bool,
    /// User favorite
    pub is_checked: bool,
}

impl MarketPair {
    pub fn new(amount_asset: Asset, price_asset: Asset, is_checked: bool) -> Self {
        let is_general = amount_asset.is_general && price_asset.is_general;
        Self {
            amount_asset,
            price_asset,
            is_general,
            is_checked,
        }
    }

    /// Identity key, `"{amount}/{price}"`
    pub fn id(&self) -> String {
        pair_key(&self.amount_asset.id, &self.price_asset.id)
    }

    pub fn pair(&self) -> AssetPair {
        AssetPair::new(self.amount_asset.id.clone(), self.price_asset.id.clone())
    }
}

impl HasAssetPair for MarketPair {
    fn amount_asset_id(&self) -> &AssetId {
        &self.amount_asset.id
    }

    fn price_asset_id(&self) -> &AssetId {
        &self.price_asset.id
    }
}

/// Markets that can be ranked by the display sorter.
pub trait Prioritized: HasAssetPair {
    fn is_general(&self) -> bool;
}

impl Prioritized for MarketPair {
    fn is_general(&self) -> bool {
        self.is_general
    }
}
