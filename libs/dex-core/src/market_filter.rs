//! Spam filtering of markets
//!
//! A market survives iff neither of its assets is spam-listed. The lookup
//! set is built once per filter pass, so a pass costs
//! O(markets + spam ids).

use std::collections::HashSet;

use types::asset::HasAssetPair;
use types::ids::AssetId;

/// Set of spam-listed asset ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpamList {
    ids: HashSet<AssetId>,
}

impl SpamList {
    pub fn new(ids: impl IntoIterator<Item = AssetId>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    pub fn contains(&self, id: &AssetId) -> bool {
        self.ids.contains(id)
    }

    /// Neither asset of `market` is spam.
    pub fn allows<M: HasAssetPair + ?Sized>(&self, market: &M) -> bool {
        !self.contains(market.amount_asset_id()) && !self.contains(market.price_asset_id())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FromIterator<AssetId> for SpamList {
    fn from_iter<I: IntoIterator<Item = AssetId>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Drop markets referencing spam assets, preserving order.
pub fn filter_spam<M: HasAssetPair>(markets: Vec<M>, spam: &SpamList) -> Vec<M> {
    if spam.is_empty() {
        return markets;
    }
    markets.into_iter().filter(|m| spam.allows(m)).collect()
}

/// [`filter_spam`] for a raw id sequence.
pub fn filter_markets<M: HasAssetPair>(markets: Vec<M>, spam_ids: &[AssetId]) -> Vec<M> {
    let spam: SpamList = spam_ids.iter().cloned().collect();
    filter_spam(markets, &spam)
}
