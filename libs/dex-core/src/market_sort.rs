//! Display ordering of markets
//!
//! Three stable tiers, each market placed exactly once:
//! 1. For each asset in the priority list (highest first): general markets
//!    whose amount asset is that asset.
//! 2. Remaining general markets.
//! 3. Everything else.
//!
//! Within a tier markets keep their input order. Placement is tracked by
//! pair identity key; a later input market with an already placed key is
//! not emitted again.

use std::collections::{HashMap, HashSet};

use types::ids::AssetId;
use types::market::Prioritized;

/// Order `markets` for display against `priority`.
pub fn sort_markets<M: Prioritized>(markets: Vec<M>, priority: &[AssetId]) -> Vec<M> {
    let keys: Vec<String> = markets.iter().map(|m| m.pair_key()).collect();

    let mut general_by_amount: HashMap<&AssetId, Vec<usize>> = HashMap::new();
    for (index, market) in markets.iter().enumerate() {
        if market.is_general() {
            general_by_amount
                .entry(market.amount_asset_id())
                .or_default()
                .push(index);
        }
    }

    let mut placed: HashSet<&str> = HashSet::with_capacity(markets.len());
    let mut order: Vec<usize> = Vec::with_capacity(markets.len());
    let mut place = |index: usize, order: &mut Vec<usize>| {
        if placed.insert(keys[index].as_str()) {
            order.push(index);
        }
    };

    // Tier 1
    for asset_id in priority {
        if let Some(indices) = general_by_amount.get(asset_id) {
            for &index in indices {
                place(index, &mut order);
            }
        }
    }

    // Tier 2
    for (index, market) in markets.iter().enumerate() {
        if market.is_general() {
            place(index, &mut order);
        }
    }

    // Tier 3
    for index in 0..markets.len() {
        place(index, &mut order);
    }

    let mut slots: Vec<Option<M>> = markets.into_iter().map(Some).collect();
    order
        .into_iter()
        .filter_map(|index| slots[index].take())
        .collect()
}
