//! Markets cache
//!
//! Per-address market lists, populated lazily by `fetch_markets` and
//! updated in place when a pair's checked flag changes. Loads are
//! single-flight: concurrent callers for one address share a single
//! in-flight future instead of each fetching.
//!
//! Every invalidation bumps the address's generation. A load started
//! under an older generation is not stored.

use std::collections::HashSet;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared, WeakShared};

use types::errors::DexResult;
use types::ids::Address;
use types::market::MarketPair;

pub type MarketsFuture = BoxFuture<'static, DexResult<Vec<MarketPair>>>;

/// A load that every concurrent caller for one address awaits.
pub type SharedMarkets = Shared<MarketsFuture>;

#[derive(Default)]
pub struct MarketsCache {
    entries: DashMap<Address, Vec<MarketPair>>,
    in_flight: DashMap<Address, WeakShared<MarketsFuture>>,
    generations: DashMap<Address, u64>,
}

impl MarketsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, address: &Address) -> Option<Vec<MarketPair>> {
        self.entries.get(address).map(|markets| markets.value().clone())
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.entries.contains_key(address)
    }

    pub fn generation(&self, address: &Address) -> u64 {
        self.generations.get(address).map_or(0, |generation| *generation)
    }

    /// Store a load started at `generation`. Returns false, storing
    /// nothing, if the address was invalidated since.
    pub fn insert_loaded(&self, address: Address, generation: u64, markets: Vec<MarketPair>) -> bool {
        // generation lock is taken before the entry, as in `invalidate`
        let current = self.generations.entry(address.clone()).or_default();
        if *current != generation {
            return false;
        }
        self.entries.insert(address, markets);
        true
    }

    /// Drop the cached markets and detach any in-flight load, so the next
    /// fetch starts a fresh one.
    pub fn invalidate(&self, address: &Address) {
        let mut generation = self.generations.entry(address.clone()).or_default();
        *generation += 1;
        self.entries.remove(address);
        self.in_flight.remove(address);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flip the checked flag of `pair_id`; `None` if not cached.
    pub fn toggle_checked(&self, address: &Address, pair_id: &str) -> Option<bool> {
        let mut markets = self.entries.get_mut(address)?;
        let market = markets.iter_mut().find(|m| m.id() == pair_id)?;
        market.is_checked = !market.is_checked;
        Some(market.is_checked)
    }

    /// Overwrite every cached checked flag from `checked`.
    pub fn refresh_checked(&self, address: &Address, checked: &HashSet<String>) {
        if let Some(mut markets) = self.entries.get_mut(address) {
            for market in markets.iter_mut() {
                market.is_checked = checked.contains(&market.id());
            }
        }
    }

    /// The in-flight load for `address`, or a new one built by `load`.
    pub fn shared_or_else<F>(&self, address: &Address, load: F) -> SharedMarkets
    where
        F: FnOnce() -> MarketsFuture,
    {
        match self.in_flight.entry(address.clone()) {
            Entry::Occupied(mut entry) => {
                if let Some(existing) = entry.get().upgrade() {
                    return existing;
                }
                let shared = load().shared();
                if let Some(weak) = shared.downgrade() {
                    entry.insert(weak);
                }
                shared
            }
            Entry::Vacant(entry) => {
                let shared = load().shared();
                if let Some(weak) = shared.downgrade() {
                    entry.insert(weak);
                }
                shared
            }
        }
    }

    /// Drop the in-flight slot of `address` once no caller holds it.
    pub fn release(&self, address: &Address) {
        self.in_flight
            .remove_if(address, |_, weak| weak.upgrade().is_none());
    }

    pub fn in_flight_len(&self) -> usize {
        self.in_flight.len()
    }
}
