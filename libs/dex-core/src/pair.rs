//! Pair canonicalization
//!
//! Decides which of two assets is the amount asset and which is the price
//! asset, so both trading directions map to one market identity.
//!
//! Rules against a priority list `L` (index 0 = highest priority):
//! 1. Both in `L`: the larger index is `amount`, the smaller is `price`.
//! 2. One in `L`: the non-member is `amount`, the member is `price`.
//! 3. Neither: the id whose decoded bytes compare greater is `amount`.
//!    Malformed ids decode to empty bytes; on a byte tie the id strings
//!    decide, so the result never depends on argument order.
//!
//! Duplicate ids in `L` rank by their first occurrence.

use std::cmp::Ordering;
use std::collections::HashMap;

use types::asset::AssetPair;
use types::ids::AssetId;

/// Canonicalizer with a precomputed rank table for a priority list.
#[derive(Debug, Clone, Default)]
pub struct PairCanonicalizer {
    ranks: HashMap<AssetId, usize>,
}

impl PairCanonicalizer {
    pub fn new(priority: &[AssetId]) -> Self {
        let mut ranks = HashMap::with_capacity(priority.len());
        for (index, id) in priority.iter().enumerate() {
            ranks.entry(id.clone()).or_insert(index);
        }
        Self { ranks }
    }

    /// Canonical (amount, price) assignment of `a` and `b`. Total.
    pub fn canonicalize(&self, a: &AssetId, b: &AssetId) -> AssetPair {
        let a_is_amount = match (self.ranks.get(a), self.ranks.get(b)) {
            (Some(rank_a), Some(rank_b)) => rank_a > rank_b,
            (None, Some(_)) => true,
            (Some(_), None) => false,
            (None, None) => match a.decode_or_empty().cmp(&b.decode_or_empty()) {
                Ordering::Greater => true,
                Ordering::Less => false,
                Ordering::Equal => a.as_str() > b.as_str(),
            },
        };

        if a_is_amount {
            AssetPair::new(a.clone(), b.clone())
        } else {
            AssetPair::new(b.clone(), a.clone())
        }
    }

    /// Canonicalize every pair, preserving input order.
    pub fn correct_pairs(&self, pairs: &[AssetPair]) -> Vec<AssetPair> {
        pairs
            .iter()
            .map(|pair| self.canonicalize(&pair.amount_asset, &pair.price_asset))
            .collect()
    }
}

/// One-off canonicalization against `priority`.
pub fn canonicalize(a: &AssetId, b: &AssetId, priority: &[AssetId]) -> AssetPair {
    PairCanonicalizer::new(priority).canonicalize(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Valid base58 ids with known byte order
    const LOW: &str = "2";
    const HIGH: &str = "z";

    fn ids(list: &[&str]) -> Vec<AssetId> {
        list.iter().map(|s| AssetId::new(*s)).collect()
    }

    fn assert_pair(pair: &AssetPair, amount: &str, price: &str) {
        assert_eq!(pair.amount_asset.as_str(), amount);
        assert_eq!(pair.price_asset.as_str(), price);
    }

    #[test]
    fn test_both_in_list_later_index_is_amount() {
        let priority = ids(&["X", "Y", "Z"]);
        let y = AssetId::new("Y");
        let z = AssetId::new("Z");
        assert_pair(&canonicalize(&y, &z, &priority), "Z", "Y");
        assert_pair(&canonicalize(&z, &y, &priority), "Z", "Y");
    }

    #[test]
    fn test_non_member_is_amount() {
        let priority = ids(&["X", "Y", "Z"]);
        let y = AssetId::new("Y");
        let w = AssetId::new("W");
        assert_pair(&canonicalize(&y, &w, &priority), "W", "Y");
        assert_pair(&canonicalize(&w, &y, &priority), "W", "Y");
    }

    #[test]
    fn test_neither_in_list_greater_bytes_is_amount() {
        let low = AssetId::new(LOW);
        let high = AssetId::new(HIGH);
        assert!(high.decode().unwrap() > low.decode().unwrap());
        assert_pair(&canonicalize(&low, &high, &[]), HIGH, LOW);
        assert_pair(&canonicalize(&high, &low, &[]), HIGH, LOW);
    }

    #[test]
    fn test_malformed_ids_fall_back_to_empty_bytes() {
        let malformed = AssetId::new("0-not-base58");
        let valid = AssetId::new(LOW);
        // empty bytes compare less than any decoded id
        assert_pair(&canonicalize(&malformed, &valid, &[]), LOW, "0-not-base58");
        assert_pair(&canonicalize(&valid, &malformed, &[]), LOW, "0-not-base58");
    }

    #[test]
    fn test_two_malformed_ids_are_order_independent() {
        let a = AssetId::new("0OIl-a");
        let b = AssetId::new("0OIl-b");
        assert_eq!(canonicalize(&a, &b, &[]), canonicalize(&b, &a, &[]));
    }

    #[test]
    fn test_correct_pairs_preserves_order() {
        let canonicalizer = PairCanonicalizer::new(&ids(&["USD", "BTC"]));
        let corrected = canonicalizer.correct_pairs(&[
            AssetPair::new(AssetId::new("USD"), AssetId::new("ETH")),
            AssetPair::new(AssetId::new("USD"), AssetId::new("BTC")),
        ]);
        assert_pair(&corrected[0], "ETH", "USD");
        assert_pair(&corrected[1], "BTC", "USD");
    }

    // Undefined inputs: only assert that nothing panics.

    #[test]
    fn test_duplicate_priority_ids_do_not_crash() {
        let priority = ids(&["X", "Y", "X"]);
        let _ = canonicalize(&AssetId::new("X"), &AssetId::new("Y"), &priority);
        let _ = canonicalize(&AssetId::new("Y"), &AssetId::new("X"), &priority);
    }

    #[test]
    fn test_identical_assets_do_not_crash() {
        let x = AssetId::new("X");
        let _ = canonicalize(&x, &x, &ids(&["X"]));
        let _ = canonicalize(&x, &x, &[]);
    }
}
