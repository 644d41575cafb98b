//! Market search by asset name or ticker
//!
//! `"btc"` matches markets whose amount asset name or ticker contains
//! "btc" (case-insensitive). `"btc / usd"` additionally requires the price
//! asset to match "usd". Several words on one side match if any of them
//! does. A side without words matches everything.

use types::asset::Asset;
use types::market::MarketPair;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Query {
    amount_words: Vec<String>,
    price_words: Vec<String>,
}

fn words(part: &str) -> Vec<String> {
    part.split_whitespace().map(str::to_lowercase).collect()
}

impl Query {
    fn parse(text: &str) -> Self {
        match text.split_once('/') {
            Some((amount, rest)) => {
                // anything after a second slash is ignored
                let price = rest.split('/').next().unwrap_or_default();
                Self {
                    amount_words: words(amount),
                    price_words: words(price),
                }
            }
            None => Self {
                amount_words: words(text),
                price_words: Vec::new(),
            },
        }
    }

    fn matches(&self, market: &MarketPair) -> bool {
        asset_matches(&market.amount_asset, &self.amount_words)
            && asset_matches(&market.price_asset, &self.price_words)
    }
}

fn asset_matches(asset: &Asset, words: &[String]) -> bool {
    if words.is_empty() {
        return true;
    }
    let name = asset.name.to_lowercase();
    let short_name = asset.short_name.to_lowercase();
    words
        .iter()
        .any(|word| name.contains(word.as_str()) || short_name.contains(word.as_str()))
}

/// Markets matching `text`, in their original order.
pub fn search_markets(markets: &[MarketPair], text: &str) -> Vec<MarketPair> {
    let query = Query::parse(text);
    markets
        .iter()
        .filter(|market| query.matches(market))
        .cloned()
        .collect()
}
