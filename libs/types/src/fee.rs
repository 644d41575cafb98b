//! Matcher fee settings

use serde::{Deserialize, Serialize};

use crate::errors::{DexError, DexResult};
use crate::ids::AssetId;

/// Base matcher fee in native asset units.
pub const DEFAULT_BASE_FEE: i64 = 300_000;

/// Fee rate of the native asset relative to itself.
pub const NATIVE_FEE_RATE: f64 = 1.0;

/// An asset accepted for paying the matcher fee, with its rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeAsset {
    pub asset_id: AssetId,
    pub rate: f64,
}

/// Fee settings used to price an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsOrderFee {
    pub base_fee: i64,
    pub fee_assets: Vec<FeeAsset>,
}

impl SettingsOrderFee {
    pub fn new(fee_assets: Vec<FeeAsset>) -> Self {
        Self {
            base_fee: DEFAULT_BASE_FEE,
            fee_assets,
        }
    }

    /// Settings from the matcher's rate table. A rate that is not a
    /// finite non-negative number rejects the whole table.
    pub fn from_rates<I>(rates: I) -> DexResult<Self>
    where
        I: IntoIterator<Item = (AssetId, f64)>,
    {
        let fee_assets = rates
            .into_iter()
            .map(|(asset_id, rate)| {
                if rate.is_finite() && rate >= 0.0 {
                    Ok(FeeAsset { asset_id, rate })
                } else {
                    Err(DexError::decode(format!("fee rate of {}: {}", asset_id, rate)))
                }
            })
            .collect::<DexResult<Vec<_>>>()?;
        Ok(Self::new(fee_assets))
    }

    /// Settings used whenever the rate table cannot be fetched:
    /// the base fee, payable in the native asset only.
    pub fn fallback() -> Self {
        Self::new(vec![FeeAsset {
            asset_id: AssetId::native(),
            rate: NATIVE_FEE_RATE,
        }])
    }

    /// Fee in units of `asset_id`, if that asset is accepted.
    ///
    /// Rounds up so the matcher never sees an underpaid fee.
    pub fn fee_in(&self, asset_id: &AssetId) -> Option<i64> {
        self.fee_assets
            .iter()
            .find(|asset| &asset.asset_id == asset_id)
            .map(|asset| (self.base_fee as f64 * asset.rate).ceil() as i64)
    }
}
