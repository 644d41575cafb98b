//! Identifier types for DEX entities
//!
//! Asset and order identifiers are base58 strings issued by the network.
//! They stay opaque strings until a payload needs their raw bytes.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{DexError, DexResult};

/// Identifier of the network's native asset.
pub const NATIVE_ASSET_ID: &str = "WAVES";

/// Identifier of a tradable asset
///
/// The native asset has no issued id; it is spelled [`NATIVE_ASSET_ID`]
/// (or left empty) and encodes as "absent" in signed payloads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The network's native asset
    pub fn native() -> Self {
        Self(NATIVE_ASSET_ID.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_native(&self) -> bool {
        self.0.is_empty() || self.0 == NATIVE_ASSET_ID
    }

    /// Decode the base58 id into raw bytes.
    pub fn decode(&self) -> DexResult<Vec<u8>> {
        bs58::decode(&self.0)
            .into_vec()
            .map_err(|e| DexError::decode(format!("asset id {}: {}", self.0, e)))
    }

    /// Best-effort decode: malformed ids yield an empty byte sequence.
    pub fn decode_or_empty(&self) -> Vec<u8> {
        self.decode().unwrap_or_default()
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AssetId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Matcher-assigned order identifier (base58)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Raw id bytes, as signed in cancel requests.
    pub fn decode(&self) -> DexResult<Vec<u8>> {
        bs58::decode(&self.0)
            .into_vec()
            .map_err(|e| DexError::decode(format!("order id {}: {}", self.0, e)))
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for OrderId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Wallet address; keys per-account state such as spam lists and favorites.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
