//! Mapping of transport and parsing failures into [`DexError`]
//!
//! Every collaborator returns `DexResult`, so each foreign error type gets
//! one classification function here.

use types::errors::DexError;

/// Classify a `reqwest` failure.
///
/// Body decode errors mean the matcher answered with an unexpected shape;
/// everything else (connect, timeout, error status) is a network failure.
pub fn from_reqwest(err: reqwest::Error) -> DexError {
    if err.is_decode() {
        DexError::decode(err.to_string())
    } else {
        DexError::network(err.to_string())
    }
}

pub fn from_json(err: serde_json::Error) -> DexError {
    DexError::decode(format!("invalid JSON: {}", err))
}

pub fn from_csv(err: csv::Error) -> DexError {
    DexError::decode(format!("invalid CSV: {}", err))
}
