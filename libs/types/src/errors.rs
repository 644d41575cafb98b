//! Error types for the DEX order client
//!
//! One taxonomy shared by every layer. Lower layers keep their own small
//! enums where useful and convert into [`DexError`] at the boundary.

use thiserror::Error;

/// Top-level client error.
///
/// `Clone` so a single in-flight result can be handed to every waiter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DexError {
    /// Signing attempted without an unlocked wallet. Never retried.
    #[error("Authentication required: wallet private key is unavailable")]
    AuthenticationRequired,

    /// Transport-level failure, propagated unchanged.
    #[error("Network failure: {0}")]
    NetworkFailure(String),

    /// Malformed identifier, payload field or response shape.
    #[error("Decode failure: {0}")]
    DecodeFailure(String),

    /// Checked timestamp arithmetic overflowed.
    #[error("Timestamp overflow: {0}")]
    TimestampOverflow(String),
}

impl DexError {
    pub fn decode(message: impl Into<String>) -> Self {
        DexError::DecodeFailure(message.into())
    }

    pub fn network(message: impl Into<String>) -> Self {
        DexError::NetworkFailure(message.into())
    }
}

pub type DexResult<T> = Result<T, DexError>;
