//! Clock-skew correction
//!
//! The matcher validates order timestamps against its own clock. A local
//! timestamp `T` is rebased with the measured `local - server` offset `D`:
//!
//! ```text
//! corrected  = T - D
//! expiration = corrected + E * 60_000
//! ```
//!
//! All arithmetic is checked; overflow is an error, never a wrap.

use types::errors::DexError;

/// Milliseconds in one minute.
pub const MILLIS_PER_MINUTE: i64 = 60_000;

/// Errors from checked timestamp arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClockError {
    #[error("overflow correcting timestamp {timestamp} by offset {offset}")]
    CorrectionOverflow { timestamp: i64, offset: i64 },

    #[error("overflow computing expiration of {minutes} minutes from {timestamp}")]
    ExpirationOverflow { timestamp: i64, minutes: i64 },
}

impl From<ClockError> for DexError {
    fn from(err: ClockError) -> Self {
        DexError::TimestampOverflow(err.to_string())
    }
}

/// Corrected creation and expiration times of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTimestamps {
    pub timestamp: i64,
    pub expiration: i64,
}

/// Rebases local timestamps onto matcher time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClockSkewCorrector {
    server_diff_ms: i64,
}

impl ClockSkewCorrector {
    /// `server_diff_ms` is local time minus server time.
    pub fn new(server_diff_ms: i64) -> Self {
        Self { server_diff_ms }
    }

    /// Offset from a server reading and the local time it was taken at.
    pub fn measure(server_ms: i64, local_ms: i64) -> Result<Self, ClockError> {
        local_ms
            .checked_sub(server_ms)
            .map(Self::new)
            .ok_or(ClockError::CorrectionOverflow {
                timestamp: local_ms,
                offset: server_ms,
            })
    }

    pub fn server_diff(&self) -> i64 {
        self.server_diff_ms
    }

    pub fn correct(&self, local_ms: i64) -> Result<i64, ClockError> {
        local_ms
            .checked_sub(self.server_diff_ms)
            .ok_or(ClockError::CorrectionOverflow {
                timestamp: local_ms,
                offset: self.server_diff_ms,
            })
    }

    /// `corrected + minutes * 60_000`. Non-positive windows are not rejected.
    pub fn expiration(&self, corrected_ms: i64, minutes: i64) -> Result<i64, ClockError> {
        minutes
            .checked_mul(MILLIS_PER_MINUTE)
            .and_then(|window| corrected_ms.checked_add(window))
            .ok_or(ClockError::ExpirationOverflow {
                timestamp: corrected_ms,
                minutes,
            })
    }

    /// Corrected timestamp and expiration for an order created at `local_ms`.
    pub fn stamp(&self, local_ms: i64, minutes: i64) -> Result<OrderTimestamps, ClockError> {
        let timestamp = self.correct(local_ms)?;
        let expiration = self.expiration(timestamp, minutes)?;
        Ok(OrderTimestamps {
            timestamp,
            expiration,
        })
    }

    /// Corrected current time.
    pub fn now(&self) -> Result<i64, ClockError> {
        self.correct(local_now_millis())
    }
}

/// Local wall clock in unix millis.
pub fn local_now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
