//! FX error types.

use exchanger_common::Currency;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised by snapshots, conversions and rate providers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FxError {
    /// Currency has no entry in the rate snapshot.
    #[error("Rate not available for {0}")]
    MissingRate(Currency),

    /// Rate is zero or negative.
    #[error("Invalid rate {rate} for {currency}")]
    InvalidRate { currency: Currency, rate: Decimal },

    /// Amount is negative.
    #[error("Invalid amount: {0}")]
    InvalidAmount(Decimal),

    /// Result does not fit in a `Decimal`.
    #[error("Amount overflow converting {from} to {to}")]
    AmountOverflow { from: Currency, to: Currency },

    /// Provider failed to produce a snapshot.
    #[error("Rate provider error: {0}")]
    ProviderError(String),
}

impl FxError {
    /// Whether the next refresh may clear this error.
    pub fn is_transient(&self) -> bool {
        matches!(self, FxError::MissingRate(_) | FxError::ProviderError(_))
    }
}

/// Result type for FX operations.
pub type FxResult<T> = Result<T, FxError>;
