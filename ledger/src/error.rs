//! Ledger error types.

use exchanger_common::Currency;
use exchanger_fx::FxError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Why an exchange was refused. The ledger is unchanged in every case.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExchangeError {
    /// Rate lookup or conversion failed.
    #[error(transparent)]
    Rate(#[from] FxError),

    /// Source balance does not cover the debit.
    #[error("Insufficient {currency} balance: required {required}, available {available}")]
    InsufficientBalance {
        currency: Currency,
        required: Decimal,
        available: Decimal,
    },

    /// Nothing to exchange.
    #[error("Invalid exchange amount: {0}")]
    InvalidAmount(Decimal),

    /// A resulting balance does not fit in a `Decimal`.
    #[error("{0} balance overflow")]
    BalanceOverflow(Currency),

    /// No rate snapshot has arrived yet.
    #[error("Exchange rate not available yet")]
    RateUnavailable,
}

impl ExchangeError {
    /// Error code for logs and display.
    pub fn error_code(&self) -> &'static str {
        match self {
            ExchangeError::Rate(FxError::MissingRate(_)) => "MISSING_RATE",
            ExchangeError::Rate(FxError::InvalidRate { .. }) => "INVALID_RATE",
            ExchangeError::Rate(FxError::InvalidAmount(_)) => "INVALID_AMOUNT",
            ExchangeError::Rate(FxError::AmountOverflow { .. }) => "AMOUNT_OVERFLOW",
            ExchangeError::Rate(FxError::ProviderError(_)) => "PROVIDER_ERROR",
            ExchangeError::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            ExchangeError::InvalidAmount(_) => "INVALID_AMOUNT",
            ExchangeError::BalanceOverflow(_) => "BALANCE_OVERFLOW",
            ExchangeError::RateUnavailable => "RATE_UNAVAILABLE",
        }
    }
}
