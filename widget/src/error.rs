//! Widget error types.

use exchanger_ledger::ExchangeError;
use thiserror::Error;

/// Errors surfaced by a mounted widget.
#[derive(Debug, Error)]
pub enum WidgetError {
    /// Widget is not mounted or already unmounting.
    #[error("Widget is not running")]
    NotRunning,

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Exchange refused by the ledger.
    #[error(transparent)]
    Exchange(#[from] ExchangeError),
}
