//! Currency types and amount rounding.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Decimal places used for every displayed amount and stored balance.
pub const AMOUNT_DECIMAL_PLACES: u32 = 2;

/// Round an amount to [`AMOUNT_DECIMAL_PLACES`] using round-half-up.
///
/// Midpoints move away from zero, which is half-up for the non-negative
/// amounts the widget deals with. Ledger balances and derived field amounts
/// all go through this function so they agree to the cent. The result always
/// carries exactly two decimal places.
pub fn round_amount(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(AMOUNT_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(AMOUNT_DECIMAL_PLACES);
    rounded
}

/// A currency supported by the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Eur,
    Gbp,
    Usd,
    Chf,
    Jpy,
}

impl Currency {
    /// Every supported currency, in display order.
    pub const ALL: [Currency; 5] = [
        Currency::Eur,
        Currency::Gbp,
        Currency::Usd,
        Currency::Chf,
        Currency::Jpy,
    ];

    /// ISO 4217 code.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Usd => "USD",
            Currency::Chf => "CHF",
            Currency::Jpy => "JPY",
        }
    }

    /// Symbol shown next to amounts and in the live rate label.
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Eur => "€",
            Currency::Gbp => "£",
            Currency::Usd => "$",
            Currency::Chf => "CHF",
            Currency::Jpy => "¥",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned when a string is not a supported currency code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported currency: {0}")]
pub struct ParseCurrencyError(pub String);

impl FromStr for Currency {
    type Err = ParseCurrencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        Currency::ALL
            .into_iter()
            .find(|c| c.code() == code)
            .ok_or(ParseCurrencyError(s.to_string()))
    }
}

/// An ordered currency pair, source first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyPair {
    /// Currency being sold.
    pub source: Currency,
    /// Currency being bought.
    pub destination: Currency,
}

impl CurrencyPair {
    /// Create a new currency pair.
    pub fn new(source: Currency, destination: Currency) -> Self {
        Self {
            source,
            destination,
        }
    }

    /// Get the inverse pair.
    pub fn inverse(&self) -> Self {
        Self {
            source: self.destination,
            destination: self.source,
        }
    }

    /// Human readable rate label, e.g. `1 € = 0.85 £`.
    pub fn rate_label(&self, rate: Decimal) -> String {
        format!(
            "1 {} = {} {}",
            self.source.symbol(),
            rate.normalize(),
            self.destination.symbol()
        )
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.source, self.destination)
    }
}
