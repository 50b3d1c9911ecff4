//! What the display layer receives.

use std::collections::BTreeMap;
use std::fmt;

use exchanger_common::{Currency, ExchangeField};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::synchronizer::Synchronizer;
use exchanger_ledger::BalanceLedger;

/// Decimal places of the live rate shown to the user.
const LIVE_RATE_DISPLAY_PLACES: u32 = 6;

/// Read-only state of the widget at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExchangeView {
    pub source: ExchangeField,
    pub destination: ExchangeField,
    /// Units of destination per unit of source.
    pub live_rate: Option<Decimal>,
    /// e.g. `1 € = 0.85 £`.
    pub live_rate_label: Option<String>,
    /// No rates yet; show a spinner instead of the fields.
    pub loading: bool,
    /// Rates are present but the current pair could not be priced.
    pub degraded: bool,
    pub balances: BTreeMap<Currency, Decimal>,
}

impl ExchangeView {
    pub(crate) fn capture(sync: &Synchronizer, ledger: &BalanceLedger) -> Self {
        let pair = sync.pair().currency_pair();
        let live_rate = sync.live_rate();

        Self {
            source: *sync.source(),
            destination: *sync.destination(),
            live_rate,
            live_rate_label: live_rate
                .map(|rate| pair.rate_label(rate.round_dp(LIVE_RATE_DISPLAY_PLACES))),
            loading: sync.is_loading(),
            degraded: sync.is_degraded(),
            balances: ledger.to_map(),
        }
    }

    /// Balance of the source currency.
    pub fn source_balance(&self) -> Decimal {
        self.balances
            .get(&self.source.currency())
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Balance of the destination currency.
    pub fn destination_balance(&self) -> Decimal {
        self.balances
            .get(&self.destination.currency())
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}

impl fmt::Display for ExchangeView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.loading {
            return f.write_str("loading rates...");
        }

        write!(
            f,
            "{} (balance {}) -> {} (balance {})",
            self.source,
            self.source_balance(),
            self.destination,
            self.destination_balance()
        )?;

        match &self.live_rate_label {
            Some(label) => write!(f, " | {}", label),
            None => f.write_str(" | rate unavailable"),
        }
    }
}
