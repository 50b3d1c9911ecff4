//! Rate provider trait and an in-memory implementation.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use exchanger_common::Currency;
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{FxError, FxResult};
use crate::snapshot::RateSnapshot;

/// Source of rate snapshots.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Get the provider name.
    fn name(&self) -> &str;

    /// Fetch the latest rates of every currency the provider knows.
    async fn fetch_latest_snapshot(&self) -> FxResult<RateSnapshot>;
}

/// Provider serving rates held in memory.
///
/// Rates can be changed while the provider is in use, and the provider can
/// be told to fail so callers can exercise their stale-snapshot path.
pub struct StaticRateProvider {
    name: String,
    pivot: Currency,
    rates: DashMap<Currency, Decimal>,
    failing: AtomicBool,
}

impl StaticRateProvider {
    /// Create an empty provider quoting against `pivot`.
    pub fn new(name: impl Into<String>, pivot: Currency) -> Self {
        Self {
            name: name.into(),
            pivot,
            rates: DashMap::new(),
            failing: AtomicBool::new(false),
        }
    }

    /// Create a provider pre-loaded with rates.
    pub fn with_rates<I>(name: impl Into<String>, pivot: Currency, rates: I) -> Self
    where
        I: IntoIterator<Item = (Currency, Decimal)>,
    {
        let provider = Self::new(name, pivot);
        for (currency, rate) in rates {
            provider.set_rate(currency, rate);
        }
        provider
    }

    /// Set the rate of a currency.
    pub fn set_rate(&self, currency: Currency, rate: Decimal) {
        self.rates.insert(currency, rate);
    }

    /// Drop the rate of a currency.
    pub fn remove_rate(&self, currency: Currency) {
        self.rates.remove(&currency);
    }

    /// Make subsequent fetches fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl RateProvider for StaticRateProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_latest_snapshot(&self) -> FxResult<RateSnapshot> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(FxError::ProviderError(format!(
                "{} is unavailable",
                self.name
            )));
        }

        let snapshot = RateSnapshot::from_pairs(
            self.pivot,
            self.rates.iter().map(|entry| (*entry.key(), *entry.value())),
        )?;

        debug!(
            provider = %self.name,
            currencies = snapshot.len(),
            "Served rate snapshot"
        );

        Ok(snapshot)
    }
}
