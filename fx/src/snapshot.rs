//! Pivot-relative rate snapshots.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use exchanger_common::Currency;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{FxError, FxResult};

/// Rates of every known currency relative to one pivot currency, expressed
/// as units of the currency per one unit of the pivot.
///
/// A snapshot is immutable. Refreshing replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateSnapshot {
    pivot: Currency,
    rates: BTreeMap<Currency, Decimal>,
    fetched_at: DateTime<Utc>,
}

impl RateSnapshot {
    /// Build a snapshot, rejecting zero or negative rates.
    pub fn new(pivot: Currency, rates: BTreeMap<Currency, Decimal>) -> FxResult<Self> {
        if let Some((currency, rate)) = rates.iter().find(|(_, rate)| **rate <= Decimal::ZERO) {
            return Err(FxError::InvalidRate {
                currency: *currency,
                rate: *rate,
            });
        }

        Ok(Self {
            pivot,
            rates,
            fetched_at: Utc::now(),
        })
    }

    /// Build a snapshot from `(currency, rate)` pairs.
    pub fn from_pairs<I>(pivot: Currency, pairs: I) -> FxResult<Self>
    where
        I: IntoIterator<Item = (Currency, Decimal)>,
    {
        Self::new(pivot, pairs.into_iter().collect())
    }

    /// The pivot currency.
    pub fn pivot(&self) -> Currency {
        self.pivot
    }

    /// When the snapshot was taken.
    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// Rate of `currency` relative to the pivot.
    pub fn rate(&self, currency: Currency) -> FxResult<Decimal> {
        self.rates
            .get(&currency)
            .copied()
            .ok_or(FxError::MissingRate(currency))
    }

    /// Whether the snapshot has a rate for `currency`.
    pub fn contains(&self, currency: Currency) -> bool {
        self.rates.contains_key(&currency)
    }

    /// Supported currencies without a rate.
    pub fn missing(&self) -> Vec<Currency> {
        Currency::ALL
            .into_iter()
            .filter(|c| !self.contains(*c))
            .collect()
    }

    /// Whether every supported currency has a rate.
    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }

    /// Iterate over `(currency, rate)` entries in currency order.
    pub fn iter(&self) -> impl Iterator<Item = (Currency, Decimal)> + '_ {
        self.rates.iter().map(|(c, r)| (*c, *r))
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}
