//! Per-currency balances.

use std::collections::BTreeMap;

use exchanger_common::{round_amount, Currency};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Mock balance of each currency.
///
/// Currencies without an entry have a zero balance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceLedger {
    balances: BTreeMap<Currency, Decimal>,
}

impl BalanceLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger from initial balances, rounded to two places.
    pub fn with_balances<I>(balances: I) -> Self
    where
        I: IntoIterator<Item = (Currency, Decimal)>,
    {
        Self {
            balances: balances
                .into_iter()
                .map(|(currency, amount)| (currency, round_amount(amount)))
                .collect(),
        }
    }

    /// Balance of `currency`.
    pub fn balance(&self, currency: Currency) -> Decimal {
        self.balances.get(&currency).copied().unwrap_or(Decimal::ZERO)
    }

    /// Whether the balance of `currency` covers `amount`.
    pub fn has_sufficient_funds(&self, currency: Currency, amount: Decimal) -> bool {
        self.balance(currency) >= amount
    }

    /// Iterate over `(currency, balance)` entries in currency order.
    pub fn iter(&self) -> impl Iterator<Item = (Currency, Decimal)> + '_ {
        self.balances.iter().map(|(c, b)| (*c, *b))
    }

    /// Snapshot of the balances as a map.
    pub fn to_map(&self) -> BTreeMap<Currency, Decimal> {
        self.balances.clone()
    }

    pub(crate) fn set_balance(&mut self, currency: Currency, amount: Decimal) {
        self.balances.insert(currency, round_amount(amount));
    }
}
