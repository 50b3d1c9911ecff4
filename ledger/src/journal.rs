//! Records of applied exchanges.

use chrono::{DateTime, Utc};
use exchanger_common::{Currency, CurrencyPair};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryType {
    /// Balance decreased.
    Debit,
    /// Balance increased.
    Credit,
}

/// One leg of an exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub entry_type: EntryType,
    pub currency: Currency,
    pub amount: Decimal,
    /// Balance of `currency` after this entry.
    pub balance_after: Decimal,
}

/// Both legs of a successful exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeReceipt {
    /// Unique exchange ID.
    pub id: Uuid,
    /// Source leg.
    pub debit: LedgerEntry,
    /// Destination leg.
    pub credit: LedgerEntry,
    /// Pairwise rate applied.
    pub rate: Decimal,
    /// When the exchange was applied.
    pub executed_at: DateTime<Utc>,
}

impl ExchangeReceipt {
    /// Create a receipt for two legs.
    pub fn new(debit: LedgerEntry, credit: LedgerEntry, rate: Decimal) -> Self {
        Self {
            id: Uuid::now_v7(),
            debit,
            credit,
            rate,
            executed_at: Utc::now(),
        }
    }

    /// The currency pair exchanged.
    pub fn pair(&self) -> CurrencyPair {
        CurrencyPair::new(self.debit.currency, self.credit.currency)
    }
}
