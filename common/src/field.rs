//! The two linked `{currency, amount}` fields of the widget.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::monetary::{round_amount, Currency, CurrencyPair};

/// Which of the two fields an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldSide {
    Source,
    Destination,
}

impl FieldSide {
    /// The paired side.
    pub fn other(&self) -> Self {
        match self {
            FieldSide::Source => FieldSide::Destination,
            FieldSide::Destination => FieldSide::Source,
        }
    }
}

impl fmt::Display for FieldSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldSide::Source => f.write_str("source"),
            FieldSide::Destination => f.write_str("destination"),
        }
    }
}

/// A currency with the amount entered or derived for it.
///
/// Only built through [`ExchangeField::new`] and the `with_*` helpers, so the
/// amount always carries exactly two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExchangeField {
    currency: Currency,
    amount: Decimal,
}

impl ExchangeField {
    /// Create a field, rounding the amount.
    pub fn new(currency: Currency, amount: Decimal) -> Self {
        Self {
            currency,
            amount: round_amount(amount),
        }
    }

    /// Create a zero-amount field.
    pub fn zero(currency: Currency) -> Self {
        Self::new(currency, Decimal::ZERO)
    }

    /// Selected currency.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Amount, rounded to two decimal places.
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Same field with another currency.
    pub fn with_currency(self, currency: Currency) -> Self {
        Self { currency, ..self }
    }

    /// Same field with another (rounded) amount.
    pub fn with_amount(self, amount: Decimal) -> Self {
        Self::new(self.currency, amount)
    }
}

impl fmt::Display for ExchangeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

/// The source and destination fields together, plus the side the user last
/// typed an amount into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExchangePair {
    pub source: ExchangeField,
    pub destination: ExchangeField,
    /// The field whose amount is authoritative; the other one is derived.
    pub authoritative: FieldSide,
}

impl ExchangePair {
    /// Zero amounts in the given currencies, source authoritative.
    pub fn new(source: Currency, destination: Currency) -> Self {
        Self {
            source: ExchangeField::zero(source),
            destination: ExchangeField::zero(destination),
            authoritative: FieldSide::Source,
        }
    }

    /// Borrow one side.
    pub fn field(&self, side: FieldSide) -> &ExchangeField {
        match side {
            FieldSide::Source => &self.source,
            FieldSide::Destination => &self.destination,
        }
    }

    /// Mutably borrow one side.
    pub fn field_mut(&mut self, side: FieldSide) -> &mut ExchangeField {
        match side {
            FieldSide::Source => &mut self.source,
            FieldSide::Destination => &mut self.destination,
        }
    }

    /// The currencies as an ordered pair.
    pub fn currency_pair(&self) -> CurrencyPair {
        CurrencyPair::new(self.source.currency(), self.destination.currency())
    }

    /// Exchange source and destination wholesale.
    pub fn swapped(&self) -> Self {
        Self {
            source: self.destination,
            destination: self.source,
            authoritative: self.authoritative.other(),
        }
    }
}
