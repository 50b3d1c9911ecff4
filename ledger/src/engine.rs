//! Exchange application against the balance ledger.

use std::sync::Arc;

use exchanger_common::{round_amount, ExchangeField, ExchangePair};
use exchanger_fx::{pairwise_rate, FxError, RateSnapshot};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::balance::BalanceLedger;
use crate::error::ExchangeError;
use crate::journal::{EntryType, ExchangeReceipt, LedgerEntry};
use crate::notification::{NotificationSink, Severity};

const SUCCESS_MESSAGE: &str = "Successfully exchanged currency";
const FAILURE_MESSAGE: &str = "Exchange failed. Try again.";

/// Whether an exchange may overdraw the source balance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FundsPolicy {
    /// Refuse debits larger than the source balance.
    #[default]
    Strict,
    /// Apply the debit regardless; balances may go negative.
    Permissive,
}

/// Apply one exchange to `ledger`, returning the updated copy.
///
/// Debits `source.amount()` from the source currency and credits
/// `round(source.amount() * rate)` to the destination currency. Both legs land
/// in the returned ledger or neither does; `ledger` itself is untouched.
pub fn apply_exchange(
    source: &ExchangeField,
    destination: &ExchangeField,
    rate: Decimal,
    ledger: &BalanceLedger,
    policy: FundsPolicy,
) -> Result<(BalanceLedger, ExchangeReceipt), ExchangeError> {
    let debit = round_amount(source.amount());
    if debit <= Decimal::ZERO {
        return Err(ExchangeError::InvalidAmount(source.amount()));
    }

    if rate <= Decimal::ZERO {
        return Err(FxError::InvalidRate {
            currency: destination.currency(),
            rate,
        }
        .into());
    }

    let available = ledger.balance(source.currency());
    if policy == FundsPolicy::Strict && !ledger.has_sufficient_funds(source.currency(), debit) {
        return Err(ExchangeError::InsufficientBalance {
            currency: source.currency(),
            required: debit,
            available,
        });
    }

    let credit = debit
        .checked_mul(rate)
        .map(round_amount)
        .ok_or(FxError::AmountOverflow {
            from: source.currency(),
            to: destination.currency(),
        })?;

    let mut next = ledger.clone();
    let debit_balance = available
        .checked_sub(debit)
        .ok_or(ExchangeError::BalanceOverflow(source.currency()))?;
    next.set_balance(source.currency(), debit_balance);
    let credit_balance = next
        .balance(destination.currency())
        .checked_add(credit)
        .ok_or(ExchangeError::BalanceOverflow(destination.currency()))?;
    next.set_balance(destination.currency(), credit_balance);

    let receipt = ExchangeReceipt::new(
        LedgerEntry {
            entry_type: EntryType::Debit,
            currency: source.currency(),
            amount: debit,
            balance_after: next.balance(source.currency()),
        },
        LedgerEntry {
            entry_type: EntryType::Credit,
            currency: destination.currency(),
            amount: credit,
            balance_after: next.balance(destination.currency()),
        },
        rate,
    );

    Ok((next, receipt))
}

/// Owns the widget's ledger and reports every exchange attempt to the user.
pub struct LedgerEngine {
    ledger: BalanceLedger,
    policy: FundsPolicy,
    sink: Arc<dyn NotificationSink>,
}

impl LedgerEngine {
    /// Create an engine over initial balances.
    pub fn new(ledger: BalanceLedger, policy: FundsPolicy, sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            ledger,
            policy,
            sink,
        }
    }

    /// Current balances.
    pub fn ledger(&self) -> &BalanceLedger {
        &self.ledger
    }

    pub fn policy(&self) -> FundsPolicy {
        self.policy
    }

    /// Exchange the source field's amount into the destination currency at
    /// the snapshot's current pairwise rate.
    ///
    /// Emits exactly one notification. On error the ledger is unchanged.
    #[instrument(skip(self, pair, snapshot), fields(pair = %pair.currency_pair(), amount = %pair.source.amount()))]
    pub fn exchange(
        &mut self,
        pair: &ExchangePair,
        snapshot: Option<&RateSnapshot>,
    ) -> Result<ExchangeReceipt, ExchangeError> {
        match self.try_exchange(pair, snapshot) {
            Ok((ledger, receipt)) => {
                self.ledger = ledger;

                info!(
                    exchange_id = %receipt.id,
                    debit = %receipt.debit.amount,
                    credit = %receipt.credit.amount,
                    rate = %receipt.rate,
                    "Exchange applied"
                );
                self.sink.notify(SUCCESS_MESSAGE, Severity::Success);

                Ok(receipt)
            }
            Err(e) => {
                warn!(error = %e, code = e.error_code(), "Exchange rejected");
                self.sink.notify(FAILURE_MESSAGE, Severity::Error);

                Err(e)
            }
        }
    }

    fn try_exchange(
        &self,
        pair: &ExchangePair,
        snapshot: Option<&RateSnapshot>,
    ) -> Result<(BalanceLedger, ExchangeReceipt), ExchangeError> {
        let snapshot = snapshot.ok_or(ExchangeError::RateUnavailable)?;
        let rate = pairwise_rate(pair.source.currency(), pair.destination.currency(), snapshot)?;

        apply_exchange(&pair.source, &pair.destination, rate, &self.ledger, self.policy)
    }
}
