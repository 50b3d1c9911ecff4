//! Exchanger Ledger
//!
//! Per-currency mock balances, debited and credited together when the user
//! exchanges currency.

pub mod balance;
pub mod engine;
pub mod error;
pub mod journal;
pub mod notification;

pub use balance::BalanceLedger;
pub use engine::{apply_exchange, FundsPolicy, LedgerEngine};
pub use error::ExchangeError;
pub use journal::{EntryType, ExchangeReceipt, LedgerEntry};
pub use notification::{NotificationSink, RecordingSink, Severity, TracingSink};
