//! Widget configuration.

use std::collections::BTreeMap;
use std::time::Duration;

use exchanger_common::Currency;
use exchanger_ledger::FundsPolicy;
use rust_decimal::Decimal;

/// Main widget configuration.
#[derive(Debug, Clone)]
pub struct ExchangerConfig {
    /// How often the rate snapshot is refreshed.
    pub refresh_interval: Duration,
    /// Currency selected in the source field at mount.
    pub source_currency: Currency,
    /// Currency selected in the destination field at mount.
    pub destination_currency: Currency,
    /// Mock balances at mount.
    pub initial_balances: BTreeMap<Currency, Decimal>,
    /// Whether an exchange may overdraw the source balance.
    pub funds_policy: FundsPolicy,
    /// Capacity of the widget's event queue.
    pub event_queue_capacity: usize,
    /// Log level.
    pub log_level: String,
}

impl Default for ExchangerConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(10),
            source_currency: Currency::Eur,
            destination_currency: Currency::Gbp,
            initial_balances: BTreeMap::from([
                (Currency::Eur, Decimal::from(1000)),
                (Currency::Gbp, Decimal::from(1234)),
                (Currency::Usd, Decimal::ZERO),
                (Currency::Chf, Decimal::ZERO),
                (Currency::Jpy, Decimal::ZERO),
            ]),
            funds_policy: FundsPolicy::Strict,
            event_queue_capacity: 64,
            log_level: "info".to_string(),
        }
    }
}

impl ExchangerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(ms) = std::env::var("EXCHANGER_REFRESH_INTERVAL_MS") {
            if let Ok(ms) = ms.parse() {
                config.refresh_interval = Duration::from_millis(ms);
            }
        }

        if let Ok(code) = std::env::var("EXCHANGER_SOURCE_CURRENCY") {
            if let Ok(currency) = code.parse() {
                config.source_currency = currency;
            }
        }

        if let Ok(code) = std::env::var("EXCHANGER_DESTINATION_CURRENCY") {
            if let Ok(currency) = code.parse() {
                config.destination_currency = currency;
            }
        }

        if let Ok(policy) = std::env::var("EXCHANGER_FUNDS_POLICY") {
            match policy.to_lowercase().as_str() {
                "strict" => config.funds_policy = FundsPolicy::Strict,
                "permissive" => config.funds_policy = FundsPolicy::Permissive,
                _ => {}
            }
        }

        if let Ok(capacity) = std::env::var("EXCHANGER_EVENT_QUEUE") {
            if let Ok(capacity) = capacity.parse() {
                config.event_queue_capacity = capacity;
            }
        }

        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.log_level = level;
        }

        config
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.refresh_interval.is_zero() {
            return Err("Refresh interval cannot be 0".to_string());
        }

        if self.event_queue_capacity == 0 {
            return Err("Event queue capacity cannot be 0".to_string());
        }

        if let Some((currency, _)) = self
            .initial_balances
            .iter()
            .find(|(_, balance)| balance.is_sign_negative() && !balance.is_zero())
        {
            return Err(format!("Initial {} balance cannot be negative", currency));
        }

        Ok(())
    }
}
