//! Rate provider that random-walks a set of base rates.

use std::collections::BTreeMap;

use async_trait::async_trait;
use exchanger_common::Currency;
use exchanger_fx::{FxResult, RateProvider, RateSnapshot};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use tracing::debug;

/// Largest move per fetch, in basis points.
const MAX_STEP_BPS: i64 = 50;

/// EUR-pivoted rates that drift a little on every fetch.
pub struct SimulatedRateProvider {
    rng: Mutex<StdRng>,
    rates: Mutex<BTreeMap<Currency, Decimal>>,
}

impl SimulatedRateProvider {
    /// Create a provider; a seed makes the walk reproducible.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };

        Self {
            rng: Mutex::new(rng),
            rates: Mutex::new(BTreeMap::from([
                (Currency::Eur, Decimal::ONE),
                (Currency::Gbp, Decimal::new(8571, 4)),
                (Currency::Usd, Decimal::new(10832, 4)),
                (Currency::Chf, Decimal::new(9613, 4)),
                (Currency::Jpy, Decimal::new(16127, 2)),
            ])),
        }
    }
}

#[async_trait]
impl RateProvider for SimulatedRateProvider {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn fetch_latest_snapshot(&self) -> FxResult<RateSnapshot> {
        let mut rng = self.rng.lock();
        let mut rates = self.rates.lock();

        for (currency, rate) in rates.iter_mut() {
            if *currency == Currency::Eur {
                continue;
            }
            let step = Decimal::new(rng.gen_range(-MAX_STEP_BPS..=MAX_STEP_BPS), 4);
            *rate = (*rate * (Decimal::ONE + step)).round_dp(6);
        }

        debug!(rates = ?*rates, "Simulated rates moved");
        RateSnapshot::new(Currency::Eur, rates.clone())
    }
}
