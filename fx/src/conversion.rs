//! Pairwise rates and amount conversion.
//!
//! Both functions are pure: the result depends only on the arguments.

use exchanger_common::{round_amount, Currency};
use rust_decimal::Decimal;

use crate::error::{FxError, FxResult};
use crate::snapshot::RateSnapshot;

/// Units of `destination` per one unit of `source`.
///
/// Computed as the cross rate `rate(destination) / rate(source)`. Returns
/// exactly one when both currencies are the same.
pub fn pairwise_rate(
    source: Currency,
    destination: Currency,
    snapshot: &RateSnapshot,
) -> FxResult<Decimal> {
    let source_rate = positive_rate(snapshot, source)?;
    let destination_rate = positive_rate(snapshot, destination)?;

    if source == destination {
        return Ok(Decimal::ONE);
    }

    destination_rate
        .checked_div(source_rate)
        .ok_or(FxError::AmountOverflow {
            from: source,
            to: destination,
        })
}

/// Convert `amount` of `from` into `to`, rounded half-up to two places.
pub fn convert_amount(
    from: Currency,
    to: Currency,
    snapshot: &RateSnapshot,
    amount: Decimal,
) -> FxResult<Decimal> {
    if amount < Decimal::ZERO {
        return Err(FxError::InvalidAmount(amount));
    }

    let rate = pairwise_rate(from, to, snapshot)?;
    let converted = amount
        .checked_mul(rate)
        .ok_or(FxError::AmountOverflow { from, to })?;

    Ok(round_amount(converted))
}

fn positive_rate(snapshot: &RateSnapshot, currency: Currency) -> FxResult<Decimal> {
    let rate = snapshot.rate(currency)?;
    if rate <= Decimal::ZERO {
        return Err(FxError::InvalidRate { currency, rate });
    }
    Ok(rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn eur_gbp() -> RateSnapshot {
        RateSnapshot::from_pairs(
            Currency::Eur,
            [(Currency::Eur, dec!(1)), (Currency::Gbp, dec!(0.85))],
        )
        .unwrap()
    }

    fn full_snapshot() -> RateSnapshot {
        RateSnapshot::from_pairs(
            Currency::Eur,
            [
                (Currency::Eur, dec!(1)),
                (Currency::Gbp, dec!(0.8571)),
                (Currency::Usd, dec!(1.0832)),
                (Currency::Chf, dec!(0.9613)),
                (Currency::Jpy, dec!(161.27)),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_pairwise_rate() {
        let snapshot = eur_gbp();

        assert_eq!(
            pairwise_rate(Currency::Eur, Currency::Gbp, &snapshot).unwrap(),
            dec!(0.85)
        );
        assert_eq!(
            pairwise_rate(Currency::Gbp, Currency::Gbp, &snapshot).unwrap(),
            Decimal::ONE
        );
    }

    #[test]
    fn test_pairwise_rate_missing_currency() {
        let snapshot = eur_gbp();

        assert_eq!(
            pairwise_rate(Currency::Eur, Currency::Usd, &snapshot),
            Err(FxError::MissingRate(Currency::Usd))
        );
        assert_eq!(
            pairwise_rate(Currency::Chf, Currency::Eur, &snapshot),
            Err(FxError::MissingRate(Currency::Chf))
        );
    }

    #[test]
    fn test_convert_amount() {
        let snapshot = eur_gbp();

        assert_eq!(
            convert_amount(Currency::Eur, Currency::Gbp, &snapshot, dec!(100)).unwrap(),
            dec!(85.00)
        );
        assert_eq!(
            convert_amount(Currency::Eur, Currency::Gbp, &snapshot, dec!(200)).unwrap(),
            dec!(170.00)
        );
        // 10 / 0.85 = 11.7647...
        assert_eq!(
            convert_amount(Currency::Gbp, Currency::Eur, &snapshot, dec!(10)).unwrap(),
            dec!(11.76)
        );
    }

    #[test]
    fn test_convert_zero_and_negative() {
        let snapshot = eur_gbp();

        assert_eq!(
            convert_amount(Currency::Eur, Currency::Gbp, &snapshot, Decimal::ZERO).unwrap(),
            Decimal::ZERO
        );
        assert_eq!(
            convert_amount(Currency::Eur, Currency::Gbp, &snapshot, dec!(-1)),
            Err(FxError::InvalidAmount(dec!(-1)))
        );
        assert_eq!(
            convert_amount(Currency::Eur, Currency::Usd, &snapshot, dec!(5)),
            Err(FxError::MissingRate(Currency::Usd))
        );
    }

    #[test]
    fn test_convert_overflow_is_an_error() {
        let snapshot = full_snapshot();
        let huge = dec!(1000000000000000000000000000);

        assert_eq!(
            convert_amount(Currency::Eur, Currency::Jpy, &snapshot, huge),
            Err(FxError::AmountOverflow {
                from: Currency::Eur,
                to: Currency::Jpy,
            })
        );
        // The other direction shrinks and fits
        assert!(convert_amount(Currency::Jpy, Currency::Eur, &snapshot, huge).is_ok());
    }

    #[test]
    fn test_pairwise_rate_overflow_is_an_error() {
        let snapshot = RateSnapshot::from_pairs(
            Currency::Eur,
            [
                (Currency::Eur, dec!(0.0000000000000000000000000001)),
                (Currency::Jpy, dec!(1000000000000)),
            ],
        )
        .unwrap();

        assert_eq!(
            pairwise_rate(Currency::Eur, Currency::Jpy, &snapshot),
            Err(FxError::AmountOverflow {
                from: Currency::Eur,
                to: Currency::Jpy,
            })
        );
    }

    fn currency() -> impl Strategy<Value = Currency> {
        prop::sample::select(Currency::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_identity_rate_is_one(c in currency()) {
            prop_assert_eq!(pairwise_rate(c, c, &full_snapshot()).unwrap(), Decimal::ONE);
        }

        #[test]
        fn prop_inverse_rates_multiply_to_one(a in currency(), b in currency()) {
            let snapshot = full_snapshot();
            let product = pairwise_rate(a, b, &snapshot).unwrap()
                * pairwise_rate(b, a, &snapshot).unwrap();
            prop_assert!((product - Decimal::ONE).abs() < dec!(0.000000001));
        }

        #[test]
        fn prop_zero_converts_to_zero(a in currency(), b in currency()) {
            prop_assert_eq!(
                convert_amount(a, b, &full_snapshot(), Decimal::ZERO).unwrap(),
                Decimal::ZERO
            );
        }

        #[test]
        fn prop_round_trip_within_rounding(
            a in currency(),
            b in currency(),
            cents in 0u64..100_000_000,
        ) {
            let snapshot = full_snapshot();
            let amount = Decimal::new(cents as i64, 2);
            let rate = pairwise_rate(a, b, &snapshot).unwrap();

            let there = convert_amount(a, b, &snapshot, amount).unwrap();
            let back = convert_amount(b, a, &snapshot, there).unwrap();

            // Each leg loses at most half a cent, the first one scaled by the
            // inverse rate on the way back.
            let tolerance = dec!(0.005) / rate + dec!(0.005) + dec!(0.0000001);
            prop_assert!((back - amount).abs() <= tolerance);
        }
    }
}
