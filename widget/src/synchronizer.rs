//! Keeps the source and destination fields consistent with the live rate.
//!
//! Every edit goes through [`next_pair`], which takes the whole previous
//! pair and returns the whole next pair, so the edited field and the field
//! derived from it always change together.

use std::sync::Arc;

use exchanger_common::{Currency, ExchangeField, ExchangePair, FieldSide};
use exchanger_fx::{convert_amount, pairwise_rate, FxError, FxResult, RateSnapshot};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A user edit of the linked fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Edit {
    /// Select another currency for one field.
    SetCurrency { side: FieldSide, currency: Currency },
    /// Type an amount into one field.
    SetAmount { side: FieldSide, amount: Decimal },
    /// Exchange source and destination.
    Swap,
}

/// What happened to an edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// Fields updated.
    Applied,
    /// No snapshot yet; fields unchanged.
    Deferred,
    /// Conversion failed; fields unchanged.
    Rejected(FxError),
}

/// Compute the pair that results from applying `edit` to `prev`.
///
/// Returns `Ok(None)` when the edit needs a rate and no snapshot has arrived
/// yet. Swapping relabels the fields and never consults the snapshot.
pub fn next_pair(
    prev: &ExchangePair,
    edit: &Edit,
    snapshot: Option<&RateSnapshot>,
) -> FxResult<Option<ExchangePair>> {
    match *edit {
        Edit::Swap => Ok(Some(prev.swapped())),
        Edit::SetCurrency { side, currency } => {
            let Some(snapshot) = snapshot else {
                return Ok(None);
            };

            let mut next = *prev;
            *next.field_mut(side) = next.field(side).with_currency(currency);
            derive_paired_amount(next, snapshot).map(Some)
        }
        Edit::SetAmount { side, amount } => {
            let Some(snapshot) = snapshot else {
                return Ok(None);
            };
            if amount < Decimal::ZERO {
                return Err(FxError::InvalidAmount(amount));
            }

            let mut next = *prev;
            *next.field_mut(side) = next.field(side).with_amount(amount);
            next.authoritative = side;
            derive_paired_amount(next, snapshot).map(Some)
        }
    }
}

/// Recompute the non-authoritative amount from the authoritative one.
fn derive_paired_amount(mut pair: ExchangePair, snapshot: &RateSnapshot) -> FxResult<ExchangePair> {
    let from = *pair.field(pair.authoritative);
    let derived_side = pair.authoritative.other();
    let derived = *pair.field(derived_side);

    let amount = convert_amount(from.currency(), derived.currency(), snapshot, from.amount())?;
    *pair.field_mut(derived_side) = derived.with_amount(amount);
    Ok(pair)
}

/// Owner of the linked fields, the latest snapshot and the live rate.
#[derive(Debug, Clone)]
pub struct Synchronizer {
    pair: ExchangePair,
    snapshot: Option<Arc<RateSnapshot>>,
    live_rate: Option<Decimal>,
    degraded: bool,
}

impl Synchronizer {
    /// Zero amounts in the given currencies; no snapshot yet.
    pub fn new(source: Currency, destination: Currency) -> Self {
        Self {
            pair: ExchangePair::new(source, destination),
            snapshot: None,
            live_rate: None,
            degraded: false,
        }
    }

    pub fn pair(&self) -> &ExchangePair {
        &self.pair
    }

    pub fn source(&self) -> &ExchangeField {
        &self.pair.source
    }

    pub fn destination(&self) -> &ExchangeField {
        &self.pair.destination
    }

    pub fn snapshot(&self) -> Option<&RateSnapshot> {
        self.snapshot.as_deref()
    }

    /// Units of destination per unit of source at the latest snapshot.
    pub fn live_rate(&self) -> Option<Decimal> {
        self.live_rate
    }

    /// No snapshot has arrived yet.
    pub fn is_loading(&self) -> bool {
        self.snapshot.is_none()
    }

    /// The last rate or conversion lookup failed against the current snapshot.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Apply an edit atomically.
    pub fn apply(&mut self, edit: Edit) -> EditOutcome {
        match next_pair(&self.pair, &edit, self.snapshot()) {
            Ok(Some(next)) => {
                self.pair = next;
                self.refresh_live_rate();
                EditOutcome::Applied
            }
            Ok(None) => {
                debug!(?edit, "Edit deferred until rates arrive");
                EditOutcome::Deferred
            }
            Err(e) => {
                debug!(?edit, error = %e, "Edit rejected");
                if e.is_transient() {
                    self.degraded = true;
                }
                EditOutcome::Rejected(e)
            }
        }
    }

    pub fn set_currency(&mut self, side: FieldSide, currency: Currency) -> EditOutcome {
        self.apply(Edit::SetCurrency { side, currency })
    }

    pub fn set_amount(&mut self, side: FieldSide, amount: Decimal) -> EditOutcome {
        self.apply(Edit::SetAmount { side, amount })
    }

    /// Exchange source and destination.
    ///
    /// Amounts are relabeled, never converted. The live rate is re-read from
    /// the snapshot for the new direction rather than inverted, so swapping
    /// back shows exactly the rate shown before.
    pub fn swap(&mut self) -> EditOutcome {
        self.apply(Edit::Swap)
    }

    /// Replace the snapshot and refresh the live rate.
    ///
    /// Amounts keep the values the user last saw; only the rate moves.
    pub fn on_snapshot_update(&mut self, snapshot: Arc<RateSnapshot>) -> Option<Decimal> {
        self.snapshot = Some(snapshot);
        self.refresh_live_rate();
        self.live_rate
    }

    fn refresh_live_rate(&mut self) {
        let Some(snapshot) = self.snapshot.as_deref() else {
            return;
        };

        match pairwise_rate(self.pair.source.currency(), self.pair.destination.currency(), snapshot) {
            Ok(rate) => {
                self.live_rate = Some(rate);
                self.degraded = false;
            }
            Err(e) => {
                debug!(pair = %self.pair.currency_pair(), error = %e, "Live rate unavailable");
                self.live_rate = None;
                self.degraded = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn eur_gbp() -> Arc<RateSnapshot> {
        Arc::new(
            RateSnapshot::from_pairs(
                Currency::Eur,
                [(Currency::Eur, dec!(1)), (Currency::Gbp, dec!(0.85))],
            )
            .unwrap(),
        )
    }

    fn ready() -> Synchronizer {
        let mut sync = Synchronizer::new(Currency::Eur, Currency::Gbp);
        sync.on_snapshot_update(eur_gbp());
        sync
    }

    #[test]
    fn test_set_destination_currency_derives_destination() {
        let mut sync = Synchronizer::new(Currency::Eur, Currency::Eur);
        sync.on_snapshot_update(eur_gbp());
        assert_eq!(sync.set_amount(FieldSide::Source, dec!(100)), EditOutcome::Applied);
        assert_eq!(sync.destination().amount(), dec!(100));

        assert_eq!(
            sync.set_currency(FieldSide::Destination, Currency::Gbp),
            EditOutcome::Applied
        );

        assert_eq!(sync.source(), &ExchangeField::new(Currency::Eur, dec!(100)));
        assert_eq!(sync.destination(), &ExchangeField::new(Currency::Gbp, dec!(85.00)));
        assert_eq!(sync.live_rate(), Some(dec!(0.85)));
    }

    #[test]
    fn test_set_source_amount() {
        let mut sync = ready();

        sync.set_amount(FieldSide::Source, dec!(200));

        assert_eq!(sync.destination().amount(), dec!(170.00));
        assert_eq!(sync.pair().authoritative, FieldSide::Source);
    }

    #[test]
    fn test_set_destination_amount_derives_source() {
        let mut sync = ready();

        sync.set_amount(FieldSide::Destination, dec!(85));

        assert_eq!(sync.source().amount(), dec!(100.00));
        assert_eq!(sync.pair().authoritative, FieldSide::Destination);

        // Destination stays authoritative across a currency change
        sync.set_currency(FieldSide::Source, Currency::Gbp);
        assert_eq!(sync.destination().amount(), dec!(85));
        assert_eq!(sync.source().amount(), dec!(85.00));
    }

    #[test]
    fn test_amount_is_rounded() {
        let mut sync = ready();

        sync.set_amount(FieldSide::Source, dec!(10.005));

        assert_eq!(sync.source().amount(), dec!(10.01));
        // 10.01 * 0.85 = 8.5085
        assert_eq!(sync.destination().amount(), dec!(8.51));
    }

    #[test]
    fn test_swap_relabels_without_converting() {
        let mut sync = ready();
        sync.set_amount(FieldSide::Source, dec!(100));
        let before = *sync.pair();

        assert_eq!(sync.swap(), EditOutcome::Applied);

        assert_eq!(sync.source(), &before.destination);
        assert_eq!(sync.destination(), &before.source);
        assert_eq!(sync.live_rate(), Some(dec!(1) / dec!(0.85)));

        sync.swap();
        assert_eq!(sync.pair(), &before);
    }

    #[test]
    fn test_edits_deferred_without_snapshot() {
        let mut sync = Synchronizer::new(Currency::Eur, Currency::Gbp);
        let before = *sync.pair();

        assert_eq!(sync.set_amount(FieldSide::Source, dec!(100)), EditOutcome::Deferred);
        assert_eq!(
            sync.set_currency(FieldSide::Destination, Currency::Usd),
            EditOutcome::Deferred
        );

        assert_eq!(sync.pair(), &before);
        assert!(sync.is_loading());
        assert_eq!(sync.live_rate(), None);

        // Swapping needs no rate
        assert_eq!(sync.swap(), EditOutcome::Applied);
        assert_eq!(sync.source().currency(), Currency::Gbp);
    }

    #[test]
    fn test_missing_rate_keeps_fields() {
        let mut sync = ready();
        sync.set_amount(FieldSide::Source, dec!(100));
        let before = *sync.pair();

        let outcome = sync.set_currency(FieldSide::Destination, Currency::Usd);

        assert_eq!(outcome, EditOutcome::Rejected(FxError::MissingRate(Currency::Usd)));
        assert_eq!(sync.pair(), &before);
        assert!(sync.is_degraded());
        assert_eq!(sync.live_rate(), Some(dec!(0.85)));
    }

    #[test]
    fn test_swap_without_rate_keeps_amounts() {
        let mut sync = ready();
        sync.set_amount(FieldSide::Source, dec!(100));
        sync.on_snapshot_update(Arc::new(
            RateSnapshot::from_pairs(Currency::Eur, [(Currency::Eur, dec!(1))]).unwrap(),
        ));
        let before = *sync.pair();

        assert_eq!(sync.swap(), EditOutcome::Applied);

        assert_eq!(sync.source(), &before.destination);
        assert_eq!(sync.destination(), &before.source);
        assert_eq!(sync.live_rate(), None);
        assert!(sync.is_degraded());
    }

    #[test]
    fn test_overflowing_amount_rejected() {
        let mut sync = Synchronizer::new(Currency::Eur, Currency::Jpy);
        sync.on_snapshot_update(Arc::new(
            RateSnapshot::from_pairs(
                Currency::Eur,
                [(Currency::Eur, dec!(1)), (Currency::Jpy, dec!(161.27))],
            )
            .unwrap(),
        ));
        let before = *sync.pair();

        let outcome = sync.set_amount(FieldSide::Source, dec!(1000000000000000000000000000));

        assert_eq!(
            outcome,
            EditOutcome::Rejected(FxError::AmountOverflow {
                from: Currency::Eur,
                to: Currency::Jpy,
            })
        );
        assert_eq!(sync.pair(), &before);
        assert!(!sync.is_degraded());

        // Re-editing recovers
        assert_eq!(sync.set_amount(FieldSide::Source, dec!(1)), EditOutcome::Applied);
        assert_eq!(sync.destination().amount(), dec!(161.27));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let mut sync = ready();

        let outcome = sync.set_amount(FieldSide::Source, dec!(-3));

        assert_eq!(outcome, EditOutcome::Rejected(FxError::InvalidAmount(dec!(-3))));
        assert!(!sync.is_degraded());
        assert_eq!(sync.source().amount(), Decimal::ZERO);
    }

    #[test]
    fn test_snapshot_update_only_moves_rate() {
        let mut sync = ready();
        sync.set_amount(FieldSide::Source, dec!(100));

        let newer = Arc::new(
            RateSnapshot::from_pairs(
                Currency::Eur,
                [(Currency::Eur, dec!(1)), (Currency::Gbp, dec!(0.9))],
            )
            .unwrap(),
        );
        assert_eq!(sync.on_snapshot_update(newer), Some(dec!(0.9)));

        assert_eq!(sync.source().amount(), dec!(100));
        assert_eq!(sync.destination().amount(), dec!(85.00));

        // Next edit uses the new rate
        sync.set_amount(FieldSide::Source, dec!(100));
        assert_eq!(sync.destination().amount(), dec!(90.00));
    }

    #[test]
    fn test_incomplete_snapshot_degrades_live_rate() {
        let mut sync = ready();

        let partial = Arc::new(
            RateSnapshot::from_pairs(Currency::Eur, [(Currency::Eur, dec!(1))]).unwrap(),
        );
        assert_eq!(sync.on_snapshot_update(partial), None);
        assert!(sync.is_degraded());

        sync.on_snapshot_update(eur_gbp());
        assert!(!sync.is_degraded());
        assert_eq!(sync.live_rate(), Some(dec!(0.85)));
    }

    fn edit() -> impl Strategy<Value = Edit> {
        let side = prop_oneof![Just(FieldSide::Source), Just(FieldSide::Destination)];
        let currency = prop::sample::select(vec![Currency::Eur, Currency::Gbp]);
        prop_oneof![
            (side.clone(), currency).prop_map(|(side, currency)| Edit::SetCurrency { side, currency }),
            (side, 0i64..10_000_000).prop_map(|(side, cents)| Edit::SetAmount {
                side,
                amount: Decimal::new(cents, 2),
            }),
            Just(Edit::Swap),
        ]
    }

    proptest! {
        #[test]
        fn prop_swap_twice_is_identity(edits in prop::collection::vec(edit(), 0..8)) {
            let mut sync = ready();
            for edit in edits {
                sync.apply(edit);
            }
            let before = *sync.pair();

            sync.swap();
            sync.swap();

            prop_assert_eq!(sync.pair(), &before);
        }

        #[test]
        fn prop_derived_field_matches_authoritative(edits in prop::collection::vec(edit(), 1..8)) {
            let mut sync = ready();
            for edit in edits {
                sync.apply(edit);
            }

            let pair = *sync.pair();
            let from = pair.field(pair.authoritative);
            let derived = pair.field(pair.authoritative.other());
            let expected = convert_amount(from.currency(), derived.currency(), &eur_gbp(), from.amount()).unwrap();

            prop_assert_eq!(derived.amount(), expected);
        }
    }
}
