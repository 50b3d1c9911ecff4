//! The widget's single owner of state and its event handler.

use std::sync::Arc;

use exchanger_fx::RateSnapshot;
use exchanger_ledger::{BalanceLedger, ExchangeError, ExchangeReceipt, LedgerEngine, NotificationSink};
use tracing::{debug, info};

use crate::config::ExchangerConfig;
use crate::synchronizer::{Edit, EditOutcome, Synchronizer};
use crate::view::ExchangeView;

/// Everything that can happen to the widget.
#[derive(Debug, Clone)]
pub enum WidgetEvent {
    /// User edited a field or swapped.
    Edit(Edit),
    /// User pressed "Exchange".
    Exchange,
    /// A fresh rate snapshot arrived.
    SnapshotArrived(Arc<RateSnapshot>),
}

impl From<Edit> for WidgetEvent {
    fn from(edit: Edit) -> Self {
        WidgetEvent::Edit(edit)
    }
}

impl From<Arc<RateSnapshot>> for WidgetEvent {
    fn from(snapshot: Arc<RateSnapshot>) -> Self {
        WidgetEvent::SnapshotArrived(snapshot)
    }
}

/// Result of handling one event.
#[derive(Debug, Clone)]
pub enum EventOutcome {
    Edit(EditOutcome),
    Exchange(Result<ExchangeReceipt, ExchangeError>),
    RateRefreshed,
}

/// Fields, live rate and balances of one widget instance.
///
/// Events are handled one at a time through `&mut self`; each handler runs
/// to completion, derived field included, before the next one starts.
pub struct ExchangeWidget {
    sync: Synchronizer,
    ledger: LedgerEngine,
}

impl ExchangeWidget {
    /// Create a widget in its mount state: zero amounts, no rates yet.
    pub fn new(config: &ExchangerConfig, sink: Arc<dyn NotificationSink>) -> Self {
        let balances = BalanceLedger::with_balances(
            config
                .initial_balances
                .iter()
                .map(|(currency, balance)| (*currency, *balance)),
        );

        Self {
            sync: Synchronizer::new(config.source_currency, config.destination_currency),
            ledger: LedgerEngine::new(balances, config.funds_policy, sink),
        }
    }

    /// Handle one event.
    pub fn handle(&mut self, event: WidgetEvent) -> EventOutcome {
        match event {
            WidgetEvent::Edit(edit) => EventOutcome::Edit(self.sync.apply(edit)),
            WidgetEvent::Exchange => {
                EventOutcome::Exchange(self.ledger.exchange(self.sync.pair(), self.sync.snapshot()))
            }
            WidgetEvent::SnapshotArrived(snapshot) => {
                let first = self.sync.is_loading();
                let rate = self.sync.on_snapshot_update(snapshot);

                if first {
                    info!(pair = %self.sync.pair().currency_pair(), "First rate snapshot received");
                }
                debug!(
                    pair = %self.sync.pair().currency_pair(),
                    rate = ?rate,
                    "Live rate refreshed"
                );

                EventOutcome::RateRefreshed
            }
        }
    }

    pub fn synchronizer(&self) -> &Synchronizer {
        &self.sync
    }

    pub fn ledger(&self) -> &BalanceLedger {
        self.ledger.ledger()
    }

    /// Current state for the display layer.
    pub fn view(&self) -> ExchangeView {
        ExchangeView::capture(&self.sync, self.ledger.ledger())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exchanger_common::{Currency, FieldSide};
    use exchanger_fx::FxError;
    use exchanger_ledger::{RecordingSink, Severity};
    use rust_decimal_macros::dec;

    fn snapshot() -> Arc<RateSnapshot> {
        Arc::new(
            RateSnapshot::from_pairs(
                Currency::Eur,
                [(Currency::Eur, dec!(1)), (Currency::Gbp, dec!(0.85))],
            )
            .unwrap(),
        )
    }

    fn widget() -> (ExchangeWidget, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::new());
        let widget = ExchangeWidget::new(&ExchangerConfig::default(), sink.clone());
        (widget, sink)
    }

    #[test]
    fn test_exchange_scenario() {
        let (mut widget, sink) = widget();

        widget.handle(snapshot().into());
        widget.handle(
            Edit::SetAmount {
                side: FieldSide::Source,
                amount: dec!(100),
            }
            .into(),
        );
        assert_eq!(widget.view().destination.amount(), dec!(85.00));

        let outcome = widget.handle(WidgetEvent::Exchange);

        assert!(matches!(outcome, EventOutcome::Exchange(Ok(_))));
        assert_eq!(widget.ledger().balance(Currency::Eur), dec!(900));
        assert_eq!(widget.ledger().balance(Currency::Gbp), dec!(1319));
        assert_eq!(
            sink.last(),
            Some(("Successfully exchanged currency".to_string(), Severity::Success))
        );
    }

    #[test]
    fn test_events_before_first_snapshot() {
        let (mut widget, sink) = widget();
        let before = widget.view();

        let outcome = widget.handle(
            Edit::SetAmount {
                side: FieldSide::Source,
                amount: dec!(100),
            }
            .into(),
        );
        assert!(matches!(outcome, EventOutcome::Edit(EditOutcome::Deferred)));

        let outcome = widget.handle(WidgetEvent::Exchange);
        assert!(matches!(
            outcome,
            EventOutcome::Exchange(Err(ExchangeError::RateUnavailable))
        ));

        assert_eq!(widget.view(), before);
        assert!(widget.view().loading);
        assert_eq!(sink.notifications().len(), 1);
    }

    #[test]
    fn test_exchange_with_missing_rate() {
        let (mut widget, sink) = widget();
        widget.handle(snapshot().into());
        widget.handle(
            Edit::SetAmount {
                side: FieldSide::Source,
                amount: dec!(100),
            }
            .into(),
        );

        let partial = Arc::new(
            RateSnapshot::from_pairs(Currency::Eur, [(Currency::Eur, dec!(1))]).unwrap(),
        );
        widget.handle(partial.into());
        assert!(widget.view().degraded);
        let before = widget.ledger().clone();

        let outcome = widget.handle(WidgetEvent::Exchange);

        match outcome {
            EventOutcome::Exchange(Err(e)) => {
                assert_eq!(e, ExchangeError::Rate(FxError::MissingRate(Currency::Gbp)))
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(widget.ledger(), &before);
        assert_eq!(
            sink.last(),
            Some(("Exchange failed. Try again.".to_string(), Severity::Error))
        );
    }
}
