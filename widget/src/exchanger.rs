//! Mounting a widget: the event loop, the rate refresher and teardown.

use std::sync::Arc;

use exchanger_common::{Currency, FieldSide};
use exchanger_fx::{RateProvider, RateRefresher, RateSnapshot, RefreshHandle};
use exchanger_ledger::{ExchangeReceipt, NotificationSink};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

use crate::config::ExchangerConfig;
use crate::error::WidgetError;
use crate::state::WidgetState;
use crate::synchronizer::{Edit, EditOutcome};
use crate::view::ExchangeView;
use crate::widget::{EventOutcome, ExchangeWidget, WidgetEvent};

/// An event queued for the widget, with an optional reply slot.
struct Envelope {
    event: WidgetEvent,
    reply: Option<oneshot::Sender<EventOutcome>>,
}

impl From<Arc<RateSnapshot>> for Envelope {
    fn from(snapshot: Arc<RateSnapshot>) -> Self {
        Self {
            event: WidgetEvent::SnapshotArrived(snapshot),
            reply: None,
        }
    }
}

/// A widget running on the current Tokio runtime.
///
/// One task owns the [`ExchangeWidget`] and handles events in arrival order,
/// user edits and refreshed snapshots alike. Every handled event publishes a
/// new [`ExchangeView`].
pub struct MountedWidget {
    state: Arc<RwLock<WidgetState>>,
    events: Option<mpsc::Sender<Envelope>>,
    views: watch::Receiver<ExchangeView>,
    refresher: Option<RefreshHandle>,
    event_loop: Option<JoinHandle<ExchangeView>>,
}

/// Mount a widget: build its initial state, start the event loop and start
/// refreshing rates from `provider`.
///
/// Must be called from within a Tokio runtime.
#[instrument(skip_all, fields(provider = provider.name()))]
pub fn mount(
    config: ExchangerConfig,
    provider: Arc<dyn RateProvider>,
    sink: Arc<dyn NotificationSink>,
) -> Result<MountedWidget, WidgetError> {
    config.validate().map_err(WidgetError::Config)?;

    let state = Arc::new(RwLock::new(WidgetState::Mounting));

    let widget = ExchangeWidget::new(&config, sink);
    let (views_tx, views_rx) = watch::channel(widget.view());
    let (events_tx, events_rx) = mpsc::channel(config.event_queue_capacity);

    let event_loop = tokio::spawn(run_event_loop(widget, events_rx, views_tx));
    let refresher = RateRefresher::new(provider, config.refresh_interval).start(events_tx.clone());

    *state.write() = WidgetState::Running;

    info!(
        source = %config.source_currency,
        destination = %config.destination_currency,
        refresh_interval_ms = config.refresh_interval.as_millis() as u64,
        "Widget mounted"
    );

    Ok(MountedWidget {
        state,
        events: Some(events_tx),
        views: views_rx,
        refresher: Some(refresher),
        event_loop: Some(event_loop),
    })
}

async fn run_event_loop(
    mut widget: ExchangeWidget,
    mut events: mpsc::Receiver<Envelope>,
    views: watch::Sender<ExchangeView>,
) -> ExchangeView {
    while let Some(Envelope { event, reply }) = events.recv().await {
        let outcome = widget.handle(event);
        views.send_replace(widget.view());

        if let Some(reply) = reply {
            let _ = reply.send(outcome);
        }
    }

    debug!("Widget event loop finished");
    widget.view()
}

impl MountedWidget {
    /// Queue an event and wait until it has been handled.
    pub async fn dispatch(&self, event: WidgetEvent) -> Result<EventOutcome, WidgetError> {
        if !self.is_accepting_events() {
            return Err(WidgetError::NotRunning);
        }
        let events = self.events.as_ref().ok_or(WidgetError::NotRunning)?;

        let (reply_tx, reply_rx) = oneshot::channel();
        events
            .send(Envelope {
                event,
                reply: Some(reply_tx),
            })
            .await
            .map_err(|_| WidgetError::NotRunning)?;

        reply_rx.await.map_err(|_| WidgetError::NotRunning)
    }

    /// Select a currency for one field.
    pub async fn set_currency(
        &self,
        side: FieldSide,
        currency: Currency,
    ) -> Result<EditOutcome, WidgetError> {
        self.edit(Edit::SetCurrency { side, currency }).await
    }

    /// Type an amount into one field.
    pub async fn set_amount(&self, side: FieldSide, amount: Decimal) -> Result<EditOutcome, WidgetError> {
        self.edit(Edit::SetAmount { side, amount }).await
    }

    /// Exchange source and destination.
    pub async fn swap(&self) -> Result<EditOutcome, WidgetError> {
        self.edit(Edit::Swap).await
    }

    async fn edit(&self, edit: Edit) -> Result<EditOutcome, WidgetError> {
        match self.dispatch(WidgetEvent::Edit(edit)).await? {
            EventOutcome::Edit(outcome) => Ok(outcome),
            _ => Err(WidgetError::NotRunning),
        }
    }

    /// Exchange the source amount into the destination currency.
    #[instrument(skip(self))]
    pub async fn exchange(&self) -> Result<ExchangeReceipt, WidgetError> {
        match self.dispatch(WidgetEvent::Exchange).await? {
            EventOutcome::Exchange(result) => Ok(result?),
            _ => Err(WidgetError::NotRunning),
        }
    }

    /// The most recently published view.
    pub fn view(&self) -> ExchangeView {
        self.views.borrow().clone()
    }

    /// A receiver notified of every new view.
    pub fn subscribe(&self) -> watch::Receiver<ExchangeView> {
        self.views.clone()
    }

    /// Wait until the first snapshot has been applied.
    pub async fn wait_until_ready(&self) -> Result<ExchangeView, WidgetError> {
        let mut views = self.views.clone();
        let view = views
            .wait_for(|view| !view.loading)
            .await
            .map_err(|_| WidgetError::NotRunning)?;
        Ok(view.clone())
    }

    /// Get the current lifecycle state.
    pub fn state(&self) -> WidgetState {
        *self.state.read()
    }

    /// Check if the widget accepts user events.
    pub fn is_accepting_events(&self) -> bool {
        self.state.read().accepts_events()
    }

    /// Stop refreshing, drain queued events and return the final view.
    ///
    /// No snapshot is applied after this returns. Calling it again fails
    /// with [`WidgetError::NotRunning`].
    #[instrument(skip(self))]
    pub async fn unmount(&mut self) -> Result<ExchangeView, WidgetError> {
        {
            let mut state = self.state.write();
            if !state.accepts_events() {
                return Err(WidgetError::NotRunning);
            }
            *state = WidgetState::Unmounting;
        }

        info!("Unmounting widget");

        if let Some(refresher) = self.refresher.take() {
            let stats = refresher.stop().await;
            info!(
                refreshes = stats.refreshes,
                failures = stats.failures,
                "Rate refresh cancelled"
            );
        }

        // Last sender gone: the loop drains what is queued and returns.
        self.events.take();
        let view = match self.event_loop.take() {
            Some(task) => task.await.unwrap_or_else(|_| self.view()),
            None => self.view(),
        };

        *self.state.write() = WidgetState::Unmounted;

        info!("Widget unmounted");
        Ok(view)
    }
}

impl Drop for MountedWidget {
    fn drop(&mut self) {
        if let Some(task) = self.event_loop.take() {
            task.abort();
        }
        *self.state.write() = WidgetState::Unmounted;
    }
}
