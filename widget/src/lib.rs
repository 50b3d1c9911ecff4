//! Exchanger Widget
//!
//! The calculation core behind the currency exchange widget: two linked
//! exchange fields kept consistent with the live rate, a mock balance
//! ledger, and the mount/unmount lifecycle that owns the periodic rate
//! refresh.

pub mod config;
pub mod error;
pub mod exchanger;
pub mod simulated;
pub mod state;
pub mod synchronizer;
pub mod view;
pub mod widget;

pub use config::ExchangerConfig;
pub use error::WidgetError;
pub use exchanger::{mount, MountedWidget};
pub use simulated::SimulatedRateProvider;
pub use state::WidgetState;
pub use synchronizer::{next_pair, Edit, EditOutcome, Synchronizer};
pub use view::ExchangeView;
pub use widget::{EventOutcome, ExchangeWidget, WidgetEvent};
