//! Exchanger FX Engine
//!
//! Rate snapshots and the conversion arithmetic built on them.
//!
//! # Features
//!
//! - Pivot-relative rate snapshots, validated on construction
//! - Pairwise rates and 2-decimal conversions as pure functions
//! - Pluggable rate providers
//! - A cancellable periodic refresher feeding snapshots to a consumer
//!
//! # Example
//!
//! ```rust,ignore
//! use exchanger_common::Currency;
//! use exchanger_fx::{convert_amount, RateSnapshot};
//!
//! let snapshot = RateSnapshot::from_pairs(Currency::Eur, [
//!     (Currency::Eur, dec!(1)),
//!     (Currency::Gbp, dec!(0.85)),
//! ])?;
//!
//! let gbp = convert_amount(Currency::Eur, Currency::Gbp, &snapshot, dec!(100))?;
//! assert_eq!(gbp, dec!(85.00));
//! ```

pub mod conversion;
pub mod error;
pub mod provider;
pub mod refresher;
pub mod snapshot;

pub use conversion::{convert_amount, pairwise_rate};
pub use error::{FxError, FxResult};
pub use provider::{RateProvider, StaticRateProvider};
pub use refresher::{RateRefresher, RefreshHandle, RefreshStats};
pub use snapshot::RateSnapshot;
