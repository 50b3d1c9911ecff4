//! Exchanger Common Types
//!
//! Shared types used across the Exchanger widget crates: the supported
//! currencies, the linked exchange fields and amount rounding.

pub mod field;
pub mod monetary;

pub use field::*;
pub use monetary::*;
