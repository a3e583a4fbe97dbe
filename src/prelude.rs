//! Prelude module for short_date crate.
//!
//! Re-exports the derive_more macros used by the newtypes.

pub use derive_more::{Display, From, Into};
