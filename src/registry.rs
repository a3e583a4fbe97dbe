//! Process-wide active [`FormatStrategy`].
//!
//! [`crate::parse_short_date`] reads this on every call. Install a strategy
//! before starting concurrent work: parses already in flight keep the
//! strategy they picked up.
//!
//! ```
//! use std::sync::Arc;
//! use short_date::{
//!     FormatStrategy, ParserConfig, ThreadLocalStrategy, current_strategy, parse_short_date,
//!     reset_strategy, set_strategy,
//! };
//!
//! set_strategy(Arc::new(ThreadLocalStrategy::new(ParserConfig::default())));
//! assert_eq!(current_strategy().name(), "thread-local");
//! assert!(parse_short_date("30/01/1950").is_ok());
//!
//! reset_strategy();
//! assert_eq!(current_strategy().name(), "fresh");
//! ```
//!
//! Code that prefers not to touch global state can hold a
//! [`crate::DateParser`] with its own strategy instead.

use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::debug;

use crate::{FormatStrategy, FreshStrategy};

static ACTIVE_STRATEGY: Lazy<RwLock<Arc<dyn FormatStrategy>>> =
    Lazy::new(|| RwLock::new(default_strategy()));

fn default_strategy() -> Arc<dyn FormatStrategy> {
    Arc::new(FreshStrategy::default())
}

/// Replaces the active strategy.
pub fn set_strategy(strategy: Arc<dyn FormatStrategy>) {
    debug!(
        strategy = strategy.name(),
        config = ?strategy.config(),
        "installing date format strategy"
    );
    *ACTIVE_STRATEGY.write() = strategy;
}

/// The active strategy. Cheap to call; clones an `Arc`.
pub fn current_strategy() -> Arc<dyn FormatStrategy> {
    Arc::clone(&ACTIVE_STRATEGY.read())
}

/// Reinstalls the default strategy, a [`FreshStrategy`] with default settings.
pub fn reset_strategy() {
    debug!("resetting date format strategy");
    *ACTIVE_STRATEGY.write() = default_strategy();
}
