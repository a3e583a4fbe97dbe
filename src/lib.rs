//! Thread-safe parsing of short `D[D]/MM/YYYY` dates into millisecond
//! timestamps.
//!
//! Parsing goes through a [`FormatStrategy`], which decides whether parser
//! engines are built per call, cached per thread, or shared behind a lock.
//! Any number of threads may parse concurrently under every strategy.

mod consts;
mod date;
mod parser;
mod prelude;
mod registry;
mod strategy;
mod types;

pub use consts::*;
pub use date::ShortDate;
pub use parser::{Leniency, ParserConfig, ShortDateParser, Zone};
pub use registry::{current_strategy, reset_strategy, set_strategy};
pub use strategy::{FormatStrategy, FreshStrategy, ParseFn, SharedStrategy, ThreadLocalStrategy};
pub use types::{Day, Month, Timestamp, Year, days_in_month, is_leap_year};

use std::{fmt, sync::Arc};

use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Empty date string")]
    EmptyInput,
    #[error("Invalid date format: {0}")]
    InvalidFormat(String),
    #[error("Invalid year: {0} (must be 1-{max})", max = MAX_YEAR)]
    InvalidYear(u16),
    #[error("Invalid month: {0} (must be 1-{max})", max = MAX_MONTH)]
    InvalidMonth(u8),
    #[error("Invalid day {day} for month {year:04}-{month:02}")]
    InvalidDay { day: u8, month: u8, year: u16 },
    #[error("Invalid timezone: {0}")]
    InvalidZone(String),
}

/// Parses a short date with the process-wide strategy.
///
/// # Errors
/// Returns a `ParseError` if `input` is not a valid `D[D]/MM/YYYY` date.
///
/// # Examples
/// ```
/// let ts = short_date::parse_short_date("30/01/1950").unwrap();
/// assert_eq!(short_date::parse_short_date("30/01/1950").unwrap(), ts);
/// ```
pub fn parse_short_date(input: &str) -> Result<Timestamp, ParseError> {
    parse_with(current_strategy().as_ref(), input)
}

fn parse_with(strategy: &dyn FormatStrategy, input: &str) -> Result<Timestamp, ParseError> {
    strategy.parse(input).inspect_err(|err| {
        debug!(input, strategy = strategy.name(), %err, "failed to parse short date");
    })
}

/// A short date parser bound to its own strategy, independent of the
/// process-wide one.
#[derive(Clone)]
pub struct DateParser {
    strategy: Arc<dyn FormatStrategy>,
}

impl DateParser {
    pub fn new<S: FormatStrategy + 'static>(strategy: S) -> Self {
        Self {
            strategy: Arc::new(strategy),
        }
    }

    pub const fn with_shared(strategy: Arc<dyn FormatStrategy>) -> Self {
        Self { strategy }
    }

    /// Binds to whatever strategy is active right now.
    pub fn from_current() -> Self {
        Self::with_shared(current_strategy())
    }

    pub fn strategy(&self) -> &Arc<dyn FormatStrategy> {
        &self.strategy
    }

    /// # Errors
    /// Returns a `ParseError` if `input` is not a valid `D[D]/MM/YYYY` date.
    pub fn parse_short_date(&self, input: &str) -> Result<Timestamp, ParseError> {
        parse_with(self.strategy.as_ref(), input)
    }
}

impl Default for DateParser {
    fn default() -> Self {
        Self::new(FreshStrategy::default())
    }
}

impl fmt::Debug for DateParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DateParser")
            .field("strategy", &self.strategy.name())
            .field("config", &self.strategy.config())
            .finish()
    }
}
