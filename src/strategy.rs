//! Strategies deciding how parser engines are obtained.
//!
//! A [`ShortDateParser`] is not reentrant, so each strategy must guarantee
//! that an engine is lent to at most one caller at a time:
//!
//! - [`FreshStrategy`] builds a new engine for every call.
//! - [`ThreadLocalStrategy`] keeps one engine per thread and configuration.
//! - [`SharedStrategy`] keeps a single engine behind a mutex.

use std::{cell::RefCell, collections::HashMap, fmt};

use parking_lot::Mutex;
use tracing::trace;

use crate::{ParseError, ParserConfig, ShortDateParser, Timestamp};

/// Callback that drives a lent parser engine.
pub type ParseFn<'a> = dyn FnMut(&mut ShortDateParser) -> Result<Timestamp, ParseError> + 'a;

/// Source of parser engines.
pub trait FormatStrategy: Send + Sync + fmt::Debug {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Configuration of the engines this strategy hands out.
    fn config(&self) -> ParserConfig;

    /// Acquires an engine, lends it to `f` exclusively, and returns `f`'s result.
    ///
    /// # Errors
    /// Propagates whatever `f` returns.
    fn with_parser(&self, f: &mut ParseFn<'_>) -> Result<Timestamp, ParseError>;

    /// Parses one short date with an engine from this strategy.
    ///
    /// # Errors
    /// Returns a `ParseError` if `input` is not a valid short date.
    fn parse(&self, input: &str) -> Result<Timestamp, ParseError> {
        self.with_parser(&mut |parser| parser.parse(input))
    }
}

/// Builds a new engine on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct FreshStrategy {
    config: ParserConfig,
}

impl FreshStrategy {
    pub const fn new(config: ParserConfig) -> Self {
        Self { config }
    }
}

impl FormatStrategy for FreshStrategy {
    fn name(&self) -> &'static str {
        "fresh"
    }

    fn config(&self) -> ParserConfig {
        self.config
    }

    fn with_parser(&self, f: &mut ParseFn<'_>) -> Result<Timestamp, ParseError> {
        f(&mut ShortDateParser::new(self.config))
    }
}

thread_local! {
    /// Engines cached for the current thread, one per configuration
    static PARSER_CACHE: RefCell<HashMap<ParserConfig, ShortDateParser>> =
        RefCell::new(HashMap::new());
}

/// Reuses one engine per thread.
///
/// The cache is shared by every `ThreadLocalStrategy` on a thread and keyed by
/// [`ParserConfig`]. Use on a thread is serial, so no locking is involved.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadLocalStrategy {
    config: ParserConfig,
}

impl ThreadLocalStrategy {
    pub const fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Drops every engine cached on the calling thread.
    ///
    /// Returns `false` without clearing anything when the cache is unavailable:
    /// called from inside [`FormatStrategy::with_parser`] on the same thread,
    /// or while thread-local storage is being torn down.
    pub fn clear_current_thread() -> bool {
        PARSER_CACHE
            .try_with(|cache| {
                let Ok(mut cache) = cache.try_borrow_mut() else {
                    return false;
                };
                trace!(cached = cache.len(), "clearing thread-local date parsers");
                cache.clear();
                true
            })
            .unwrap_or(false)
    }

    /// Number of engines cached on the calling thread.
    pub fn cached_on_current_thread() -> usize {
        PARSER_CACHE
            .try_with(|cache| cache.try_borrow().map_or(0, |cache| cache.len()))
            .unwrap_or(0)
    }

    /// Number of parses the calling thread's engine for `config` has run.
    pub fn parses_on_current_thread(config: ParserConfig) -> Option<u64> {
        PARSER_CACHE
            .try_with(|cache| {
                cache
                    .try_borrow()
                    .ok()
                    .and_then(|cache| cache.get(&config).map(ShortDateParser::parses))
            })
            .ok()
            .flatten()
    }
}

impl FormatStrategy for ThreadLocalStrategy {
    fn name(&self) -> &'static str {
        "thread-local"
    }

    fn config(&self) -> ParserConfig {
        self.config
    }

    fn with_parser(&self, f: &mut ParseFn<'_>) -> Result<Timestamp, ParseError> {
        let config = self.config;
        let cached = PARSER_CACHE.try_with(|cache| {
            // Already borrowed means a nested call on this thread
            let mut cache = cache.try_borrow_mut().ok()?;
            let parser = cache.entry(config).or_insert_with(|| {
                trace!(?config, "caching date parser for thread");
                ShortDateParser::new(config)
            });
            Some(f(parser))
        });

        match cached {
            Ok(Some(result)) => result,
            // Thread-local storage torn down, or the cache is in use
            _ => f(&mut ShortDateParser::new(config)),
        }
    }
}

/// Shares a single engine between all threads, one caller at a time.
#[derive(Debug, Default)]
pub struct SharedStrategy {
    config: ParserConfig,
    parser: Mutex<ShortDateParser>,
}

impl SharedStrategy {
    pub fn new(config: ParserConfig) -> Self {
        Self {
            config,
            parser: Mutex::new(ShortDateParser::new(config)),
        }
    }

    /// Number of parses the shared engine has run.
    pub fn parses(&self) -> u64 {
        self.parser.lock().parses()
    }
}

impl FormatStrategy for SharedStrategy {
    fn name(&self) -> &'static str {
        "shared"
    }

    fn config(&self) -> ParserConfig {
        self.config
    }

    fn with_parser(&self, f: &mut ParseFn<'_>) -> Result<Timestamp, ParseError> {
        let mut parser = self.parser.lock();
        f(&mut parser)
    }
}
