//! The parser engine behind every strategy.
//!
//! [`ShortDateParser`] keeps the fields of the input it is working on between
//! the scan and resolve steps, so a single instance must never be driven by
//! two callers at once. `parse` takes `&mut self` for that reason; the
//! strategies in [`crate::strategy`] decide how instances are shared.

use std::str::FromStr;

use chrono::{Days, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone};

use crate::{
    ParseError, ShortDate, Timestamp,
    consts::MILLIS_PER_SECOND,
    date::Fields,
    types::{Day, Month, Year},
};

/// Timezone whose midnight a parsed date denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Zone {
    /// The system's local timezone
    #[default]
    Local,
    Utc,
    Fixed(FixedOffset),
}

impl Zone {
    /// Milliseconds since the epoch at the start of `date` in this zone.
    ///
    /// A midnight skipped by a DST transition is read with the offset in
    /// effect at that instant; a repeated one resolves to the earlier instant.
    pub fn midnight(self, date: NaiveDate) -> Timestamp {
        let naive = date.and_time(NaiveTime::MIN);
        let millis = match self {
            Self::Local => resolve(&Local, &naive),
            Self::Utc => naive.and_utc().timestamp_millis(),
            Self::Fixed(offset) => resolve(&offset, &naive),
        };
        Timestamp::from_millis(millis)
    }
}

fn resolve<Tz: TimeZone>(tz: &Tz, naive: &NaiveDateTime) -> i64 {
    tz.from_local_datetime(naive).earliest().map_or_else(
        || {
            let offset = tz.offset_from_utc_datetime(naive).fix();
            naive.and_utc().timestamp_millis()
                - i64::from(offset.local_minus_utc()) * MILLIS_PER_SECOND
        },
        |dt| dt.timestamp_millis(),
    )
}

impl FromStr for Zone {
    type Err = ParseError;

    /// Accepts `local`, `utc` / `z`, or a fixed offset such as `+02:00`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("local") {
            return Ok(Self::Local);
        }
        if trimmed.eq_ignore_ascii_case("utc") || trimmed.eq_ignore_ascii_case("z") {
            return Ok(Self::Utc);
        }
        trimmed
            .parse::<FixedOffset>()
            .map(Self::Fixed)
            .map_err(|_| ParseError::InvalidZone(s.to_owned()))
    }
}

/// How a day past the end of its month is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Leniency {
    /// `31/02/2020` is an error
    #[default]
    Strict,
    /// `31/02/2020` rolls forward to 2 March 2020
    Lenient,
}

/// Settings a parser engine is built with.
///
/// Thread-local caches key their engines on this value, so two strategies
/// configured differently never hand each other's engine out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ParserConfig {
    zone: Zone,
    leniency: Leniency,
}

impl ParserConfig {
    pub const fn new(zone: Zone, leniency: Leniency) -> Self {
        Self { zone, leniency }
    }

    #[must_use]
    pub const fn with_zone(mut self, zone: Zone) -> Self {
        self.zone = zone;
        self
    }

    #[must_use]
    pub const fn with_leniency(mut self, leniency: Leniency) -> Self {
        self.leniency = leniency;
        self
    }

    pub const fn zone(&self) -> Zone {
        self.zone
    }

    pub const fn leniency(&self) -> Leniency {
        self.leniency
    }
}

/// A reusable, non-reentrant short date parser.
#[derive(Debug)]
pub struct ShortDateParser {
    config: ParserConfig,
    fields: Fields,
    parses: u64,
}

impl ShortDateParser {
    pub const fn new(config: ParserConfig) -> Self {
        Self {
            config,
            fields: Fields {
                day: 0,
                month: 0,
                year: 0,
            },
            parses: 0,
        }
    }

    pub const fn config(&self) -> ParserConfig {
        self.config
    }

    /// Number of parses attempted with this instance.
    pub const fn parses(&self) -> u64 {
        self.parses
    }

    /// Parses `D[D]/MM/YYYY` into the timestamp of that day's midnight.
    ///
    /// # Errors
    /// Returns a `ParseError` if the input is malformed, or (in strict mode)
    /// names a day that does not exist.
    pub fn parse(&mut self, input: &str) -> Result<Timestamp, ParseError> {
        self.parses = self.parses.saturating_add(1);
        self.fields = Fields::scan(input)?;
        let date = self.resolve()?;
        Ok(self.config.zone.midnight(date))
    }

    fn resolve(&self) -> Result<NaiveDate, ParseError> {
        let Fields { day, month, year } = self.fields;
        let invalid_day = || ParseError::InvalidDay { day, month, year };

        match self.config.leniency {
            Leniency::Strict => ShortDate::from_fields(self.fields)?
                .to_naive_date()
                .ok_or_else(invalid_day),
            Leniency::Lenient => {
                let year = Year::new(year)?;
                let month = Month::new(month)?;
                let day = Day::check_bounds(day, month.get(), year.get())?;
                NaiveDate::from_ymd_opt(i32::from(year.get()), u32::from(month.get()), 1)
                    .and_then(|first| first.checked_add_days(Days::new(u64::from(day - 1))))
                    .ok_or_else(invalid_day)
            }
        }
    }
}

impl Default for ShortDateParser {
    fn default() -> Self {
        Self::new(ParserConfig::default())
    }
}
