use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    DAY_DIGITS, MONTH_DIGITS, ParseError, SHORT_DATE_SEPARATOR, YEAR_DIGITS,
    types::{Day, Month, Year},
};

/// Raw numeric components of a short date, shape-checked but not yet
/// validated against the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Fields {
    pub day: u8,
    pub month: u8,
    pub year: u16,
}

impl Fields {
    /// Splits `D[D]/MM/YYYY` into its components.
    ///
    /// Only the shape is enforced here: digit counts, separators and ASCII
    /// digits. Range checks belong to the caller.
    pub(crate) fn scan(input: &str) -> Result<Self, ParseError> {
        if input.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let mut parts = input.split(SHORT_DATE_SEPARATOR);
        let (Some(day), Some(month), Some(year), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(ParseError::InvalidFormat(format!(
                "expected D[D]{SHORT_DATE_SEPARATOR}MM{SHORT_DATE_SEPARATOR}YYYY, got {input:?}"
            )));
        };

        Ok(Self {
            day: digits(day, DAY_DIGITS.contains(&day.len()), input)?,
            month: digits(month, month.len() == MONTH_DIGITS, input)?,
            year: digits(year, year.len() == YEAR_DIGITS, input)?,
        })
    }
}

fn digits<T: FromStr>(part: &str, width_ok: bool, input: &str) -> Result<T, ParseError> {
    if !width_ok || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::InvalidFormat(input.to_owned()));
    }
    part.parse::<T>().map_err(|_| ParseError::InvalidFormat(input.to_owned()))
}

/// A calendar date read from the short `DD/MM/YYYY` format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShortDate {
    year: Year,
    month: Month,
    day: Day,
}

impl ShortDate {
    /// # Errors
    /// Returns the first component that fails validation, checked year first.
    pub fn new(day: u8, month: u8, year: u16) -> Result<Self, ParseError> {
        let year = Year::new(year)?;
        let month = Month::new(month)?;
        let day = Day::new(day, year, month)?;
        Ok(Self { year, month, day })
    }

    pub(crate) fn from_fields(fields: Fields) -> Result<Self, ParseError> {
        Self::new(fields.day, fields.month, fields.year)
    }

    pub const fn year(&self) -> Year {
        self.year
    }

    pub const fn month(&self) -> Month {
        self.month
    }

    pub const fn day(&self) -> Day {
        self.day
    }

    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(
            i32::from(self.year.get()),
            u32::from(self.month.get()),
            u32::from(self.day.get()),
        )
    }
}

impl FromStr for ShortDate {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_fields(Fields::scan(s)?)
    }
}

impl fmt::Display for ShortDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{SHORT_DATE_SEPARATOR}{}{SHORT_DATE_SEPARATOR}{}",
            self.day, self.month, self.year
        )
    }
}

impl Serialize for ShortDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ShortDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
