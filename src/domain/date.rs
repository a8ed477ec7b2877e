//! Calendar values with a single total ordering.
//!
//! A `TradeDate` can be built from calendar parts or parsed from a raw
//! source string; either way the chrono timestamp is the only thing that
//! ordering, equality and formatting ever consult. Raw strings are kept
//! for diagnostics but never compared lexicographically.

use std::cmp::Ordering;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::domain::error::VelatraderError;

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y%m%d", "%d/%m/%Y", "%d-%m-%Y"];

#[derive(Debug, Clone)]
pub struct TradeDate {
    stamp: NaiveDateTime,
    raw: Option<String>,
}

impl TradeDate {
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        let date = NaiveDate::from_ymd_opt(year, month, day)?;
        Some(Self {
            stamp: date.and_time(NaiveTime::MIN),
            raw: None,
        })
    }

    pub fn from_parts(minute: u32, hour: u32, day: u32, month: u32, year: i32) -> Option<Self> {
        let date = NaiveDate::from_ymd_opt(year, month, day)?;
        let stamp = date.and_hms_opt(hour, minute, 0)?;
        Some(Self { stamp, raw: None })
    }

    /// Parse a raw source string, trying datetime formats before date-only
    /// ones. The raw string is retained verbatim.
    pub fn parse(input: &str) -> Result<Self, VelatraderError> {
        let trimmed = input.trim();
        for format in DATETIME_FORMATS {
            if let Ok(stamp) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Ok(Self {
                    stamp,
                    raw: Some(input.to_string()),
                });
            }
        }
        for format in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
                return Ok(Self {
                    stamp: date.and_time(NaiveTime::MIN),
                    raw: Some(input.to_string()),
                });
            }
        }
        Err(VelatraderError::DateParse {
            input: input.to_string(),
        })
    }

    pub fn stamp(&self) -> NaiveDateTime {
        self.stamp
    }

    pub fn date(&self) -> NaiveDate {
        self.stamp.date()
    }

    /// The raw string this value was parsed from, when there was one.
    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    pub fn format_yyyymmdd(&self) -> String {
        self.stamp.format("%Y%m%d").to_string()
    }

    pub fn format_ddmmyyyy(&self) -> String {
        self.stamp.format("%d%m%Y").to_string()
    }
}

impl PartialEq for TradeDate {
    fn eq(&self, other: &Self) -> bool {
        self.stamp == other.stamp
    }
}

impl Eq for TradeDate {}

impl PartialOrd for TradeDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TradeDate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.stamp.cmp(&other.stamp)
    }
}

impl fmt::Display for TradeDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.stamp.time() == NaiveTime::MIN {
            write!(f, "{}", self.stamp.format("%Y-%m-%d"))
        } else {
            write!(f, "{}", self.stamp.format("%Y-%m-%d %H:%M"))
        }
    }
}
