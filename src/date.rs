//! The calendar day as exchanged with the Connect API.

use crate::error::{DecodeError, ParseError};
use crate::util::{scan_ymd, unquote_lossy};
use crate::zone::Zone;
use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, Utc};
use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, trace};

/// A single day in Garmin Connect.
///
/// Fields are not validated. The all-zero value is the "no date" sentinel
/// and displays as `-`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Date {
    pub year: i32,
    pub month: i32,
    pub day_of_month: i32,
}

impl Date {
    pub const fn new(year: i32, month: i32, day_of_month: i32) -> Self {
        Self {
            year,
            month,
            day_of_month,
        }
    }

    pub fn is_unset(&self) -> bool {
        self.year == 0 && self.month == 0 && self.day_of_month == 0
    }

    /// UTC midnight of this day.
    ///
    /// Out-of-range fields roll over: month 13 is January of the next year,
    /// day 0 is the last day of the previous month. Returns `None` only when
    /// the result falls outside chrono's calendar.
    pub fn to_timestamp(&self) -> Option<DateTime<Utc>> {
        let months = i64::from(self.year) * 12 + i64::from(self.month) - 1;
        let year = i32::try_from(months.div_euclid(12)).ok()?;
        let month = u32::try_from(months.rem_euclid(12) + 1).ok()?;

        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let offset = TimeDelta::try_days(i64::from(self.day_of_month) - 1)?;
        let day = first.checked_add_signed(offset)?;

        Some(day.and_hms_opt(0, 0, 0)?.and_utc())
    }

    /// Parse a `yyyy-mm-dd` string.
    ///
    /// Fields shorter than their width and trailing input are accepted.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let (year, month, day_of_month) = scan_ymd(input)?;
        Ok(Self::new(year, month, day_of_month))
    }

    /// Decode a raw JSON value, breaking epoch milliseconds down in the
    /// process's local time zone.
    pub fn decode(raw: &[u8]) -> Result<Self, DecodeError> {
        Self::decode_in(raw, &Zone::Local)
    }

    /// Decode a raw JSON value.
    ///
    /// Tried in order:
    ///   1. `null` yields the unset sentinel;
    ///   2. a bare integer is milliseconds since the Unix epoch, read in `zone`;
    ///   3. anything else must be a JSON string holding a `yyyy-mm-dd` date.
    ///
    /// Bare digits such as `20240229` are therefore always a timestamp.
    pub fn decode_in(raw: &[u8], zone: &Zone) -> Result<Self, DecodeError> {
        if raw == b"null" {
            trace!("Null date, leaving unset");
            return Ok(Self::default());
        }

        // Sometimes dates arrive as milliseconds since the epoch
        if let Some(millis) = std::str::from_utf8(raw)
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
        {
            debug!(millis, zone = %zone, "Decoding date from epoch milliseconds");
            return Self::from_epoch_millis_in(millis, zone)
                .ok_or(DecodeError::OutOfRange(millis));
        }

        let text = match serde_json::from_slice::<String>(raw) {
            Ok(text) => text,
            // Invalid UTF-8 and lone surrogates are replaced, not rejected
            Err(err) => unquote_lossy(raw).ok_or(DecodeError::Unwrap(err))?,
        };
        trace!(text = %text, "Decoding date from string");

        Ok(Self::parse(&text)?)
    }

    /// The day `millis` (truncated to whole seconds) falls on in `zone`.
    ///
    /// `None` when that day lies outside chrono's calendar.
    pub fn from_epoch_millis_in(millis: i64, zone: &Zone) -> Option<Self> {
        let instant = DateTime::from_timestamp(millis / 1000, 0)?;
        let day = zone.civil_date(instant)?;

        Some(Self::new(day.year(), day.month() as i32, day.day() as i32))
    }

    pub fn format(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unset() {
            return f.write_str("-");
        }

        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.year, self.month, self.day_of_month
        )
    }
}

impl FromStr for Date {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, ParseError> {
        Self::parse(s)
    }
}

/// Writes the sentinel as `null` and every other day as `yyyy-mm-dd`.
impl Serialize for Date {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_unset() {
            serializer.serialize_none()
        } else {
            serializer.collect_str(self)
        }
    }
}

impl<'de> Deserialize<'de> for Date {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_in(deserializer, &Zone::Local)
    }
}

/// Deserialize a [`Date`], reading epoch milliseconds in `zone`.
///
/// Usable with `#[serde(deserialize_with = ..)]` through a small wrapper that
/// picks the zone.
pub fn deserialize_in<'de, D>(deserializer: D, zone: &Zone) -> Result<Date, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(DateVisitor { zone })
}

struct DateVisitor<'z> {
    zone: &'z Zone,
}

impl<'de> Visitor<'de> for DateVisitor<'_> {
    type Value = Date;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("null, epoch milliseconds, or a yyyy-mm-dd string")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Date, E> {
        Ok(Date::default())
    }

    fn visit_none<E: de::Error>(self) -> Result<Date, E> {
        Ok(Date::default())
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Date, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_i64<E: de::Error>(self, millis: i64) -> Result<Date, E> {
        Date::from_epoch_millis_in(millis, self.zone)
            .ok_or_else(|| E::custom(DecodeError::OutOfRange(millis)))
    }

    fn visit_u64<E: de::Error>(self, millis: u64) -> Result<Date, E> {
        let millis = i64::try_from(millis)
            .map_err(|_| E::invalid_value(Unexpected::Unsigned(millis), &self))?;
        self.visit_i64(millis)
    }

    fn visit_str<E: de::Error>(self, text: &str) -> Result<Date, E> {
        Date::parse(text).map_err(E::custom)
    }
}
