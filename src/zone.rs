//! The time zone used to read epoch-millisecond dates.

use crate::error::ZoneError;
use chrono::{DateTime, Local, NaiveDate, Offset, TimeZone, Utc};
use std::fmt;
use std::str::FromStr;

/// The time zone epoch-millisecond dates are broken down in.
///
/// `Local` reads the process's configured zone (`TZ`, `/etc/localtime`), which
/// makes it an environmental input. Pin an `Iana` zone where that matters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Zone {
    #[default]
    Local,
    Iana(chrono_tz::Tz),
}

impl Zone {
    const LOCAL_ID: &'static str = "Localtime";

    pub fn utc() -> Self {
        Self::Iana(chrono_tz::UTC)
    }

    pub fn name(&self) -> &str {
        match self {
            Zone::Local => Self::LOCAL_ID,
            Zone::Iana(tz) => tz.name(),
        }
    }

    /// The calendar day `instant` falls on in this zone.
    ///
    /// `None` when the offset pushes the local time past chrono's calendar.
    pub fn civil_date(&self, instant: DateTime<Utc>) -> Option<NaiveDate> {
        let utc = instant.naive_utc();
        let offset = match self {
            Zone::Local => Local.offset_from_utc_datetime(&utc).fix(),
            Zone::Iana(tz) => tz.offset_from_utc_datetime(&utc).fix(),
        };

        utc.checked_add_offset(offset).map(|local| local.date())
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Zone {
    type Err = ZoneError;

    fn from_str(s: &str) -> Result<Self, ZoneError> {
        let s = s.trim();

        if s.eq_ignore_ascii_case("local") || s.eq_ignore_ascii_case(Self::LOCAL_ID) {
            return Ok(Zone::Local);
        }

        s.parse::<chrono_tz::Tz>()
            .map(Zone::Iana)
            .map_err(|_| ZoneError { name: s.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_local_aliases() {
        assert_eq!("local".parse::<Zone>(), Ok(Zone::Local));
        assert_eq!("Localtime".parse::<Zone>(), Ok(Zone::Local));
        assert_eq!(" LOCAL ".parse::<Zone>(), Ok(Zone::Local));
    }

    #[test]
    fn parses_iana_names() {
        assert_eq!("UTC".parse::<Zone>(), Ok(Zone::utc()));
        assert_eq!(
            "Europe/Berlin".parse::<Zone>(),
            Ok(Zone::Iana(chrono_tz::Europe::Berlin))
        );
    }

    #[test]
    fn rejects_unknown_names() {
        assert_eq!(
            "Mars/Olympus_Mons".parse::<Zone>(),
            Err(ZoneError {
                name: "Mars/Olympus_Mons".into()
            })
        );
    }

    #[test]
    fn displays_name() {
        assert_eq!(Zone::Local.to_string(), "Localtime");
        assert_eq!(Zone::Iana(chrono_tz::Asia::Tokyo).to_string(), "Asia/Tokyo");
    }

    #[test]
    fn civil_date_follows_offset() {
        let instant = Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap();

        assert_eq!(
            Zone::utc().civil_date(instant),
            NaiveDate::from_ymd_opt(2023, 11, 14)
        );
        assert_eq!(
            Zone::Iana(chrono_tz::Asia::Tokyo).civil_date(instant),
            NaiveDate::from_ymd_opt(2023, 11, 15)
        );
    }

    #[test]
    fn civil_date_past_calendar_edges() {
        assert_eq!(
            Zone::Iana(chrono_tz::Asia::Tokyo).civil_date(DateTime::<Utc>::MAX_UTC),
            None
        );
        assert_eq!(
            Zone::Iana(chrono_tz::America::New_York).civil_date(DateTime::<Utc>::MIN_UTC),
            None
        );
        assert_eq!(
            Zone::utc().civil_date(DateTime::<Utc>::MAX_UTC),
            Some(DateTime::<Utc>::MAX_UTC.date_naive())
        );
    }
}
