//! Reference instant parsing and resolution

use crate::error::{DustpanError, Result};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// The instant expiry is judged against, as written on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceInstant {
    /// The caller's clock reading
    Now,
    /// Start of the current day
    Today,
    /// Start of the previous day
    Yesterday,
    /// Start of the next day
    Tomorrow,
    /// Start of a specific day
    Date(NaiveDate),
    /// Wall-clock time, read at the configured offset
    Local(NaiveDateTime),
    /// Fully qualified instant
    Exact(DateTime<FixedOffset>),
}

impl ReferenceInstant {
    /// Parse a reference instant string
    ///
    /// Accepts `now`, `today`, `yesterday`, `tomorrow`, `YYYY-MM-DD`,
    /// `YYYY-MM-DD HH:MM:SS` and RFC 3339.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let normalized = trimmed.to_lowercase();

        match normalized.as_str() {
            "" | "now" => Ok(ReferenceInstant::Now),
            "today" => Ok(ReferenceInstant::Today),
            "yesterday" => Ok(ReferenceInstant::Yesterday),
            "tomorrow" => Ok(ReferenceInstant::Tomorrow),
            _ => {
                if let Ok(exact) = DateTime::parse_from_rfc3339(trimmed) {
                    return Ok(ReferenceInstant::Exact(exact));
                }
                if let Ok(local) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
                    return Ok(ReferenceInstant::Local(local));
                }
                NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                    .map(ReferenceInstant::Date)
                    .map_err(|_| DustpanError::InvalidReferenceInstant(input.to_string()))
            }
        }
    }

    /// Resolve to a UTC instant, given the caller's clock and the configured offset
    pub fn resolve(&self, now: DateTime<Utc>, offset: FixedOffset) -> DateTime<Utc> {
        let today = now.with_timezone(&offset).date_naive();

        match self {
            ReferenceInstant::Now => now,
            ReferenceInstant::Today => Self::start_of_day(today, offset),
            ReferenceInstant::Yesterday => Self::start_of_day(today - Duration::days(1), offset),
            ReferenceInstant::Tomorrow => Self::start_of_day(today + Duration::days(1), offset),
            ReferenceInstant::Date(date) => Self::start_of_day(*date, offset),
            ReferenceInstant::Local(local) => Self::at_offset(*local, offset),
            ReferenceInstant::Exact(exact) => exact.with_timezone(&Utc),
        }
    }

    fn start_of_day(date: NaiveDate, offset: FixedOffset) -> DateTime<Utc> {
        Self::at_offset(date.and_time(chrono::NaiveTime::MIN), offset)
    }

    fn at_offset(local: NaiveDateTime, offset: FixedOffset) -> DateTime<Utc> {
        // A fixed offset maps every wall-clock time to exactly one instant
        match offset.from_local_datetime(&local).single() {
            Some(dt) => dt.with_timezone(&Utc),
            None => local.and_utc(),
        }
    }
}
