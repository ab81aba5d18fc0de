//! Day anchoring: resolve the local midnight a date's slots are offset from.
//!
//! Window offsets are minutes since local midnight, added to the anchor as
//! absolute durations. On DST transition days the anchor is the first instant
//! that exists on the local calendar date:
//!
//! - ambiguous midnight (clocks fall back across 00:00) takes the earlier instant
//! - midnight inside a gap (clocks spring forward at 00:00) shifts forward to the
//!   first valid local time, e.g. 01:00 in `America/Sao_Paulo` on 2018-11-04

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc, Weekday};
use chrono_tz::Tz;

use crate::error::{Result, SlotError};
use crate::model::MINUTES_PER_DAY;

/// Longest run of missing local minutes searched past midnight.
const MAX_GAP_MINUTES: i64 = 180;

/// A calendar date pinned to its resolved local midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayAnchor {
    pub date: NaiveDate,
    pub timezone: Tz,
    pub midnight: DateTime<Utc>,
    pub next_midnight: DateTime<Utc>,
}

impl DayAnchor {
    /// Resolve `date` in `timezone`.
    ///
    /// # Errors
    /// Returns `SlotError::Validation` if no local instant exists near the start
    /// of `date` or of the following day.
    pub fn resolve(date: NaiveDate, timezone: Tz) -> Result<Self> {
        let midnight = first_instant(date, timezone)?;
        let next_date = date
            .succ_opt()
            .ok_or_else(|| SlotError::Validation(format!("date out of range: {}", date)))?;
        let next_midnight = first_instant(next_date, timezone)?;

        Ok(Self {
            date,
            timezone,
            midnight,
            next_midnight,
        })
    }

    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }

    /// The instant `minutes` after the anchor.
    pub fn at_offset(&self, minutes: u32) -> DateTime<Utc> {
        self.midnight + Duration::minutes(i64::from(minutes))
    }

    /// Range whose bookings can touch any window of this day.
    ///
    /// Extends past the next local midnight on short (spring-forward) days,
    /// where `anchor + 1440 min` lands on the following date.
    pub fn booking_range(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let end = self.next_midnight.max(self.at_offset(MINUTES_PER_DAY));
        (self.midnight, end)
    }
}

fn first_instant(date: NaiveDate, timezone: Tz) -> Result<DateTime<Utc>> {
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| SlotError::Validation(format!("invalid date: {}", date)))?;

    (0..=MAX_GAP_MINUTES)
        .find_map(|offset| {
            timezone
                .from_local_datetime(&(midnight + Duration::minutes(offset)))
                .earliest()
        })
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| {
            SlotError::Validation(format!(
                "{} has no valid local start of day in {}",
                date,
                timezone.name()
            ))
        })
}

/// Parse a calendar date in strict `YYYY-MM-DD` form.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    if raw.len() != 10 {
        return Err(invalid_date(raw));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| invalid_date(raw))
}

/// Parse an IANA timezone name (e.g. `America/Sao_Paulo`).
pub fn parse_timezone(raw: &str) -> Result<Tz> {
    raw.parse()
        .map_err(|_| SlotError::Validation(format!("invalid timezone: {}", raw)))
}

fn invalid_date(raw: &str) -> SlotError {
    SlotError::Validation(format!("invalid date '{}', expected YYYY-MM-DD", raw))
}
