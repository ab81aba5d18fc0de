//! Data model: availability windows, booked intervals and output slots.

use std::fmt;

use chrono::{DateTime, Duration, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};

/// Minutes in a nominal day; no window offset may exceed it.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Identifier of the bookable offering a query targets.
///
/// Zero is the "unset" value and is rejected by [`OfferingId::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OfferingId(pub u64);

impl OfferingId {
    pub fn validate(self) -> Result<Self> {
        if self.0 == 0 {
            return Err(SlotError::Validation("offering id is missing".to_string()));
        }
        Ok(self)
    }
}

impl fmt::Display for OfferingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Map a 0–6 index (Sunday = 0) to a weekday.
pub fn weekday_from_index(index: u8) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

/// Serde adapter storing a [`Weekday`] as its 0–6 index, Sunday = 0.
pub mod weekday_index {
    use chrono::Weekday;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(day: &Weekday, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(day.num_days_from_sunday() as u8)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Weekday, D::Error> {
        let index = u8::deserialize(deserializer)?;
        super::weekday_from_index(index)
            .ok_or_else(|| D::Error::custom(format!("weekday must be 0-6, got {}", index)))
    }
}

/// A recurring weekly interval during which an offering accepts bookings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    pub offering_id: OfferingId,
    #[serde(with = "weekday_index")]
    pub weekday: Weekday,
    /// Minutes since local midnight.
    pub start_minute: u32,
    /// Minutes since local midnight. A slot may end exactly here.
    pub end_minute: u32,
    pub duration_minutes: u32,
    pub active: bool,
}

impl AvailabilityWindow {
    /// `start < end <= 1440` and a non-zero slot duration.
    pub fn is_well_formed(&self) -> bool {
        self.duration_minutes > 0
            && self.start_minute < self.end_minute
            && self.end_minute <= MINUTES_PER_DAY
    }
}

/// Lifecycle state of a committed appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    #[default]
    Scheduled,
    Confirmed,
    Cancelled,
    Expired,
}

impl BookingStatus {
    /// Whether an appointment in this state holds its time range.
    pub fn is_occupying(self) -> bool {
        matches!(
            self,
            BookingStatus::Pending | BookingStatus::Scheduled | BookingStatus::Confirmed
        )
    }
}

/// The time range held by an existing appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookedInterval {
    pub offering_id: OfferingId,
    pub starts_at: DateTime<Utc>,
    pub duration_minutes: u32,
    #[serde(default)]
    pub status: BookingStatus,
}

impl BookedInterval {
    pub fn ends_at(&self) -> DateTime<Utc> {
        self.starts_at + Duration::minutes(i64::from(self.duration_minutes))
    }
}

/// A bookable, fixed-duration slot.
///
/// Field order matters: the derived `Ord` sorts by start, then end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Slot {
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

impl Slot {
    pub fn duration_minutes(&self) -> i64 {
        (self.ends_at - self.starts_at).num_minutes()
    }
}
