//! Collaborator contracts for windows and bookings, plus an in-memory store.
//!
//! The generator only ever issues two bulk reads per call: every window for the
//! weekday and every occupying booking for the day.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::conflict::overlaps;
use crate::error::RepositoryError;
use crate::model::{AvailabilityWindow, BookedInterval, OfferingId};

/// Supplies the recurring weekly windows configured for an offering.
#[async_trait]
pub trait WindowSource: Send + Sync {
    async fn list_windows(
        &self,
        offering_id: OfferingId,
        weekday: Weekday,
    ) -> Result<Vec<AvailabilityWindow>, RepositoryError>;
}

/// Supplies committed appointments for an offering over a time range.
///
/// Implementations return only intervals whose status occupies the range;
/// cancelled and expired appointments never reach the generator.
#[async_trait]
pub trait BookingSource: Send + Sync {
    async fn list_booked_intervals(
        &self,
        offering_id: OfferingId,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> Result<Vec<BookedInterval>, RepositoryError>;
}

#[async_trait]
impl<T: WindowSource + ?Sized> WindowSource for Arc<T> {
    async fn list_windows(
        &self,
        offering_id: OfferingId,
        weekday: Weekday,
    ) -> Result<Vec<AvailabilityWindow>, RepositoryError> {
        (**self).list_windows(offering_id, weekday).await
    }
}

#[async_trait]
impl<T: BookingSource + ?Sized> BookingSource for Arc<T> {
    async fn list_booked_intervals(
        &self,
        offering_id: OfferingId,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> Result<Vec<BookedInterval>, RepositoryError> {
        (**self)
            .list_booked_intervals(offering_id, range_start, range_end)
            .await
    }
}

/// A point-in-time dump of scheduling data, as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub windows: Vec<AvailabilityWindow>,
    #[serde(default)]
    pub bookings: Vec<BookedInterval>,
}

/// Serves both sources from an immutable [`Snapshot`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    snapshot: Snapshot,
}

impl InMemoryStore {
    pub fn new(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json).map(Self::new)
    }
}

#[async_trait]
impl WindowSource for InMemoryStore {
    async fn list_windows(
        &self,
        offering_id: OfferingId,
        weekday: Weekday,
    ) -> Result<Vec<AvailabilityWindow>, RepositoryError> {
        let windows: Vec<AvailabilityWindow> = self
            .snapshot
            .windows
            .iter()
            .filter(|w| w.offering_id == offering_id && w.weekday == weekday && w.active)
            .cloned()
            .collect();

        debug!(%offering_id, ?weekday, count = windows.len(), "listed windows");
        Ok(windows)
    }
}

#[async_trait]
impl BookingSource for InMemoryStore {
    async fn list_booked_intervals(
        &self,
        offering_id: OfferingId,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> Result<Vec<BookedInterval>, RepositoryError> {
        let bookings: Vec<BookedInterval> = self
            .snapshot
            .bookings
            .iter()
            .filter(|b| b.offering_id == offering_id && b.status.is_occupying())
            .filter(|b| overlaps(b.starts_at, b.ends_at(), range_start, range_end))
            .cloned()
            .collect();

        debug!(%offering_id, %range_start, %range_end, count = bookings.len(), "listed bookings");
        Ok(bookings)
    }
}
