//! The slot generator: fetch, expand, filter, assemble.
//!
//! ```text
//! (offering, date) ──► resolve anchor ──► ┬─ list_windows(weekday)        ─┐
//!                                         └─ list_booked_intervals(day)   ─┴─► join
//!     ──► select windows ──► expand candidates ──► filter conflicts ──► dedup + sort
//! ```
//!
//! The two fetches run concurrently and are raced against the caller's
//! cancellation token and the configured deadline. Everything after the join is
//! pure and synchronous.

use chrono::NaiveDate;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::anchor::{parse_date, DayAnchor};
use crate::assembly::assemble;
use crate::config::GeneratorConfig;
use crate::conflict::{filter_free, select_bookings};
use crate::error::{Result, SlotError};
use crate::expander::{expand_windows, select_windows};
use crate::model::{AvailabilityWindow, BookedInterval, OfferingId, Slot};
use crate::repository::{BookingSource, WindowSource};

/// Computes free slots for one offering and date from its two data sources.
///
/// Holds no state between calls; concurrent calls are independent.
pub struct SlotGenerator<W, B> {
    windows: W,
    bookings: B,
    config: GeneratorConfig,
}

impl<W, B> SlotGenerator<W, B>
where
    W: WindowSource,
    B: BookingSource,
{
    pub fn new(windows: W, bookings: B, config: GeneratorConfig) -> Self {
        Self {
            windows,
            bookings,
            config,
        }
    }

    /// Generate the ordered free slots for `offering_id` on `date`.
    ///
    /// # Errors
    /// - `SlotError::Validation` for a missing offering id or an unresolvable date
    /// - `SlotError::Repository` if either fetch fails; no partial result is returned
    /// - `SlotError::Cancelled` if `cancel` fires or the fetch deadline expires
    pub async fn generate_slots(
        &self,
        offering_id: OfferingId,
        date: NaiveDate,
        cancel: &CancellationToken,
    ) -> Result<Vec<Slot>> {
        let offering_id = offering_id.validate()?;
        let anchor = DayAnchor::resolve(date, self.config.timezone)?;

        if cancel.is_cancelled() {
            return Err(SlotError::Cancelled);
        }

        let (windows, bookings) = self.fetch(offering_id, &anchor, cancel).await?;

        if cancel.is_cancelled() {
            return Err(SlotError::Cancelled);
        }

        let selected = select_windows(windows, offering_id, anchor.weekday());
        let bookings = select_bookings(bookings, offering_id);
        let candidates = expand_windows(&selected, &anchor);
        let candidate_count = candidates.len();
        let slots = assemble(filter_free(candidates, &bookings));

        debug!(
            %offering_id,
            %date,
            windows = selected.len(),
            bookings = bookings.len(),
            candidates = candidate_count,
            free = slots.len(),
            "generated slots"
        );

        Ok(slots)
    }

    /// Like [`generate_slots`](Self::generate_slots), parsing a `YYYY-MM-DD` date first.
    pub async fn generate_slots_for_str(
        &self,
        offering_id: OfferingId,
        date: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Slot>> {
        let date = parse_date(date)?;
        self.generate_slots(offering_id, date, cancel).await
    }

    async fn fetch(
        &self,
        offering_id: OfferingId,
        anchor: &DayAnchor,
        cancel: &CancellationToken,
    ) -> Result<(Vec<AvailabilityWindow>, Vec<BookedInterval>)> {
        let (range_start, range_end) = anchor.booking_range();

        let joined = async {
            tokio::try_join!(
                self.windows.list_windows(offering_id, anchor.weekday()),
                self.bookings
                    .list_booked_intervals(offering_id, range_start, range_end),
            )
            .map_err(SlotError::from)
        };

        let bounded = async {
            match self.config.fetch_timeout {
                Some(limit) => tokio::time::timeout(limit, joined)
                    .await
                    .unwrap_or_else(|_| {
                        warn!(%offering_id, ?limit, "slot fetch deadline expired");
                        Err(SlotError::Cancelled)
                    }),
                None => joined.await,
            }
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(%offering_id, "slot generation cancelled during fetch");
                Err(SlotError::Cancelled)
            }
            result = bounded => result,
        }
    }
}
