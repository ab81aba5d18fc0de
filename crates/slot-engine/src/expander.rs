//! Window selection and candidate expansion.
//!
//! Each selected window is cut into back-to-back candidates of exactly the
//! window's slot duration, starting at `anchor + start_minute`. A candidate is
//! kept only while it ends at or before the window end; the trailing remainder
//! is dropped, never truncated.

use chrono::{Duration, Weekday};
use tracing::warn;

use crate::anchor::DayAnchor;
use crate::model::{AvailabilityWindow, OfferingId, Slot};

/// Keep the active windows of `offering_id` that fall on `weekday`, in source order.
pub fn select_windows(
    windows: Vec<AvailabilityWindow>,
    offering_id: OfferingId,
    weekday: Weekday,
) -> Vec<AvailabilityWindow> {
    windows
        .into_iter()
        .filter(|w| w.active && w.offering_id == offering_id && w.weekday == weekday)
        .collect()
}

/// Expand a single window into candidate slots on the anchored day.
///
/// Malformed windows (see [`AvailabilityWindow::is_well_formed`]) yield no
/// candidates.
pub fn expand_window(window: &AvailabilityWindow, anchor: &DayAnchor) -> Vec<Slot> {
    if !window.is_well_formed() {
        warn!(
            offering_id = %window.offering_id,
            start_minute = window.start_minute,
            end_minute = window.end_minute,
            duration_minutes = window.duration_minutes,
            "skipping malformed availability window"
        );
        return Vec::new();
    }

    let duration = Duration::minutes(i64::from(window.duration_minutes));
    let window_end = anchor.at_offset(window.end_minute);
    let capacity = (window.end_minute - window.start_minute) / window.duration_minutes;

    let mut candidates = Vec::with_capacity(capacity as usize);
    let mut cursor = anchor.at_offset(window.start_minute);

    // Inclusive end: a candidate may finish exactly on the window end.
    while cursor + duration <= window_end {
        let ends_at = cursor + duration;
        candidates.push(Slot {
            starts_at: cursor,
            ends_at,
        });
        cursor = ends_at;
    }

    candidates
}

/// Expand every window independently and concatenate the candidates.
pub fn expand_windows(windows: &[AvailabilityWindow], anchor: &DayAnchor) -> Vec<Slot> {
    windows
        .iter()
        .flat_map(|window| expand_window(window, anchor))
        .collect()
}
