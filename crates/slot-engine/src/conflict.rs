//! Conflict filtering of candidate slots against booked intervals.
//!
//! Intervals are half-open: `[a, b)` and `[c, d)` overlap iff `a < d && b > c`.
//! A booking that ends exactly when a slot starts, or starts exactly when it
//! ends, is NOT a conflict.

use chrono::{DateTime, Utc};

use crate::model::{BookedInterval, OfferingId, Slot};

/// Half-open interval overlap test.
pub fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && a_end > b_start
}

/// Keep only the bookings held against `offering_id`.
pub fn select_bookings(
    bookings: Vec<BookedInterval>,
    offering_id: OfferingId,
) -> Vec<BookedInterval> {
    bookings
        .into_iter()
        .filter(|b| b.offering_id == offering_id)
        .collect()
}

/// Check a single slot against every booking.
///
/// O(bookings); prefer [`filter_free`] when testing many slots.
pub fn is_slot_free(slot: &Slot, bookings: &[BookedInterval]) -> bool {
    !bookings
        .iter()
        .any(|b| overlaps(slot.starts_at, slot.ends_at, b.starts_at, b.ends_at()))
}

/// Merge overlapping or adjacent bookings into sorted, disjoint busy periods.
fn merge_busy_periods(bookings: &[BookedInterval]) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
    let mut intervals: Vec<(DateTime<Utc>, DateTime<Utc>)> = bookings
        .iter()
        .map(|b| (b.starts_at, b.ends_at()))
        .collect();

    intervals.sort_by_key(|&(start, end)| (start, end));

    let mut merged: Vec<(DateTime<Utc>, DateTime<Utc>)> = Vec::with_capacity(intervals.len());
    for (start, end) in intervals {
        if let Some(last) = merged.last_mut() {
            if start <= last.1 {
                last.1 = last.1.max(end);
                continue;
            }
        }
        merged.push((start, end));
    }

    merged
}

/// Drop every candidate that overlaps a booking; return the rest sorted by (start, end).
///
/// Bookings are merged into disjoint busy periods and both sides are swept once
/// with a single advancing cursor. Busy periods ending at or before a candidate's
/// start can never overlap a later candidate, so the first remaining period is
/// the only one that needs testing.
pub fn filter_free(mut candidates: Vec<Slot>, bookings: &[BookedInterval]) -> Vec<Slot> {
    candidates.sort();
    if bookings.is_empty() {
        return candidates;
    }

    let busy = merge_busy_periods(bookings);
    let mut cursor = 0;

    candidates
        .into_iter()
        .filter(|slot| {
            while cursor < busy.len() && busy[cursor].1 <= slot.starts_at {
                cursor += 1;
            }
            match busy.get(cursor) {
                Some(&(start, end)) => !overlaps(slot.starts_at, slot.ends_at, start, end),
                None => true,
            }
        })
        .collect()
}
