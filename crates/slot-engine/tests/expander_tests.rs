//! Tests for window selection and candidate expansion.

use chrono::{NaiveDate, TimeZone, Utc, Weekday};
use chrono_tz::Tz;
use slot_engine::expander::{expand_window, expand_windows, select_windows};
use slot_engine::{AvailabilityWindow, DayAnchor, OfferingId, Slot};

/// Monday 2026-03-02, anchored in UTC.
fn monday() -> DayAnchor {
    DayAnchor::resolve(NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(), Tz::UTC).unwrap()
}

fn window(start: (u32, u32), end: (u32, u32), duration_minutes: u32) -> AvailabilityWindow {
    AvailabilityWindow {
        offering_id: OfferingId(1),
        weekday: Weekday::Mon,
        start_minute: start.0 * 60 + start.1,
        end_minute: end.0 * 60 + end.1,
        duration_minutes,
        active: true,
    }
}

fn slot(start: (u32, u32), end: (u32, u32)) -> Slot {
    Slot {
        starts_at: Utc.with_ymd_and_hms(2026, 3, 2, start.0, start.1, 0).unwrap(),
        ends_at: Utc.with_ymd_and_hms(2026, 3, 2, end.0, end.1, 0).unwrap(),
    }
}

#[test]
fn hour_window_splits_into_two_half_hours() {
    let candidates = expand_window(&window((9, 0), (10, 0), 30), &monday());

    assert_eq!(candidates, vec![slot((9, 0), (9, 30)), slot((9, 30), (10, 0))]);
}

#[test]
fn slot_ending_exactly_on_window_end_is_kept() {
    // 09:00-10:00 in 20-minute steps: the third slot ends at 10:00 exactly.
    let candidates = expand_window(&window((9, 0), (10, 0), 20), &monday());

    assert_eq!(candidates.len(), 3);
    assert_eq!(candidates[2], slot((9, 40), (10, 0)));
}

#[test]
fn partial_trailing_slot_is_dropped_not_truncated() {
    // 09:00-10:00 in 25-minute steps: 09:50-10:15 would overrun the window.
    let candidates = expand_window(&window((9, 0), (10, 0), 25), &monday());

    assert_eq!(candidates, vec![slot((9, 0), (9, 25)), slot((9, 25), (9, 50))]);
    assert!(candidates.iter().all(|s| s.duration_minutes() == 25));
}

#[test]
fn duration_longer_than_window_yields_nothing() {
    let candidates = expand_window(&window((9, 0), (9, 45), 60), &monday());
    assert!(candidates.is_empty());
}

#[test]
fn consecutive_candidates_do_not_overlap() {
    let candidates = expand_window(&window((8, 0), (12, 0), 45), &monday());

    for pair in candidates.windows(2) {
        assert_eq!(pair[0].ends_at, pair[1].starts_at);
    }
}

#[test]
fn window_ending_at_midnight_reaches_next_day() {
    let candidates = expand_window(&window((23, 0), (24, 0), 30), &monday());

    assert_eq!(candidates.len(), 2);
    assert_eq!(
        candidates[1].ends_at,
        Utc.with_ymd_and_hms(2026, 3, 3, 0, 0, 0).unwrap()
    );
}

#[test]
fn malformed_windows_produce_no_candidates() {
    let anchor = monday();

    let inverted = window((10, 0), (9, 0), 30);
    let empty = window((9, 0), (9, 0), 30);
    let zero_duration = window((9, 0), (10, 0), 0);
    let past_midnight = window((23, 0), (25, 0), 30);

    for w in [inverted, empty, zero_duration, past_midnight] {
        assert!(
            expand_window(&w, &anchor).is_empty(),
            "malformed window {:?} must not expand",
            w
        );
    }
}

#[test]
fn windows_expand_in_source_order() {
    let windows = vec![window((14, 0), (15, 0), 60), window((9, 0), (10, 0), 60)];

    let candidates = expand_windows(&windows, &monday());

    assert_eq!(candidates, vec![slot((14, 0), (15, 0)), slot((9, 0), (10, 0))]);
}

#[test]
fn selection_keeps_active_matching_windows_only() {
    let keep_a = window((9, 0), (10, 0), 30);
    let mut inactive = window((10, 0), (11, 0), 30);
    inactive.active = false;
    let mut tuesday = window((11, 0), (12, 0), 30);
    tuesday.weekday = Weekday::Tue;
    let mut other_offering = window((12, 0), (13, 0), 30);
    other_offering.offering_id = OfferingId(2);
    let keep_b = window((7, 0), (8, 0), 30);

    let selected = select_windows(
        vec![keep_a.clone(), inactive, tuesday, other_offering, keep_b.clone()],
        OfferingId(1),
        Weekday::Mon,
    );

    assert_eq!(selected, vec![keep_a, keep_b]);
}
