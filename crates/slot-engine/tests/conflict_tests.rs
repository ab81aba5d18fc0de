//! Tests for conflict filtering and the half-open overlap rule.

use chrono::{TimeZone, Utc};
use slot_engine::{
    filter_free, is_slot_free, overlaps, select_bookings, BookedInterval, BookingStatus,
    OfferingId, Slot,
};

fn slot(start: (u32, u32), end: (u32, u32)) -> Slot {
    Slot {
        starts_at: Utc.with_ymd_and_hms(2026, 3, 2, start.0, start.1, 0).unwrap(),
        ends_at: Utc.with_ymd_and_hms(2026, 3, 2, end.0, end.1, 0).unwrap(),
    }
}

fn booking(start: (u32, u32), duration_minutes: u32) -> BookedInterval {
    BookedInterval {
        offering_id: OfferingId(1),
        starts_at: Utc.with_ymd_and_hms(2026, 3, 2, start.0, start.1, 0).unwrap(),
        duration_minutes,
        status: BookingStatus::Scheduled,
    }
}

/// 09:00-12:00 in half-hour candidates.
fn morning() -> Vec<Slot> {
    (0..6)
        .map(|i| {
            let start = 9 * 60 + i * 30;
            let end = start + 30;
            slot((start / 60, start % 60), (end / 60, end % 60))
        })
        .collect()
}

#[test]
fn no_bookings_keeps_every_candidate() {
    assert_eq!(filter_free(morning(), &[]), morning());
}

#[test]
fn booking_on_first_slot_removes_only_that_slot() {
    let free = filter_free(
        vec![slot((9, 0), (9, 30)), slot((9, 30), (10, 0))],
        &[booking((9, 0), 30)],
    );

    assert_eq!(free, vec![slot((9, 30), (10, 0))]);
}

#[test]
fn booking_ending_at_slot_start_is_not_a_conflict() {
    // 08:30-09:00 touches the 09:00 slot but does not overlap it.
    let free = filter_free(
        vec![slot((9, 0), (9, 30)), slot((9, 30), (10, 0))],
        &[booking((8, 30), 30)],
    );

    assert_eq!(free, vec![slot((9, 0), (9, 30)), slot((9, 30), (10, 0))]);
}

#[test]
fn booking_starting_at_slot_end_is_not_a_conflict() {
    let free = filter_free(vec![slot((9, 0), (9, 30))], &[booking((9, 30), 60)]);
    assert_eq!(free, vec![slot((9, 0), (9, 30))]);
}

#[test]
fn straddling_booking_blocks_both_neighbours() {
    // 09:15-09:45 overlaps 09:00-09:30 and 09:30-10:00.
    let free = filter_free(
        vec![slot((9, 0), (9, 30)), slot((9, 30), (10, 0)), slot((10, 0), (10, 30))],
        &[booking((9, 15), 30)],
    );

    assert_eq!(free, vec![slot((10, 0), (10, 30))]);
}

#[test]
fn booking_contained_in_slot_blocks_it() {
    let free = filter_free(vec![slot((9, 0), (10, 0))], &[booking((9, 20), 10)]);
    assert!(free.is_empty());
}

#[test]
fn long_booking_blocks_every_slot_it_spans() {
    let free = filter_free(morning(), &[booking((9, 30), 120)]);

    assert_eq!(free, vec![slot((9, 0), (9, 30)), slot((11, 30), (12, 0))]);
}

#[test]
fn overlapping_and_unsorted_bookings_are_handled() {
    let bookings = vec![
        booking((11, 0), 15),
        booking((9, 45), 30),
        booking((9, 30), 20),
    ];

    let free = filter_free(morning(), &bookings);

    assert_eq!(
        free,
        vec![slot((9, 0), (9, 30)), slot((10, 30), (11, 0)), slot((11, 30), (12, 0))]
    );
}

#[test]
fn zero_length_booking_inside_slot_blocks_it() {
    let free = filter_free(vec![slot((9, 0), (9, 30))], &[booking((9, 10), 0)]);
    assert!(free.is_empty());
}

#[test]
fn zero_length_booking_on_boundary_blocks_nothing() {
    let free = filter_free(
        vec![slot((9, 0), (9, 30)), slot((9, 30), (10, 0))],
        &[booking((9, 30), 0)],
    );
    assert_eq!(free.len(), 2);
}

#[test]
fn output_is_sorted_even_for_unsorted_candidates() {
    let mut candidates = morning();
    candidates.reverse();

    let free = filter_free(candidates, &[booking((10, 0), 30)]);

    let mut expected = morning();
    expected.retain(|s| s.starts_at != slot((10, 0), (10, 30)).starts_at);
    assert_eq!(free, expected);
}

#[test]
fn mixed_durations_with_shared_start_are_tested_independently() {
    // A 60-minute and a 30-minute candidate both start at 09:00; a booking at
    // 09:40 hits only the longer one.
    let free = filter_free(
        vec![slot((9, 0), (10, 0)), slot((9, 0), (9, 30))],
        &[booking((9, 40), 10)],
    );

    assert_eq!(free, vec![slot((9, 0), (9, 30))]);
}

#[test]
fn single_slot_check_matches_sweep() {
    let bookings = vec![booking((9, 15), 30), booking((11, 0), 30)];
    let swept = filter_free(morning(), &bookings);

    for candidate in morning() {
        assert_eq!(
            is_slot_free(&candidate, &bookings),
            swept.contains(&candidate),
            "disagreement on {:?}",
            candidate
        );
    }
}

#[test]
fn overlap_rule_is_half_open() {
    let at = |h, m| Utc.with_ymd_and_hms(2026, 3, 2, h, m, 0).unwrap();

    assert!(overlaps(at(9, 0), at(10, 0), at(9, 30), at(10, 30)));
    assert!(!overlaps(at(9, 0), at(10, 0), at(10, 0), at(11, 0)));
    assert!(!overlaps(at(10, 0), at(11, 0), at(9, 0), at(10, 0)));
    assert!(overlaps(at(9, 0), at(12, 0), at(10, 0), at(11, 0)));
}

#[test]
fn select_bookings_keeps_only_the_requested_offering() {
    let mut foreign = booking((9, 0), 30);
    foreign.offering_id = OfferingId(2);
    let own = booking((10, 0), 30);

    let selected = select_bookings(vec![foreign, own.clone()], OfferingId(1));

    assert_eq!(selected, vec![own]);
}
