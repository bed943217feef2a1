//! Tests for free slot computation over a single working window.

use chrono::{DateTime, Duration, TimeZone};
use chrono_tz::{Tz, UTC};
use slot_engine::freebusy::{compute_free_slots, first_free_slot, merge_busy};
use slot_engine::TimeInterval;

/// Helper: an instant on 2026-03-16 (UTC).
fn at(hour: u32, min: u32) -> DateTime<Tz> {
    UTC.with_ymd_and_hms(2026, 3, 16, hour, min, 0).unwrap()
}

/// Helper: an interval between two times on 2026-03-16.
fn span(start_hour: u32, start_min: u32, end_hour: u32, end_min: u32) -> TimeInterval {
    TimeInterval::new(at(start_hour, start_min), at(end_hour, end_min))
}

fn nine_to_five() -> TimeInterval {
    span(9, 0, 17, 0)
}

#[test]
fn short_meeting_splits_the_day() {
    // Window: 09:00-17:00, busy 10:00-10:30, min 60 min
    // Expected: 09:00-10:00, 10:30-17:00
    let slots = compute_free_slots(&nine_to_five(), &[span(10, 0, 10, 30)], Duration::minutes(60));

    assert_eq!(slots, vec![span(9, 0, 10, 0), span(10, 30, 17, 0)]);
}

#[test]
fn remainder_shorter_than_minimum_is_dropped() {
    // Busy 09:00-16:45 leaves 15 minutes, less than the 60 requested.
    let slots = compute_free_slots(&nine_to_five(), &[span(9, 0, 16, 45)], Duration::minutes(60));

    assert!(slots.is_empty());
}

#[test]
fn busy_equal_to_window_leaves_nothing() {
    let slots = compute_free_slots(&nine_to_five(), &[nine_to_five()], Duration::minutes(1));

    assert!(slots.is_empty());
}

#[test]
fn no_busy_time_returns_the_window() {
    let slots = compute_free_slots(&nine_to_five(), &[], Duration::minutes(60));

    assert_eq!(slots, vec![nine_to_five()]);
    assert_eq!(slots[0].duration_minutes(), 480);
}

#[test]
fn minimum_longer_than_window_returns_nothing() {
    let slots = compute_free_slots(&nine_to_five(), &[], Duration::minutes(481));

    assert!(slots.is_empty());
}

#[test]
fn slot_exactly_as_long_as_minimum_is_kept() {
    let slots = compute_free_slots(&nine_to_five(), &[span(10, 0, 17, 0)], Duration::minutes(60));

    assert_eq!(slots, vec![span(9, 0, 10, 0)]);
}

#[test]
fn busy_outside_window_has_no_effect() {
    let busy = vec![span(7, 0, 8, 0), span(17, 0, 18, 0), span(20, 0, 21, 0)];

    let slots = compute_free_slots(&nine_to_five(), &busy, Duration::minutes(30));

    assert_eq!(slots, vec![nine_to_five()]);
}

#[test]
fn busy_straddling_window_edges_is_clipped() {
    // Starts before the window, and another ends after it.
    let busy = vec![span(8, 0, 9, 30), span(16, 30, 18, 0)];

    let slots = compute_free_slots(&nine_to_five(), &busy, Duration::minutes(30));

    assert_eq!(slots, vec![span(9, 30, 16, 30)]);
}

#[test]
fn overlapping_busy_intervals() {
    // 10:00-11:30 and 11:00-12:00 cover 10:00-12:00 together.
    let busy = vec![span(10, 0, 11, 30), span(11, 0, 12, 0)];

    let slots = compute_free_slots(&nine_to_five(), &busy, Duration::minutes(30));

    assert_eq!(slots, vec![span(9, 0, 10, 0), span(12, 0, 17, 0)]);
}

#[test]
fn duplicate_busy_intervals_do_not_duplicate_gaps() {
    let busy = vec![span(12, 0, 13, 0), span(12, 0, 13, 0), span(12, 0, 13, 0)];

    let slots = compute_free_slots(&nine_to_five(), &busy, Duration::minutes(30));

    assert_eq!(slots, vec![span(9, 0, 12, 0), span(13, 0, 17, 0)]);
}

#[test]
fn adjacent_busy_intervals_leave_no_zero_length_gap() {
    let busy = vec![span(10, 0, 11, 0), span(11, 0, 12, 0)];

    let slots = compute_free_slots(&nine_to_five(), &busy, Duration::zero());

    assert_eq!(slots, vec![span(9, 0, 10, 0), span(12, 0, 17, 0)]);
}

#[test]
fn multiple_gaps_sorted_by_start() {
    // Busy given out of order.
    let busy = vec![span(15, 0, 16, 0), span(9, 30, 10, 0), span(12, 0, 13, 0)];

    let slots = compute_free_slots(&nine_to_five(), &busy, Duration::minutes(30));

    let durations: Vec<i64> = slots.iter().map(|s| s.duration_minutes()).collect();
    assert_eq!(durations, vec![30, 120, 120, 60]);
    assert!(slots.windows(2).all(|w| w[0].start < w[1].start));
}

#[test]
fn first_free_slot_skips_short_gaps() {
    // Gaps: 09:00-09:15 (15), 09:45-10:00 (15), 12:00-17:00 (300)
    let busy = vec![span(9, 15, 9, 45), span(10, 0, 12, 0)];

    let slot = first_free_slot(&nine_to_five(), &busy, Duration::minutes(60));

    assert_eq!(slot, Some(span(12, 0, 17, 0)));
}

#[test]
fn first_free_slot_none_when_day_is_full() {
    let slot = first_free_slot(&nine_to_five(), &[span(8, 0, 18, 0)], Duration::minutes(15));

    assert!(slot.is_none());
}

#[test]
fn merged_busy_and_free_tile_the_window() {
    let busy = vec![span(8, 0, 9, 30), span(11, 0, 12, 0), span(11, 30, 13, 0)];

    let merged = merge_busy(&nine_to_five(), &busy);
    let free = compute_free_slots(&nine_to_five(), &busy, Duration::zero());

    assert_eq!(merged, vec![span(9, 0, 9, 30), span(11, 0, 13, 0)]);
    assert_eq!(free, vec![span(9, 30, 11, 0), span(13, 0, 17, 0)]);
}

#[test]
fn works_across_timezones() {
    // Busy time given in Tokyo; window in UTC. Comparisons are by instant.
    let tokyo: Tz = "Asia/Tokyo".parse().unwrap();
    let busy = TimeInterval::new(
        tokyo.with_ymd_and_hms(2026, 3, 16, 21, 0, 0).unwrap(), // 12:00 UTC
        tokyo.with_ymd_and_hms(2026, 3, 16, 22, 0, 0).unwrap(), // 13:00 UTC
    );

    let slots = compute_free_slots(&nine_to_five(), &[busy], Duration::minutes(60));

    assert_eq!(slots, vec![span(9, 0, 12, 0), span(13, 0, 17, 0)]);
}
