//! Compute free time slots by subtracting busy intervals from a working window.
//!
//! The free set starts as the whole window. Each busy interval is carved out of
//! every free piece it overlaps, leaving at most two pieces behind. Pieces shorter
//! than the requested meeting length are dropped at the end.

use chrono::Duration;

use crate::interval::TimeInterval;

/// Subtract `busy` from `window` and keep the gaps lasting at least `min_duration`.
///
/// - Busy intervals may arrive in any order, overlap each other, repeat, or extend
///   past the window. The resulting set does not depend on their order.
/// - Malformed busy intervals (`start >= end`) have no effect.
/// - An inverted or empty window yields no slots.
/// - A negative `min_duration` behaves like zero.
///
/// Slots are returned sorted by start time.
pub fn compute_free_slots(
    window: &TimeInterval,
    busy: &[TimeInterval],
    min_duration: Duration,
) -> Vec<TimeInterval> {
    if !window.is_valid() {
        return Vec::new();
    }

    let mut free = vec![*window];

    for b in busy.iter().filter(|b| b.is_valid()) {
        let mut next = Vec::with_capacity(free.len() + 1);
        for slot in free {
            if !b.overlaps(&slot) {
                next.push(slot);
                continue;
            }
            if b.start > slot.start {
                next.push(TimeInterval::new(slot.start, b.start));
            }
            if b.end < slot.end {
                next.push(TimeInterval::new(b.end, slot.end));
            }
        }
        free = next;
    }

    let min_duration = min_duration.max(Duration::zero());
    let mut slots: Vec<TimeInterval> = free
        .into_iter()
        .filter(|slot| slot.duration() >= min_duration)
        .collect();
    slots.sort_by_key(|s| (s.start, s.end));
    slots
}

/// Find the first free slot of at least `min_duration` within the window.
pub fn first_free_slot(
    window: &TimeInterval,
    busy: &[TimeInterval],
    min_duration: Duration,
) -> Option<TimeInterval> {
    compute_free_slots(window, busy, min_duration)
        .into_iter()
        .next()
}

/// Merge overlapping or adjacent busy periods, clipped to the window.
///
/// Returns a sorted, non-overlapping list of busy blocks. Together with the
/// output of [`compute_free_slots`] at zero minimum duration it tiles the window.
pub fn merge_busy(window: &TimeInterval, busy: &[TimeInterval]) -> Vec<TimeInterval> {
    if !window.is_valid() {
        return Vec::new();
    }

    // Clip to the window, discarding intervals entirely outside or malformed.
    let mut intervals: Vec<TimeInterval> = busy
        .iter()
        .filter(|b| b.is_valid() && b.overlaps(window))
        .map(|b| TimeInterval::new(b.start.max(window.start), b.end.min(window.end)))
        .collect();

    intervals.sort_by_key(|i| (i.start, i.end));

    let mut merged: Vec<TimeInterval> = Vec::new();
    for interval in intervals {
        if let Some(last) = merged.last_mut() {
            if interval.start <= last.end {
                last.end = last.end.max(interval.end);
                continue;
            }
        }
        merged.push(interval);
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::UTC;

    fn at(h: u32, m: u32) -> chrono::DateTime<chrono_tz::Tz> {
        UTC.with_ymd_and_hms(2026, 3, 16, h, m, 0).unwrap()
    }

    #[test]
    fn malformed_busy_interval_is_ignored() {
        let window = TimeInterval::new(at(9, 0), at(17, 0));
        let inverted = TimeInterval::new(at(12, 0), at(11, 0));
        let slots = compute_free_slots(&window, &[inverted], Duration::minutes(30));
        assert_eq!(slots, vec![window]);
    }

    #[test]
    fn inverted_window_has_no_slots() {
        let window = TimeInterval::new(at(17, 0), at(9, 0));
        assert!(compute_free_slots(&window, &[], Duration::zero()).is_empty());
        assert!(merge_busy(&window, &[]).is_empty());
    }

    #[test]
    fn merge_joins_adjacent_blocks() {
        let window = TimeInterval::new(at(9, 0), at(17, 0));
        let busy = [
            TimeInterval::new(at(10, 0), at(11, 0)),
            TimeInterval::new(at(11, 0), at(12, 0)),
            TimeInterval::new(at(8, 0), at(9, 30)),
        ];
        let merged = merge_busy(&window, &busy);
        assert_eq!(
            merged,
            vec![
                TimeInterval::new(at(9, 0), at(9, 30)),
                TimeInterval::new(at(10, 0), at(12, 0)),
            ]
        );
    }
}
