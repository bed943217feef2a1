//! DST transition policies for wall-clock times.

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

/// Longest gap we will step across when shifting forward. Real-world DST gaps
/// are one hour or less; a few zones have skipped whole days, which we don't chase.
const MAX_GAP_MINUTES: i64 = 180;

/// Policy for wall-clock times that fall in a DST transition.
///
/// Ambiguous times (the repeated hour when clocks fall back) always resolve to
/// the earlier instant. The policy only decides what happens in a gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DstPolicy {
    /// Times in the DST gap (e.g., 2:30 AM during spring forward) have no instant.
    Skip,
    /// Move to the first valid wall-clock time after the gap.
    #[default]
    ShiftForward,
}

/// Attach a timezone to a wall-clock datetime.
///
/// Returns `None` only when the time falls in a gap and the policy is [`DstPolicy::Skip`]
/// (or the gap is implausibly long).
pub fn localize(naive: NaiveDateTime, tz: &Tz, policy: DstPolicy) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => match policy {
            DstPolicy::Skip => None,
            DstPolicy::ShiftForward => (1..=MAX_GAP_MINUTES).find_map(|m| {
                match tz.from_local_datetime(&(naive + Duration::minutes(m))) {
                    LocalResult::Single(dt) => Some(dt),
                    LocalResult::Ambiguous(earliest, _) => Some(earliest),
                    LocalResult::None => None,
                }
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};
    use chrono_tz::America::New_York;

    fn naive(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    #[test]
    fn gap_time_shifts_to_end_of_gap() {
        // 2026-03-08 02:30 does not exist in New York.
        let dt = localize(naive(2026, 3, 8, 2, 30), &New_York, DstPolicy::ShiftForward).unwrap();
        assert_eq!((dt.hour(), dt.minute()), (3, 0));
    }

    #[test]
    fn gap_time_skipped() {
        assert!(localize(naive(2026, 3, 8, 2, 30), &New_York, DstPolicy::Skip).is_none());
    }

    #[test]
    fn ambiguous_time_takes_earliest() {
        // 01:30 happens twice on 2026-11-01; the first is EDT (UTC-4).
        let dt = localize(naive(2026, 11, 1, 1, 30), &New_York, DstPolicy::Skip).unwrap();
        assert_eq!(dt.naive_utc(), naive(2026, 11, 1, 5, 30));
    }
}
