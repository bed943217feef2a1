//! Bring calendar busy periods into a single timezone.
//!
//! Backends report times either as bare wall-clock values (meaning the reference
//! timezone) or with an explicit offset. Everything is converted to the display
//! timezone before it is filtered by date and handed to the engine.

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use tracing::warn;

use crate::dst::{localize, DstPolicy};
use crate::interval::TimeInterval;
use crate::source::{BusyPeriod, BusyTime};

fn to_zone(t: BusyTime, reference_tz: &Tz, display_tz: &Tz, policy: DstPolicy) -> Option<DateTime<Tz>> {
    match t {
        BusyTime::Naive(naive) => {
            localize(naive, reference_tz, policy).map(|dt| dt.with_timezone(display_tz))
        }
        BusyTime::Fixed(dt) => Some(dt.with_timezone(display_tz)),
    }
}

/// Convert busy periods to intervals in `display_tz`.
///
/// Naive times are read in `reference_tz`. Periods that cannot be localized or
/// that do not end after they start are dropped with a warning.
pub fn normalize_busy(
    periods: &[BusyPeriod],
    reference_tz: &Tz,
    display_tz: &Tz,
    policy: DstPolicy,
) -> Vec<TimeInterval> {
    periods
        .iter()
        .filter_map(|p| {
            let start = to_zone(p.start, reference_tz, display_tz, policy);
            let end = to_zone(p.end, reference_tz, display_tz, policy);
            match (start, end) {
                (Some(start), Some(end)) if start < end => Some(TimeInterval::new(start, end)),
                _ => {
                    warn!(?p, "dropping busy period that is not a valid interval");
                    None
                }
            }
        })
        .collect()
}

/// Keep the busy intervals that touch any display-timezone date the window touches.
///
/// `window` and `busy` must already be in the same timezone.
pub fn busy_for_window(busy: &[TimeInterval], window: &TimeInterval) -> Vec<TimeInterval> {
    let first: NaiveDate = window.start.date_naive();
    let last: NaiveDate = window.end.date_naive();
    busy.iter()
        .filter(|b| b.start.date_naive() <= last && b.end.date_naive() >= first)
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};
    use chrono_tz::{Asia::Jerusalem, Asia::Tokyo, Europe::London, UTC};

    fn naive(d: u32, h: u32, m: u32) -> BusyTime {
        BusyTime::Naive(
            NaiveDate::from_ymd_opt(2026, 1, d)
                .unwrap()
                .and_hms_opt(h, m, 0)
                .unwrap(),
        )
    }

    #[test]
    fn naive_times_are_read_in_reference_zone() {
        let periods = [BusyPeriod::new(naive(12, 10, 0), naive(12, 11, 0))];
        let busy = normalize_busy(&periods, &Jerusalem, &London, DstPolicy::default());
        assert_eq!(busy.len(), 1);
        // 10:00 in Jerusalem (UTC+2) is 08:00 in London (UTC+0) in January.
        assert_eq!(busy[0].start, London.with_ymd_and_hms(2026, 1, 12, 8, 0, 0).unwrap());
        assert_eq!(busy[0].start.timezone(), London);
    }

    #[test]
    fn offset_times_keep_their_instant() {
        let offset = FixedOffset::east_opt(5 * 3600).unwrap();
        let periods = [BusyPeriod::new(
            BusyTime::Fixed(offset.with_ymd_and_hms(2026, 1, 12, 10, 0, 0).unwrap()),
            BusyTime::Fixed(offset.with_ymd_and_hms(2026, 1, 12, 11, 0, 0).unwrap()),
        )];
        let busy = normalize_busy(&periods, &Jerusalem, &UTC, DstPolicy::default());
        assert_eq!(busy[0].start, UTC.with_ymd_and_hms(2026, 1, 12, 5, 0, 0).unwrap());
    }

    #[test]
    fn malformed_periods_are_dropped() {
        let periods = [
            BusyPeriod::new(naive(12, 11, 0), naive(12, 10, 0)),
            BusyPeriod::new(naive(12, 10, 0), naive(12, 10, 0)),
        ];
        assert!(normalize_busy(&periods, &UTC, &UTC, DstPolicy::default()).is_empty());
    }

    #[test]
    fn date_filter_follows_the_window_across_midnight() {
        // Window 17:00-01:00 Tokyo spans two Tokyo dates.
        let window = TimeInterval::new(
            Tokyo.with_ymd_and_hms(2026, 1, 12, 17, 0, 0).unwrap(),
            Tokyo.with_ymd_and_hms(2026, 1, 13, 1, 0, 0).unwrap(),
        );
        let after_midnight = TimeInterval::new(
            Tokyo.with_ymd_and_hms(2026, 1, 13, 0, 15, 0).unwrap(),
            Tokyo.with_ymd_and_hms(2026, 1, 13, 0, 45, 0).unwrap(),
        );
        let next_week = TimeInterval::new(
            Tokyo.with_ymd_and_hms(2026, 1, 19, 18, 0, 0).unwrap(),
            Tokyo.with_ymd_and_hms(2026, 1, 19, 19, 0, 0).unwrap(),
        );
        let kept = busy_for_window(&[after_midnight, next_week], &window);
        assert_eq!(kept, vec![after_midnight]);
    }
}
