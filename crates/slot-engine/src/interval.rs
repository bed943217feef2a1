//! Timezone-aware time intervals.

use chrono::{DateTime, Duration, NaiveDate};
use chrono_tz::Tz;

/// A half-open interval `[start, end)` between two timezone-aware instants.
///
/// Well-formed intervals satisfy `start < end`. The type does not enforce this so
/// that calendar data can be carried as-is; see [`TimeInterval::is_valid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeInterval {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl TimeInterval {
    pub fn new(start: DateTime<Tz>, end: DateTime<Tz>) -> Self {
        Self { start, end }
    }

    pub fn is_valid(&self) -> bool {
        self.start < self.end
    }

    /// Length of the interval. Negative for malformed intervals.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn duration_minutes(&self) -> i64 {
        self.duration().num_minutes()
    }

    /// Two intervals overlap iff `a.start < b.end && b.start < a.end`.
    /// Intervals that merely touch do not overlap.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// The same instants expressed in another timezone.
    pub fn with_timezone(&self, tz: &Tz) -> TimeInterval {
        TimeInterval {
            start: self.start.with_timezone(tz),
            end: self.end.with_timezone(tz),
        }
    }

    /// The wall-clock date of `start` in the interval's own timezone.
    pub fn local_date(&self) -> NaiveDate {
        self.start.date_naive()
    }
}
