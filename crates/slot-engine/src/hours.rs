//! Working hours and the per-date working window.
//!
//! Working hours are a pair of wall-clock times in the user's reference timezone.
//! Combined with a calendar date they become a [`TimeInterval`]: the only time
//! on that date that can be offered to others.

use std::fmt;

use chrono::{NaiveDate, NaiveTime, Timelike};
use chrono_tz::Tz;

use crate::dst::{localize, DstPolicy};
use crate::error::{Result, SlotError};
use crate::interval::TimeInterval;

/// Start and end of the working day as wall-clock times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkingHours {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl WorkingHours {
    /// Parse a pair of 24-hour `HH:MM` strings.
    ///
    /// # Errors
    /// Returns `SlotError::InvalidWorkingHours` if either string is malformed or
    /// if `end` is not after `start`.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        let start_time = parse_hhmm(start)?;
        let end_time = parse_hhmm(end)?;
        if end_time <= start_time {
            return Err(SlotError::InvalidWorkingHours(format!(
                "end {} must be after start {}",
                end.trim(),
                start.trim()
            )));
        }
        Ok(Self {
            start: start_time,
            end: end_time,
        })
    }
}

impl fmt::Display for WorkingHours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02} - {:02}:{:02}",
            self.start.hour(),
            self.start.minute(),
            self.end.hour(),
            self.end.minute()
        )
    }
}

/// Parse a 24-hour `HH:MM` string. The hour may have one or two digits
/// (`9:00` and `09:00` are both accepted); the minute always has two.
pub fn parse_hhmm(s: &str) -> Result<NaiveTime> {
    let invalid = || {
        SlotError::InvalidWorkingHours(format!("'{}' is not a 24-hour HH:MM time", s))
    };
    let (h, m) = s.trim().split_once(':').ok_or_else(invalid)?;
    let all_digits = |p: &str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(h) || h.len() > 2 || !all_digits(m) || m.len() != 2 {
        return Err(invalid());
    }
    let hour: u32 = h.parse().map_err(|_| invalid())?;
    let minute: u32 = m.parse().map_err(|_| invalid())?;
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)
}

/// Build the working window for `date`, localized to `reference_tz`.
///
/// Returns `None` when a boundary falls in a DST gap under [`DstPolicy::Skip`].
pub fn working_window(
    date: NaiveDate,
    hours: &WorkingHours,
    reference_tz: &Tz,
    policy: DstPolicy,
) -> Option<TimeInterval> {
    let start = localize(date.and_time(hours.start), reference_tz, policy)?;
    let end = localize(date.and_time(hours.end), reference_tz, policy)?;
    Some(TimeInterval::new(start, end))
}
