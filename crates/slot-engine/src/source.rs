//! Calendar sources — where busy time comes from.
//!
//! A [`CalendarSource`] is passed explicitly to whatever needs calendar access;
//! there is no process-wide handle. Platform adapters (event stores, CalDAV,
//! scripting bridges) implement the trait. [`MemoryCalendar`] is the built-in
//! adapter, fed from a JSON document.
//!
//! # Adapter contract
//!
//! - Failures (authorization, missing calendar, unreachable backend) are errors,
//!   never an empty list. An empty list means "no events that day".
//! - All-day markers are not busy time and are dropped before returning.
//! - Naive times are wall-clock times in the adapter's reference timezone. A
//!   period belongs to a date when it overlaps that date's day in the reference
//!   timezone, compared as instants.

use std::collections::BTreeMap;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Days, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::Deserialize;

use crate::dst::{localize, DstPolicy};
use crate::error::{Result, SlotError};

/// Outcome of asking the user (or the platform) for calendar access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessStatus {
    Granted,
    Denied,
    /// No answer arrived before the timeout.
    Undetermined,
}

/// A point in time as reported by a calendar backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusyTime {
    /// Wall-clock time, implicitly in the reference timezone.
    Naive(NaiveDateTime),
    /// Time with an explicit UTC offset.
    Fixed(DateTime<FixedOffset>),
}

impl BusyTime {
    /// The instant this time denotes, reading naive times in `tz`.
    pub fn instant(&self, tz: &Tz) -> Option<DateTime<Utc>> {
        match self {
            BusyTime::Naive(dt) => {
                localize(*dt, tz, DstPolicy::ShiftForward).map(|t| t.with_timezone(&Utc))
            }
            BusyTime::Fixed(dt) => Some(dt.with_timezone(&Utc)),
        }
    }

    fn wall_time(&self) -> NaiveDateTime {
        match self {
            BusyTime::Naive(dt) => *dt,
            BusyTime::Fixed(dt) => dt.naive_local(),
        }
    }

    /// Parse an RFC 3339 timestamp, or a naive `YYYY-MM-DDTHH:MM[:SS]` wall-clock time.
    pub fn parse(s: &str) -> Result<Self> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(BusyTime::Fixed(dt));
        }
        ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
            .map(BusyTime::Naive)
            .ok_or_else(|| SlotError::InvalidTimestamp(s.to_string()))
    }
}

/// One busy period as supplied by a calendar backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusyPeriod {
    pub start: BusyTime,
    pub end: BusyTime,
    pub all_day: bool,
}

impl BusyPeriod {
    pub fn new(start: BusyTime, end: BusyTime) -> Self {
        Self {
            start,
            end,
            all_day: false,
        }
    }

    /// Whether this period is an all-day marker rather than bookable busy time.
    ///
    /// True when flagged by the backend, or when it starts at midnight and lasts
    /// exactly one day.
    pub fn is_all_day(&self) -> bool {
        if self.all_day {
            return true;
        }
        let start = self.start.wall_time();
        let end = self.end.wall_time();
        start.time() == NaiveTime::MIN && end - start == Duration::days(1)
    }

    /// Whether the period touches the day `date` in `tz`, boundaries included.
    ///
    /// Times that cannot be placed on the timeline are kept so that later
    /// normalization gets to report them.
    pub fn touches_day(&self, date: NaiveDate, tz: &Tz) -> bool {
        let day_start = localize(date.and_time(NaiveTime::MIN), tz, DstPolicy::ShiftForward);
        let day_end = date
            .checked_add_days(Days::new(1))
            .and_then(|next| localize(next.and_time(NaiveTime::MIN), tz, DstPolicy::ShiftForward));
        match (self.start.instant(tz), self.end.instant(tz), day_start, day_end) {
            (Some(start), Some(end), Some(day_start), Some(day_end)) => {
                start <= day_end && end >= day_start
            }
            _ => true,
        }
    }
}

/// A calendar backend that can report busy time for a date.
pub trait CalendarSource {
    /// Request access, blocking for at most `timeout`.
    ///
    /// Backends without an authorization step are always granted.
    fn authorize(&self, _timeout: StdDuration) -> AccessStatus {
        AccessStatus::Granted
    }

    /// Names of the calendars this source can read.
    fn list_calendars(&self) -> Result<Vec<String>>;

    /// Busy periods on `date` in the calendar named `calendar_id`, without all-day markers.
    ///
    /// # Errors
    /// `SlotError::CalendarNotFound` for an unknown calendar, `SlotError::CalendarAccess`
    /// when the backend cannot be read.
    fn busy_periods(&self, calendar_id: &str, date: NaiveDate) -> Result<Vec<BusyPeriod>>;
}

impl<T: CalendarSource + ?Sized> CalendarSource for &T {
    fn authorize(&self, timeout: StdDuration) -> AccessStatus {
        (**self).authorize(timeout)
    }

    fn list_calendars(&self) -> Result<Vec<String>> {
        (**self).list_calendars()
    }

    fn busy_periods(&self, calendar_id: &str, date: NaiveDate) -> Result<Vec<BusyPeriod>> {
        (**self).busy_periods(calendar_id, date)
    }
}

// ---------------------------------------------------------------------------
// In-memory source
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct CalendarDocument {
    calendars: BTreeMap<String, Vec<EventRecord>>,
}

#[derive(Deserialize)]
struct EventRecord {
    start: String,
    end: String,
    #[serde(default)]
    all_day: bool,
}

impl EventRecord {
    fn into_period(self) -> Result<BusyPeriod> {
        // A bare date marks an all-day event.
        if let (Ok(start), Ok(end)) = (
            NaiveDate::parse_from_str(&self.start, "%Y-%m-%d"),
            NaiveDate::parse_from_str(&self.end, "%Y-%m-%d"),
        ) {
            return Ok(BusyPeriod {
                start: BusyTime::Naive(start.and_time(NaiveTime::MIN)),
                end: BusyTime::Naive(end.and_time(NaiveTime::MIN)),
                all_day: true,
            });
        }
        Ok(BusyPeriod {
            start: BusyTime::parse(&self.start)?,
            end: BusyTime::parse(&self.end)?,
            all_day: self.all_day,
        })
    }
}

/// Calendars held in memory, keyed by name.
///
/// Dates and naive times are read in the reference timezone, UTC unless set
/// with [`MemoryCalendar::with_reference_tz`].
#[derive(Debug, Clone)]
pub struct MemoryCalendar {
    calendars: BTreeMap<String, Vec<BusyPeriod>>,
    access: Option<AccessStatus>,
    reference_tz: Tz,
}

impl Default for MemoryCalendar {
    fn default() -> Self {
        Self {
            calendars: BTreeMap::new(),
            access: None,
            reference_tz: Tz::UTC,
        }
    }
}

impl MemoryCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load calendars from a JSON document:
    ///
    /// ```json
    /// {"calendars": {"Work": [{"start": "2026-03-16T10:00:00", "end": "2026-03-16T10:30:00"}]}}
    /// ```
    ///
    /// Timestamps are RFC 3339, naive wall-clock `YYYY-MM-DDTHH:MM[:SS]`, or a bare
    /// `YYYY-MM-DD` for all-day events. `all_day` is optional.
    ///
    /// # Errors
    /// `SlotError::Json` for malformed JSON, `SlotError::InvalidTimestamp` for an
    /// unparseable time.
    pub fn from_json(json: &str) -> Result<Self> {
        let doc: CalendarDocument = serde_json::from_str(json)?;
        let mut calendars = BTreeMap::new();
        for (name, records) in doc.calendars {
            let periods = records
                .into_iter()
                .map(EventRecord::into_period)
                .collect::<Result<Vec<_>>>()?;
            calendars.insert(name, periods);
        }
        Ok(Self {
            calendars,
            ..Self::default()
        })
    }

    /// Add an event, creating the calendar if needed.
    pub fn add(&mut self, calendar: impl Into<String>, period: BusyPeriod) {
        self.calendars.entry(calendar.into()).or_default().push(period);
    }

    /// Builder: answer authorization requests with `status`.
    pub fn with_access(mut self, status: AccessStatus) -> Self {
        self.access = Some(status);
        self
    }

    /// Builder: read requested dates and naive times in `tz`.
    pub fn with_reference_tz(mut self, tz: Tz) -> Self {
        self.reference_tz = tz;
        self
    }
}

impl CalendarSource for MemoryCalendar {
    fn authorize(&self, _timeout: StdDuration) -> AccessStatus {
        self.access.unwrap_or(AccessStatus::Granted)
    }

    fn list_calendars(&self) -> Result<Vec<String>> {
        Ok(self.calendars.keys().cloned().collect())
    }

    fn busy_periods(&self, calendar_id: &str, date: NaiveDate) -> Result<Vec<BusyPeriod>> {
        if matches!(self.access, Some(AccessStatus::Denied)) {
            return Err(SlotError::AccessDenied("access denied".to_string()));
        }
        let periods = self
            .calendars
            .get(calendar_id)
            .ok_or_else(|| SlotError::CalendarNotFound(calendar_id.to_string()))?;
        Ok(periods
            .iter()
            .filter(|p| !p.is_all_day() && p.touches_day(date, &self.reference_tz))
            .copied()
            .collect())
    }
}
