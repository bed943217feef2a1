//! Multi-date availability queries against a calendar source.
//!
//! For every requested date: build the working window in the reference timezone,
//! move it to the display timezone, fetch the day's busy periods, normalize them
//! to the same timezone, and subtract. Dates are processed one after another;
//! each depends only on its own inputs.

use std::time::Duration as StdDuration;

use chrono::{Duration, NaiveDate};
use chrono_tz::Tz;
use tracing::{debug, warn};

use crate::dst::DstPolicy;
use crate::error::{Result, SlotError};
use crate::freebusy::compute_free_slots;
use crate::hours::{working_window, WorkingHours};
use crate::normalize::{busy_for_window, normalize_busy};
use crate::source::{AccessStatus, CalendarSource};
use crate::summary::{format_availability, DailyAvailability, LOCAL_TIME_LABEL};

/// How long to wait for the user to answer an authorization prompt.
pub const DEFAULT_AUTHORIZATION_TIMEOUT: StdDuration = StdDuration::from_secs(10);

/// What to do when the calendar cannot be read for one of the dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Fail the whole query.
    #[default]
    Abort,
    /// Record the date in [`AvailabilityReport::failures`] and continue.
    SkipDate,
}

/// Everything needed to answer "when am I free?".
#[derive(Debug, Clone)]
pub struct AvailabilityRequest {
    /// Calendar to read busy time from.
    pub calendar: String,
    /// Dates to check, in the reference timezone.
    pub dates: Vec<NaiveDate>,
    pub hours: WorkingHours,
    /// Shortest slot worth reporting.
    pub min_duration: Duration,
    /// Timezone the working hours are defined in.
    pub reference_tz: Tz,
    /// Timezone to report in. `None` reports in the reference timezone as "Local Time".
    pub display_tz: Option<Tz>,
    pub dst_policy: DstPolicy,
    pub failure_policy: FailurePolicy,
    pub authorization_timeout: StdDuration,
}

impl AvailabilityRequest {
    pub fn new(
        calendar: impl Into<String>,
        dates: Vec<NaiveDate>,
        hours: WorkingHours,
        min_duration: Duration,
        reference_tz: Tz,
    ) -> Self {
        Self {
            calendar: calendar.into(),
            dates,
            hours,
            min_duration,
            reference_tz,
            display_tz: None,
            dst_policy: DstPolicy::default(),
            failure_policy: FailurePolicy::default(),
            authorization_timeout: DEFAULT_AUTHORIZATION_TIMEOUT,
        }
    }

    /// Builder: report slots in `tz`.
    pub fn with_display_tz(mut self, tz: Option<Tz>) -> Self {
        self.display_tz = tz;
        self
    }

    pub fn with_dst_policy(mut self, policy: DstPolicy) -> Self {
        self.dst_policy = policy;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Label shown next to the slots.
    pub fn display_label(&self) -> String {
        match self.display_tz {
            Some(tz) => tz.name().to_string(),
            None => LOCAL_TIME_LABEL.to_string(),
        }
    }
}

/// A date whose availability is unknown because the calendar could not be read.
#[derive(Debug)]
pub struct DateFailure {
    pub date: NaiveDate,
    pub error: SlotError,
}

/// Result of an availability query.
#[derive(Debug)]
pub struct AvailabilityReport {
    /// Free slots per date, in the display timezone, sorted by start.
    pub days: DailyAvailability,
    /// Dates skipped under [`FailurePolicy::SkipDate`].
    pub failures: Vec<DateFailure>,
    pub display_label: String,
}

impl AvailabilityReport {
    /// The email-ready text for this report.
    pub fn summary(&self) -> String {
        format_availability(&self.days, Some(&self.display_label))
    }
}

/// Compute free slots for every requested date.
///
/// # Errors
/// `SlotError::AccessDenied` if the source refuses access or does not answer
/// in time. Calendar errors for a single date abort the query under
/// [`FailurePolicy::Abort`] and are collected under [`FailurePolicy::SkipDate`].
pub fn find_availability<S: CalendarSource + ?Sized>(
    source: &S,
    request: &AvailabilityRequest,
) -> Result<AvailabilityReport> {
    match source.authorize(request.authorization_timeout) {
        AccessStatus::Granted => {}
        AccessStatus::Denied => {
            return Err(SlotError::AccessDenied(
                "calendar access was denied".to_string(),
            ))
        }
        AccessStatus::Undetermined => {
            return Err(SlotError::AccessDenied(format!(
                "no answer to the access request within {}s",
                request.authorization_timeout.as_secs()
            )))
        }
    }

    let display_tz = request.display_tz.unwrap_or(request.reference_tz);
    let mut days = DailyAvailability::new();
    let mut failures = Vec::new();

    for &date in &request.dates {
        let Some(window) =
            working_window(date, &request.hours, &request.reference_tz, request.dst_policy)
        else {
            debug!(%date, "working hours fall in a DST gap; no window");
            days.insert(date, Vec::new());
            continue;
        };
        let window = window.with_timezone(&display_tz);

        let periods = match source.busy_periods(&request.calendar, date) {
            Ok(periods) => periods,
            Err(error) if request.failure_policy == FailurePolicy::SkipDate => {
                warn!(%date, %error, "skipping date: calendar could not be read");
                failures.push(DateFailure { date, error });
                continue;
            }
            Err(error) => return Err(error),
        };
        debug!(%date, calendar = %request.calendar, count = periods.len(), "fetched busy periods");

        let busy = normalize_busy(
            &periods,
            &request.reference_tz,
            &display_tz,
            request.dst_policy,
        );
        let busy = busy_for_window(&busy, &window);
        let slots = compute_free_slots(&window, &busy, request.min_duration);
        debug!(%date, slots = slots.len(), "computed free slots");
        days.insert(date, slots);
    }

    Ok(AvailabilityReport {
        days,
        failures,
        display_label: request.display_label(),
    })
}
