//! Error types for slot-engine operations.
//!
//! The pure computations ([`compute_free_slots`](crate::compute_free_slots),
//! [`format_availability`](crate::format_availability)) never fail. Everything
//! here comes from configuration parsing or from the collaborators that feed
//! the engine (calendar sources, location resolvers).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlotError {
    /// Working hours did not parse as 24-hour `HH:MM`, or end is not after start.
    #[error("Invalid working hours: {0}")]
    InvalidWorkingHours(String),

    /// Not an IANA zone identifier.
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// The calendar backend could not be queried.
    #[error("Calendar access error: {0}")]
    CalendarAccess(String),

    #[error("Calendar '{0}' not found")]
    CalendarNotFound(String),

    /// Authorization was refused or never answered.
    #[error("Calendar access not granted: {0}")]
    AccessDenied(String),

    /// The location resolver had no timezone for the given place.
    #[error("Could not determine timezone for location: {0}")]
    TimezoneNotFound(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SlotError {
    /// Whether this error came from the calendar source rather than from the request itself.
    pub fn is_calendar_access(&self) -> bool {
        matches!(
            self,
            Self::CalendarAccess(_) | Self::CalendarNotFound(_) | Self::AccessDenied(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SlotError>;
