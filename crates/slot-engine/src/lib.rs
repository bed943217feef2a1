//! # slot-engine
//!
//! Find open meeting slots on one or more days by subtracting calendar busy time
//! from a working-hours window, with timezone conversion for scheduling across zones.
//!
//! ## Quick start
//!
//! ```rust
//! use chrono::{Duration, TimeZone};
//! use chrono_tz::UTC;
//! use slot_engine::{compute_free_slots, TimeInterval};
//!
//! let at = |h, m| UTC.with_ymd_and_hms(2026, 3, 16, h, m, 0).unwrap();
//! let window = TimeInterval::new(at(9, 0), at(17, 0));
//! let busy = [TimeInterval::new(at(10, 0), at(10, 30))];
//!
//! let slots = compute_free_slots(&window, &busy, Duration::minutes(60));
//! assert_eq!(slots, vec![
//!     TimeInterval::new(at(9, 0), at(10, 0)),
//!     TimeInterval::new(at(10, 30), at(17, 0)),
//! ]);
//! ```
//!
//! ## Modules
//!
//! - [`freebusy`] — Subtract busy intervals from a working window
//! - [`summary`] — Render multi-day availability as text
//! - [`availability`] — Run a multi-date query against a calendar source
//! - [`hours`] — Working hours parsing and per-date windows
//! - [`normalize`] — Bring busy periods into the display timezone
//! - [`source`] — Calendar source trait and the in-memory source
//! - [`resolver`] — Place name → timezone
//! - [`dst`] — DST gap/overlap policies
//! - [`interval`] — Timezone-aware intervals
//! - [`error`] — Error types

pub mod availability;
pub mod dst;
pub mod error;
pub mod freebusy;
pub mod hours;
pub mod interval;
pub mod normalize;
pub mod resolver;
pub mod source;
pub mod summary;

pub use availability::{find_availability, AvailabilityReport, AvailabilityRequest, FailurePolicy};
pub use dst::DstPolicy;
pub use error::SlotError;
pub use freebusy::{compute_free_slots, first_free_slot, merge_busy};
pub use hours::{working_window, WorkingHours};
pub use interval::TimeInterval;
pub use resolver::{parse_tz, LocationResolver, TzdbResolver};
pub use source::{AccessStatus, BusyPeriod, BusyTime, CalendarSource, MemoryCalendar};
pub use summary::{format_availability, DailyAvailability, LOCAL_TIME_LABEL, NO_AVAILABILITY};
