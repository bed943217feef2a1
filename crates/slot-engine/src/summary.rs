//! Render multi-day availability as a message that can be pasted into an email.
//!
//! The output shape is fixed and other tools depend on it:
//!
//! ```text
//! On Monday, March 16, I am available to meet in any of the following times:
//! 09:00 - 10:00, 10:30 - 17:00, On Tuesday, March 17, I am available to meet in any of the following times:
//! 13:00 - 14:00.
//! Otherwise, I am also available on Wednesday, March 18, I am available to meet in any of the following times:
//! 09:00 - 17:00 (Europe/London)
//! ```

use chrono::NaiveDate;

use crate::interval::TimeInterval;

/// Returned when no requested date has a free slot.
pub const NO_AVAILABILITY: &str = "I don't have any availability during the requested dates.";

/// Label meaning "no conversion"; never appended to the output.
pub const LOCAL_TIME_LABEL: &str = "Local Time";

/// Free slots per requested date, in the order dates were added.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyAvailability {
    days: Vec<(NaiveDate, Vec<TimeInterval>)>,
}

impl DailyAvailability {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the slots for `date`, replacing any earlier entry for the same date in place.
    pub fn insert(&mut self, date: NaiveDate, slots: Vec<TimeInterval>) {
        match self.days.iter_mut().find(|(d, _)| *d == date) {
            Some(entry) => entry.1 = slots,
            None => self.days.push((date, slots)),
        }
    }

    pub fn get(&self, date: NaiveDate) -> Option<&[TimeInterval]> {
        self.days
            .iter()
            .find(|(d, _)| *d == date)
            .map(|(_, slots)| slots.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &[TimeInterval])> {
        self.days.iter().map(|(d, slots)| (*d, slots.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl FromIterator<(NaiveDate, Vec<TimeInterval>)> for DailyAvailability {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, Vec<TimeInterval>)>>(iter: I) -> Self {
        let mut daily = DailyAvailability::new();
        for (date, slots) in iter {
            daily.insert(date, slots);
        }
        daily
    }
}

fn day_sentence(date: NaiveDate, slots: &[TimeInterval]) -> String {
    let mut slots = slots.to_vec();
    slots.sort_by_key(|s| (s.start, s.end));
    let times = slots
        .iter()
        .map(|s| format!("{} - {}", s.start.format("%H:%M"), s.end.format("%H:%M")))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "On {}, I am available to meet in any of the following times:\n{}",
        date.format("%A, %B %d"),
        times
    )
}

/// Describe availability across all dates in one message.
///
/// Dates are sorted and dates without slots are left out. With a single remaining
/// date its sentence is used as-is; otherwise all but the last are joined with
/// `", "` and the last is introduced with `".\nOtherwise, I am also available on "`.
/// A `timezone_label` other than [`LOCAL_TIME_LABEL`] is appended in parentheses.
///
/// Slots must already be in the display timezone; no conversion happens here.
pub fn format_availability(daily: &DailyAvailability, timezone_label: Option<&str>) -> String {
    let mut days: Vec<(NaiveDate, &[TimeInterval])> =
        daily.iter().filter(|(_, slots)| !slots.is_empty()).collect();
    if days.is_empty() {
        return NO_AVAILABILITY.to_string();
    }
    days.sort_by_key(|(date, _)| *date);

    let mut sentences: Vec<String> = days
        .into_iter()
        .map(|(date, slots)| day_sentence(date, slots))
        .collect();

    let mut result = if sentences.len() == 1 {
        sentences.remove(0)
    } else {
        let last = sentences.split_off(sentences.len() - 1).concat();
        format!(
            "{}.\nOtherwise, I am also available on {}",
            sentences.join(", "),
            last
        )
    };

    if let Some(label) = timezone_label.filter(|l| !l.is_empty() && *l != LOCAL_TIME_LABEL) {
        result.push_str(&format!(" ({})", label));
    }

    result
}
