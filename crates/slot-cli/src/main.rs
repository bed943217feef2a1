//! `slots` CLI — find free meeting slots in a calendar from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Pick the calendar file and the calendar to read busy time from
//! slots config set --calendar-file ~/calendars.json --calendar Work
//!
//! # Set default working hours and the zone they are defined in
//! slots config set --start 09:00 --end 17:00 --reference-tz Asia/Jerusalem
//!
//! # Free 60-minute slots today
//! slots check
//!
//! # Free 30-minute slots on two days, shown in London time
//! slots check --date 2026-03-16 --date tomorrow --duration 30 --location "London, UK"
//!
//! # Same query with temporary working hours, as JSON
//! slots check --start 08:00 --end 12:00 --format json
//!
//! # List calendars / look up a timezone
//! slots calendars
//! slots resolve "Tel Aviv"
//! ```

mod config;
mod logging;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{Days, NaiveDate, Utc};
use chrono_tz::Tz;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use slot_engine::{
    find_availability, parse_tz, AvailabilityReport, AvailabilityRequest, CalendarSource,
    FailurePolicy, LocationResolver, MemoryCalendar, TzdbResolver, WorkingHours,
};
use tracing::debug;

use crate::config::{default_config_path, Config, HoursConfig};

#[derive(Parser)]
#[command(
    name = "slots",
    version,
    about = "Find free meeting slots in your calendar"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Settings file (defaults to <config dir>/slots/config.json)
    #[arg(long, global = true, env = "SLOTS_CONFIG")]
    config: Option<PathBuf>,

    /// Calendar JSON file (overrides the configured one)
    #[arg(long, global = true, env = "SLOTS_CALENDAR_FILE")]
    calendar_file: Option<PathBuf>,

    /// Log what the engine is doing to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show free slots on one or more dates
    Check {
        /// Calendar to read (defaults to the configured one)
        #[arg(long)]
        calendar: Option<String>,
        /// Date to check: today, tomorrow, or YYYY-MM-DD (repeatable; defaults to today)
        #[arg(short, long = "date")]
        dates: Vec<String>,
        /// Meeting length in minutes
        #[arg(short = 'm', long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=480))]
        duration: u32,
        /// Show slots in the timezone of this place ("London, UK", "Europe/London", or "local")
        #[arg(short, long, conflicts_with = "last_location")]
        location: Option<String>,
        /// Reuse the last location that was looked up
        #[arg(long)]
        last_location: bool,
        /// Temporary start of the working day (HH:MM), requires --end
        #[arg(long, requires = "end")]
        start: Option<String>,
        /// Temporary end of the working day (HH:MM), requires --start
        #[arg(long, requires = "start")]
        end: Option<String>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Leave out dates whose calendar cannot be read instead of failing
        #[arg(long)]
        skip_unavailable: bool,
        /// Allow dates before today
        #[arg(long)]
        allow_past: bool,
    },
    /// List the calendars in the calendar file
    Calendars,
    /// Look up the timezone for a place
    Resolve {
        /// Place name or IANA timezone
        place: String,
    },
    /// Show or change settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the current settings
    Show,
    /// Change settings
    Set {
        /// Default calendar
        #[arg(long)]
        calendar: Option<String>,
        /// Start of the working day (HH:MM), requires --end
        #[arg(long, requires = "end")]
        start: Option<String>,
        /// End of the working day (HH:MM), requires --start
        #[arg(long, requires = "start")]
        end: Option<String>,
        /// IANA timezone the working hours are in
        #[arg(long)]
        reference_tz: Option<String>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    debug!(path = %config_path.display(), "using config file");
    let mut config = Config::load(&config_path)?;

    match cli.command {
        Commands::Check {
            calendar,
            dates,
            duration,
            location,
            last_location,
            start,
            end,
            format,
            skip_unavailable,
            allow_past,
        } => {
            let reference_tz = config.reference_tz()?;
            let source = open_calendar_file(cli.calendar_file.as_deref(), &config)?
                .with_reference_tz(reference_tz);
            let calendar = select_calendar(&source, calendar, &config)?;

            let hours = match (start, end) {
                (Some(start), Some(end)) => WorkingHours::parse(&start, &end)
                    .context("Please enter times in HH:MM format (e.g., 09:00)")?,
                _ => config.working_hours()?,
            };
            let dates = parse_dates(&dates, reference_tz, allow_past)?;

            let location = if last_location {
                Some(config.last_location.clone()).filter(|l| !l.trim().is_empty())
            } else {
                location
            };
            let display_tz = match location.as_deref().map(str::trim) {
                None | Some("") => None,
                Some(place) if place.eq_ignore_ascii_case("local") => None,
                Some(place) => {
                    let tz = TzdbResolver.resolve(place).with_context(|| {
                        format!("Could not determine timezone for the given location: {place}")
                    })?;
                    if config.last_location != place {
                        config.last_location = place.to_string();
                        config.save(&config_path)?;
                    }
                    Some(tz)
                }
            };

            let failure_policy = if skip_unavailable {
                FailurePolicy::SkipDate
            } else {
                FailurePolicy::Abort
            };
            let request = AvailabilityRequest::new(
                calendar,
                dates,
                hours,
                chrono::Duration::minutes(i64::from(duration)),
                reference_tz,
            )
            .with_display_tz(display_tz)
            .with_failure_policy(failure_policy);

            let report = find_availability(&source, &request)
                .context("Failed to check availability")?;

            for failure in &report.failures {
                eprintln!(
                    "Warning: availability for {} is unknown: {}",
                    failure.date, failure.error
                );
            }

            match format {
                OutputFormat::Text => println!("{}", report.summary()),
                OutputFormat::Json => {
                    let dto = ReportDto::from(&report);
                    println!("{}", serde_json::to_string_pretty(&dto)?);
                }
            }
        }
        Commands::Calendars => {
            let source = open_calendar_file(cli.calendar_file.as_deref(), &config)?;
            for name in source.list_calendars()? {
                let marker = if config.selected_calendar.as_deref() == Some(name.as_str()) {
                    "*"
                } else {
                    " "
                };
                println!("{} {}", marker, name);
            }
        }
        Commands::Resolve { place } => {
            let tz = TzdbResolver
                .resolve(&place)
                .with_context(|| format!("Location not found: {place}"))?;
            println!("{}", tz.name());
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
            ConfigAction::Set {
                calendar,
                start,
                end,
                reference_tz,
            } => {
                if let (Some(start), Some(end)) = (start, end) {
                    WorkingHours::parse(&start, &end)
                        .context("Please enter times in HH:MM format (e.g., 09:00)")?;
                    config.working_hours = HoursConfig { start, end };
                }
                if let Some(tz) = reference_tz {
                    parse_tz(&tz)?;
                    config.reference_timezone = tz;
                }
                // A --calendar-file given here becomes the default.
                if let Some(path) = cli.calendar_file.clone() {
                    config.calendar_file = Some(path);
                }
                if let Some(calendar) = calendar {
                    // Without a calendar file the name is saved unchecked.
                    if config.calendar_file.is_some() {
                        let source = open_calendar_file(None, &config)?;
                        let available = source.list_calendars()?;
                        if !available.contains(&calendar) {
                            bail!(
                                "Calendar '{}' not found. Available calendars: {}",
                                calendar,
                                available.join(", ")
                            );
                        }
                    }
                    config.selected_calendar = Some(calendar);
                }
                config.save(&config_path)?;
                println!("Saved settings to {}", config_path.display());
            }
        },
    }

    Ok(())
}

/// Load the calendar file named on the command line, or the configured one.
fn open_calendar_file(flag: Option<&Path>, config: &Config) -> Result<MemoryCalendar> {
    let Some(path) = flag.or(config.calendar_file.as_deref()) else {
        bail!("No calendar file configured. Pass --calendar-file or run `slots config set --calendar-file PATH`.");
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read calendar file: {}", path.display()))?;
    MemoryCalendar::from_json(&json)
        .with_context(|| format!("Failed to load calendar file: {}", path.display()))
}

/// Pick the calendar to read and make sure it still exists.
fn select_calendar(
    source: &MemoryCalendar,
    requested: Option<String>,
    config: &Config,
) -> Result<String> {
    let available = source.list_calendars()?;
    if available.is_empty() {
        bail!("No calendars found. Please check the calendar file.");
    }
    let Some(calendar) = requested.or_else(|| config.selected_calendar.clone()) else {
        bail!(
            "No calendar selected. Available calendars: {}. Choose one with --calendar or `slots config set --calendar NAME`.",
            available.join(", ")
        );
    };
    if !available.contains(&calendar) {
        bail!(
            "Calendar '{}' is no longer available. Available calendars: {}. Please select a new calendar with `slots config set --calendar NAME`.",
            calendar,
            available.join(", ")
        );
    }
    Ok(calendar)
}

/// Parse `today`, `tomorrow` and `YYYY-MM-DD`, then sort and deduplicate.
///
/// "Today" is the current date in the reference timezone.
fn parse_dates(raw: &[String], reference_tz: Tz, allow_past: bool) -> Result<Vec<NaiveDate>> {
    let today = Utc::now().with_timezone(&reference_tz).date_naive();
    if raw.is_empty() {
        return Ok(vec![today]);
    }

    let mut dates = Vec::with_capacity(raw.len());
    for value in raw {
        let date = match value.trim().to_ascii_lowercase().as_str() {
            "today" => today,
            "tomorrow" => today
                .checked_add_days(Days::new(1))
                .context("Date out of range")?,
            other => NaiveDate::parse_from_str(other, "%Y-%m-%d").with_context(|| {
                format!("Please enter a valid date in YYYY-MM-DD format: '{value}'")
            })?,
        };
        if date < today && !allow_past {
            bail!("Please enter a current or future date: {date}");
        }
        dates.push(date);
    }
    dates.sort();
    dates.dedup();
    Ok(dates)
}

// ---------------------------------------------------------------------------
// JSON output
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct SlotDto {
    start: String,
    end: String,
    duration_minutes: i64,
}

#[derive(Serialize)]
struct DayDto {
    date: String,
    slots: Vec<SlotDto>,
}

#[derive(Serialize)]
struct FailureDto {
    date: String,
    error: String,
}

#[derive(Serialize)]
struct ReportDto {
    timezone: String,
    days: Vec<DayDto>,
    failures: Vec<FailureDto>,
    summary: String,
}

impl From<&AvailabilityReport> for ReportDto {
    fn from(report: &AvailabilityReport) -> Self {
        let mut days: Vec<DayDto> = report
            .days
            .iter()
            .map(|(date, slots)| DayDto {
                date: date.to_string(),
                slots: slots
                    .iter()
                    .map(|s| SlotDto {
                        start: s.start.to_rfc3339(),
                        end: s.end.to_rfc3339(),
                        duration_minutes: s.duration_minutes(),
                    })
                    .collect(),
            })
            .collect();
        days.sort_by(|a, b| a.date.cmp(&b.date));

        Self {
            timezone: report.display_label.clone(),
            days,
            failures: report
                .failures
                .iter()
                .map(|f| FailureDto {
                    date: f.date.to_string(),
                    error: f.error.to_string(),
                })
                .collect(),
            summary: report.summary(),
        }
    }
}
