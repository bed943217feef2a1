//! Map a place name to a timezone.

use chrono_tz::{Tz, TZ_VARIANTS};

use crate::error::{Result, SlotError};

/// Parse an IANA zone identifier such as `Europe/London`.
///
/// # Errors
/// `SlotError::InvalidTimezone` for anything `chrono-tz` does not know.
pub fn parse_tz(name: &str) -> Result<Tz> {
    name.trim()
        .parse()
        .map_err(|_| SlotError::InvalidTimezone(name.to_string()))
}

/// Something that can turn free text like `"London, UK"` into a timezone.
pub trait LocationResolver {
    /// # Errors
    /// `SlotError::TimezoneNotFound` when the place is unknown.
    fn resolve(&self, place: &str) -> Result<Tz>;
}

/// Offline resolver backed by the IANA database bundled with `chrono-tz`.
///
/// Accepts a zone identifier (`Europe/London`, any case) or a city that names a
/// zone (`London`, `tel aviv`, `New York, NY`). Only the text before the first
/// comma is used for city lookup.
#[derive(Debug, Clone, Copy, Default)]
pub struct TzdbResolver;

impl TzdbResolver {
    fn by_identifier(name: &str) -> Option<Tz> {
        name.parse::<Tz>().ok().or_else(|| {
            TZ_VARIANTS
                .iter()
                .find(|tz| tz.name().eq_ignore_ascii_case(name))
                .copied()
        })
    }

    fn by_city(city: &str) -> Option<Tz> {
        let wanted = city.split_whitespace().collect::<Vec<_>>().join("_");
        if wanted.is_empty() {
            return None;
        }
        TZ_VARIANTS
            .iter()
            .filter(|tz| !tz.name().starts_with("Etc/"))
            .find(|tz| {
                tz.name()
                    .rsplit('/')
                    .next()
                    .is_some_and(|last| last.eq_ignore_ascii_case(&wanted))
            })
            .copied()
    }
}

impl LocationResolver for TzdbResolver {
    fn resolve(&self, place: &str) -> Result<Tz> {
        let place = place.trim();
        let city = place.split(',').next().unwrap_or_default().trim();
        Self::by_identifier(place)
            .or_else(|| Self::by_city(city))
            .ok_or_else(|| SlotError::TimezoneNotFound(place.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_zone_identifiers() {
        assert_eq!(parse_tz("Asia/Jerusalem").unwrap(), Tz::Asia__Jerusalem);
        assert_eq!(parse_tz(" UTC ").unwrap(), Tz::UTC);
        assert!(matches!(
            parse_tz("Mars/Olympus"),
            Err(SlotError::InvalidTimezone(name)) if name == "Mars/Olympus"
        ));
    }

    #[test]
    fn resolves_identifiers() {
        assert_eq!(TzdbResolver.resolve("Europe/London").unwrap(), Tz::Europe__London);
        assert_eq!(TzdbResolver.resolve("europe/london").unwrap(), Tz::Europe__London);
    }

    #[test]
    fn resolves_city_names() {
        assert_eq!(TzdbResolver.resolve("London, UK").unwrap(), Tz::Europe__London);
        assert_eq!(TzdbResolver.resolve("new york").unwrap(), Tz::America__New_York);
        assert_eq!(TzdbResolver.resolve("  Tokyo ").unwrap(), Tz::Asia__Tokyo);
    }

    #[test]
    fn unknown_place_is_not_found() {
        assert!(matches!(
            TzdbResolver.resolve("Atlantis"),
            Err(SlotError::TimezoneNotFound(p)) if p == "Atlantis"
        ));
        assert!(TzdbResolver.resolve("").is_err());
    }
}
