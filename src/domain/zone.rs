use chrono::{DateTime, FixedOffset, Local, LocalResult, NaiveDateTime, TimeZone, Utc};

use crate::app::{Result, SkimmerError};

/// Time zone used to render dates and to interpret calendar presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayZone {
    #[default]
    Local,
    Fixed(FixedOffset),
}

impl DisplayZone {
    /// Parse an offset like "+09:00" or "-05:30". `None` means the system zone.
    pub fn parse(offset: Option<&str>) -> Result<Self> {
        let Some(offset) = offset.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(Self::Local);
        };

        if offset.eq_ignore_ascii_case("utc") || offset == "Z" {
            return FixedOffset::east_opt(0)
                .map(Self::Fixed)
                .ok_or_else(|| SkimmerError::Config(format!("Invalid UTC offset: {}", offset)));
        }

        // chrono wants minutes; a bare "+09" means whole hours
        let offset = if offset.len() == 3 {
            format!("{}:00", offset)
        } else {
            offset.to_string()
        };

        offset
            .parse::<FixedOffset>()
            .map(Self::Fixed)
            .map_err(|e| SkimmerError::Config(format!("Invalid UTC offset {}: {}", offset, e)))
    }

    /// Render a UTC instant as wall-clock text in this zone.
    pub fn format(&self, dt: DateTime<Utc>, fmt: &str) -> String {
        match self {
            Self::Local => dt.with_timezone(&Local).format(fmt).to_string(),
            Self::Fixed(offset) => dt.with_timezone(offset).format(fmt).to_string(),
        }
    }

    /// Wall-clock time of `dt` in this zone.
    pub fn to_naive(&self, dt: DateTime<Utc>) -> NaiveDateTime {
        match self {
            Self::Local => dt.with_timezone(&Local).naive_local(),
            Self::Fixed(offset) => dt.with_timezone(offset).naive_local(),
        }
    }

    /// Interpret a wall-clock time in this zone. Ambiguous times take the earlier instant.
    pub fn to_utc(&self, naive: NaiveDateTime) -> Result<DateTime<Utc>> {
        let resolved = match self {
            Self::Local => pick(Local.from_local_datetime(&naive)),
            Self::Fixed(offset) => pick(offset.from_local_datetime(&naive)),
        };
        resolved.ok_or_else(|| {
            SkimmerError::InvalidDate(format!("{} does not exist in this zone", naive))
        })
    }
}

fn pick<Tz: TimeZone>(result: LocalResult<DateTime<Tz>>) -> Option<DateTime<Utc>> {
    match result {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_none_is_local() {
        assert_eq!(DisplayZone::parse(None).unwrap(), DisplayZone::Local);
        assert_eq!(DisplayZone::parse(Some("  ")).unwrap(), DisplayZone::Local);
    }

    #[test]
    fn test_parse_offsets() {
        let jst = DisplayZone::parse(Some("+09:00")).unwrap();
        assert_eq!(jst, DisplayZone::Fixed(FixedOffset::east_opt(9 * 3600).unwrap()));

        let india = DisplayZone::parse(Some("+05:30")).unwrap();
        assert_eq!(india, DisplayZone::Fixed(FixedOffset::east_opt(5 * 3600 + 1800).unwrap()));

        let west = DisplayZone::parse(Some("-05")).unwrap();
        assert_eq!(west, DisplayZone::Fixed(FixedOffset::west_opt(5 * 3600).unwrap()));

        let utc = DisplayZone::parse(Some("UTC")).unwrap();
        assert_eq!(utc, DisplayZone::Fixed(FixedOffset::east_opt(0).unwrap()));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(DisplayZone::parse(Some("Tokyo")).is_err());
        assert!(DisplayZone::parse(Some("+ab:00")).is_err());
        assert!(DisplayZone::parse(Some("+99:00")).is_err());
        assert!(DisplayZone::parse(Some("0900")).is_err());
    }

    #[test]
    fn test_parse_rejects_out_of_range_parts() {
        assert!(DisplayZone::parse(Some("+999999999")).is_err());
        assert!(DisplayZone::parse(Some("+09:75")).is_err());
        assert!(DisplayZone::parse(Some("+05:-30")).is_err());
    }

    #[test]
    fn test_format_in_fixed_zone() {
        let zone = DisplayZone::parse(Some("+09:00")).unwrap();
        let dt = Utc.with_ymd_and_hms(2024, 1, 31, 20, 5, 0).unwrap();
        assert_eq!(zone.format(dt, "%m/%d %H:%M"), "02/01 05:05");
    }

    #[test]
    fn test_naive_round_trip_fixed() {
        let zone = DisplayZone::parse(Some("-03:00")).unwrap();
        let dt = Utc.with_ymd_and_hms(2024, 6, 1, 1, 0, 0).unwrap();
        let naive = zone.to_naive(dt);
        assert_eq!(naive.to_string(), "2024-05-31 22:00:00");
        assert_eq!(zone.to_utc(naive).unwrap(), dt);
    }
}
