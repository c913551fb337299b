use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::app::{Result, SkimmerError};
use crate::domain::DisplayZone;

/// Calendar presets for picking a collection window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RangePreset {
    Today,
    Yesterday,
    ThisWeek,
    LastWeek,
    ThisMonth,
    LastMonth,
    Custom,
}

/// Inclusive date bounds for a range collection. A missing end means "now" at run start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
}

impl DateWindow {
    pub fn new(start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    /// Resolve a preset against `now`, interpreting calendar days in `zone`.
    ///
    /// `custom_start` is required for [`RangePreset::Custom`]; `custom_end` is optional.
    pub fn from_preset(
        preset: RangePreset,
        now: DateTime<Utc>,
        zone: &DisplayZone,
        custom_start: Option<&str>,
        custom_end: Option<&str>,
    ) -> Result<Self> {
        let today = zone.to_naive(now).date();
        let midnight = |date: NaiveDate| zone.to_utc(date.and_time(NaiveTime::MIN));
        let end_of_day = |date: NaiveDate| zone.to_utc(date.and_time(last_instant()));

        let window = match preset {
            RangePreset::Today => Self::new(midnight(today)?, None),
            RangePreset::Yesterday => {
                Self::new(midnight(today - Duration::days(1))?, Some(midnight(today)?))
            }
            RangePreset::ThisWeek => {
                let monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);
                Self::new(midnight(monday)?, None)
            }
            RangePreset::LastWeek => {
                let back = match today.weekday().num_days_from_sunday() {
                    0 => 7,
                    n => n as i64,
                };
                let last_sunday = today - Duration::days(back);
                let last_monday = last_sunday - Duration::days(6);
                Self::new(midnight(last_monday)?, Some(end_of_day(last_sunday)?))
            }
            RangePreset::ThisMonth => Self::new(midnight(first_of_month(today))?, None),
            RangePreset::LastMonth => {
                let this_first = first_of_month(today);
                let last_day = this_first - Duration::days(1);
                Self::new(midnight(first_of_month(last_day))?, Some(end_of_day(last_day)?))
            }
            RangePreset::Custom => {
                let start = custom_start.ok_or_else(|| {
                    SkimmerError::InvalidDate("Start date is required for custom range".into())
                })?;
                let start = parse_bound(start, zone, false)?;
                let end = custom_end.map(|s| parse_bound(s, zone, true)).transpose()?;
                Self::new(start, end)
            }
        };

        Ok(window)
    }

    /// Replace the start bound, keeping the end.
    pub fn with_start(self, start: DateTime<Utc>) -> Self {
        Self { start, ..self }
    }

    /// Concrete end bound, falling back to `now`.
    pub fn end_or(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.end.unwrap_or(now)
    }
}

/// Parse a user-supplied bound.
///
/// Accepts RFC 3339 instants, `YYYY-MM-DDTHH:MM[:SS]` wall-clock times in `zone`,
/// and bare `YYYY-MM-DD` dates. A bare date is the start of that day, or its
/// last millisecond when `end_of_day` is set.
pub fn parse_bound(input: &str, zone: &DisplayZone, end_of_day: bool) -> Result<DateTime<Utc>> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, fmt) {
            return zone.to_utc(naive);
        }
    }

    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| SkimmerError::InvalidDate(format!("Unrecognized date: {}", input)))?;
    let time = if end_of_day { last_instant() } else { NaiveTime::MIN };
    zone.to_utc(date.and_time(time))
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn last_instant() -> NaiveTime {
    NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc_zone() -> DisplayZone {
        DisplayZone::parse(Some("+00:00")).unwrap()
    }

    // Wednesday
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 13, 15, 30, 0).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, mi, s).unwrap()
    }

    fn preset(preset: RangePreset, now: DateTime<Utc>) -> DateWindow {
        DateWindow::from_preset(preset, now, &utc_zone(), None, None).unwrap()
    }

    #[test]
    fn test_today() {
        let w = preset(RangePreset::Today, now());
        assert_eq!(w.start, at(2024, 3, 13, 0, 0, 0));
        assert_eq!(w.end, None);
    }

    #[test]
    fn test_yesterday() {
        let w = preset(RangePreset::Yesterday, now());
        assert_eq!(w.start, at(2024, 3, 12, 0, 0, 0));
        assert_eq!(w.end, Some(at(2024, 3, 13, 0, 0, 0)));
    }

    #[test]
    fn test_this_week_starts_monday() {
        let w = preset(RangePreset::ThisWeek, now());
        assert_eq!(w.start, at(2024, 3, 11, 0, 0, 0));
        assert_eq!(w.end, None);
    }

    #[test]
    fn test_last_week_monday_to_sunday() {
        let w = preset(RangePreset::LastWeek, now());
        assert_eq!(w.start, at(2024, 3, 4, 0, 0, 0));
        let end = w.end.unwrap();
        assert_eq!(end.format("%Y-%m-%d %H:%M:%S%.3f").to_string(), "2024-03-10 23:59:59.999");
    }

    #[test]
    fn test_last_week_on_a_sunday() {
        let sunday = at(2024, 3, 17, 9, 0, 0);
        let w = preset(RangePreset::LastWeek, sunday);
        assert_eq!(w.start, at(2024, 3, 4, 0, 0, 0));
        assert_eq!(w.end.unwrap().date_naive().to_string(), "2024-03-10");
    }

    #[test]
    fn test_this_month() {
        let w = preset(RangePreset::ThisMonth, now());
        assert_eq!(w.start, at(2024, 3, 1, 0, 0, 0));
    }

    #[test]
    fn test_last_month_handles_leap_february() {
        let w = preset(RangePreset::LastMonth, now());
        assert_eq!(w.start, at(2024, 2, 1, 0, 0, 0));
        assert_eq!(w.end.unwrap().date_naive().to_string(), "2024-02-29");
    }

    #[test]
    fn test_last_month_in_january() {
        let jan = at(2024, 1, 5, 0, 0, 0);
        let w = preset(RangePreset::LastMonth, jan);
        assert_eq!(w.start, at(2023, 12, 1, 0, 0, 0));
        assert_eq!(w.end.unwrap().date_naive().to_string(), "2023-12-31");
    }

    #[test]
    fn test_custom_requires_start() {
        let err = DateWindow::from_preset(RangePreset::Custom, now(), &utc_zone(), None, None);
        assert!(matches!(err, Err(SkimmerError::InvalidDate(_))));
    }

    #[test]
    fn test_custom_end_extends_to_end_of_day() {
        let w = DateWindow::from_preset(
            RangePreset::Custom,
            now(),
            &utc_zone(),
            Some("2024-01-01"),
            Some("2024-01-31"),
        )
        .unwrap();
        assert_eq!(w.start, at(2024, 1, 1, 0, 0, 0));
        assert_eq!(
            w.end.unwrap().format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
            "2024-01-31 23:59:59.999"
        );
    }

    #[test]
    fn test_preset_respects_zone() {
        let jst = DisplayZone::parse(Some("+09:00")).unwrap();
        // 2024-03-13 15:30 UTC is already 2024-03-14 00:30 in Tokyo
        let w = DateWindow::from_preset(RangePreset::Today, now(), &jst, None, None).unwrap();
        assert_eq!(w.start, at(2024, 3, 13, 15, 0, 0));
    }

    #[test]
    fn test_parse_bound_formats() {
        let zone = utc_zone();
        assert_eq!(
            parse_bound("2024-05-01T12:00:00.000Z", &zone, false).unwrap(),
            at(2024, 5, 1, 12, 0, 0)
        );
        assert_eq!(
            parse_bound("2024-05-01T08:15", &zone, false).unwrap(),
            at(2024, 5, 1, 8, 15, 0)
        );
        assert_eq!(parse_bound("2024-05-01", &zone, false).unwrap(), at(2024, 5, 1, 0, 0, 0));
        assert!(parse_bound("May 1st", &zone, false).is_err());
    }

    #[test]
    fn test_with_start_keeps_end() {
        let w = DateWindow::new(at(2024, 1, 1, 0, 0, 0), Some(at(2024, 2, 1, 0, 0, 0)));
        let resumed = w.with_start(at(2024, 1, 20, 0, 0, 0));
        assert_eq!(resumed.start, at(2024, 1, 20, 0, 0, 0));
        assert_eq!(resumed.end, w.end);
    }
}
