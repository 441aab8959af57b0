//! Human-friendly rendering of calendar differences ("2 years, 3 months").
use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime};

/// A calendar difference broken into units, in the spirit of a relative delta.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CalendarDelta {
    pub years: i64,
    pub months: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl CalendarDelta {
    pub fn new(years: i64, months: i64, days: i64, hours: i64, minutes: i64, seconds: i64) -> Self {
        Self {
            years,
            months,
            days,
            hours,
            minutes,
            seconds,
        }
    }

    /// Whole months first, then the remainder as days/hours/minutes/seconds.
    /// Order of the arguments does not matter; the magnitude is returned.
    pub fn between(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        let (start, end) = if start <= end { (start, end) } else { (end, start) };

        let mut months = i64::from(end.year() - start.year()) * 12
            + i64::from(end.month()) - i64::from(start.month());
        let mut anchor = add_months(start, months);
        if anchor > end {
            months -= 1;
            anchor = add_months(start, months);
        }

        let rest = end - anchor;
        let total_seconds = rest.num_seconds();
        Self {
            years: months / 12,
            months: months % 12,
            days: total_seconds / 86_400,
            hours: (total_seconds % 86_400) / 3_600,
            minutes: (total_seconds % 3_600) / 60,
            seconds: total_seconds % 60,
        }
    }

    pub fn between_dates(start: NaiveDate, end: NaiveDate) -> Self {
        Self::between(start.and_time(NaiveTime::MIN), end.and_time(NaiveTime::MIN))
    }

    fn units(&self) -> [(i64, &'static str); 6] {
        [
            (self.years, "year"),
            (self.months, "month"),
            (self.days, "day"),
            (self.hours, "hour"),
            (self.minutes, "minute"),
            (self.seconds, "second"),
        ]
    }
}

fn add_months(start: NaiveDateTime, months: i64) -> NaiveDateTime {
    u32::try_from(months)
        .ok()
        .and_then(|m| start.checked_add_months(Months::new(m)))
        .unwrap_or(start)
}

fn display_unit(value: i64, name: &str) -> String {
    let plural = if value > 1 { "s" } else { "" };
    format!("{value} {name}{plural}")
}

/// Name the largest non-zero unit, and with `full_version` the next unit
/// down too when it is non-zero. All-zero deltas give `None`.
pub fn fancy_time(delta: &CalendarDelta, full_version: bool) -> Option<String> {
    let units = delta.units();
    for (idx, (value, name)) in units.iter().enumerate() {
        if *value <= 0 {
            continue;
        }
        let primary = display_unit(*value, name);
        if full_version {
            if let Some((next_value, next_name)) = units.get(idx + 1) {
                if *next_value > 0 {
                    return Some(format!("{}, {}", primary, display_unit(*next_value, next_name)));
                }
            }
        }
        return Some(primary);
    }
    None
}

/// Age between a birthday and either the death date or `today`.
pub fn age(
    birthday: NaiveDate,
    deathday: Option<NaiveDate>,
    today: NaiveDate,
    full_version: bool,
) -> Option<String> {
    let end = deathday.unwrap_or(today);
    fancy_time(&CalendarDelta::between_dates(birthday, end), full_version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_version_names_two_units() {
        let delta = CalendarDelta::new(2, 3, 0, 0, 0, 0);
        assert_eq!(fancy_time(&delta, true).as_deref(), Some("2 years, 3 months"));
        assert_eq!(fancy_time(&delta, false).as_deref(), Some("2 years"));
    }

    #[test]
    fn test_zero_delta_has_no_output() {
        assert_eq!(fancy_time(&CalendarDelta::default(), true), None);
        assert_eq!(fancy_time(&CalendarDelta::default(), false), None);
    }

    #[test]
    fn test_only_the_next_unit_is_considered() {
        // months is zero so days are never reached
        let delta = CalendarDelta::new(1, 0, 5, 0, 0, 0);
        assert_eq!(fancy_time(&delta, true).as_deref(), Some("1 year"));

        let delta = CalendarDelta::new(0, 0, 0, 1, 5, 30);
        assert_eq!(fancy_time(&delta, true).as_deref(), Some("1 hour, 5 minutes"));
        assert_eq!(
            fancy_time(&CalendarDelta::new(0, 0, 0, 0, 0, 3), true).as_deref(),
            Some("3 seconds")
        );
    }

    #[test]
    fn test_singular_units() {
        let delta = CalendarDelta::new(0, 1, 1, 0, 0, 0);
        assert_eq!(fancy_time(&delta, true).as_deref(), Some("1 month, 1 day"));
    }

    #[test]
    fn test_between_dates() {
        let born = NaiveDate::from_ymd_opt(2020, 1, 31).unwrap();
        let today = NaiveDate::from_ymd_opt(2022, 5, 2).unwrap();
        let delta = CalendarDelta::between_dates(born, today);
        assert_eq!((delta.years, delta.months, delta.days), (2, 3, 2));

        // month-end clamping: Jan 31 + 1 month is Feb 29 in 2020
        let march = NaiveDate::from_ymd_opt(2020, 3, 1).unwrap();
        let delta = CalendarDelta::between_dates(born, march);
        assert_eq!((delta.months, delta.days), (1, 1));

        assert_eq!(
            CalendarDelta::between_dates(today, born),
            CalendarDelta::between_dates(born, today)
        );
    }

    #[test]
    fn test_age_stops_at_death() {
        let born = NaiveDate::from_ymd_opt(2015, 6, 1).unwrap();
        let died = NaiveDate::from_ymd_opt(2019, 9, 1).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(age(born, Some(died), today, true).as_deref(), Some("4 years, 3 months"));
        assert_eq!(age(born, None, today, false).as_deref(), Some("8 years"));
        assert_eq!(age(born, None, today, true).as_deref(), Some("8 years, 7 months"));
    }
}
