use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::models::pricing::DayType;

/// 2025 Philippine regular and special non-working holidays. Weekend rates
/// apply on these dates. Further years come from the `HOLIDAY_DATES`
/// environment variable rather than more entries here.
const HOLIDAY_SNAPSHOT: &[&str] = &[
    "2025-01-01", // New Year's Day
    "2025-01-29", // Chinese New Year
    "2025-04-01", // Eid'l Fitr
    "2025-04-09", // Araw ng Kagitingan
    "2025-04-17", // Maundy Thursday
    "2025-04-18", // Good Friday
    "2025-04-19", // Black Saturday
    "2025-05-01", // Labor Day
    "2025-06-06", // Eid'l Adha
    "2025-06-12", // Independence Day
    "2025-08-21", // Ninoy Aquino Day
    "2025-08-25", // National Heroes Day
    "2025-10-31", // All Saints' Day Eve
    "2025-11-01", // All Saints' Day
    "2025-11-30", // Bonifacio Day
    "2025-12-08", // Feast of the Immaculate Conception
    "2025-12-24", // Christmas Eve
    "2025-12-25", // Christmas Day
    "2025-12-30", // Rizal Day
    "2025-12-31", // New Year's Eve
];

#[derive(Debug, Clone)]
pub struct HolidayCalendar {
    dates: HashSet<NaiveDate>,
}

impl HolidayCalendar {
    /// Built-in snapshot, overridden wholesale by `HOLIDAY_DATES`
    /// (comma-separated YYYY-MM-DD) when set. Unparseable entries are
    /// skipped, not fatal.
    pub fn from_env() -> Self {
        match std::env::var("HOLIDAY_DATES") {
            Ok(raw) if !raw.trim().is_empty() => Self::from_dates(raw.split(',')),
            _ => Self::from_dates(HOLIDAY_SNAPSHOT.iter().copied()),
        }
    }

    pub fn from_dates<'a>(dates: impl IntoIterator<Item = &'a str>) -> Self {
        let dates = dates
            .into_iter()
            .filter_map(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
            .collect();
        Self { dates }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }
}

/// Saturday/Sunday are weekend; so is any listed holiday. Unknown years just
/// have no holiday matches and classify by day-of-week alone.
pub fn classify_day(date: NaiveDate, holidays: &HolidayCalendar) -> DayType {
    if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
        return DayType::Weekend;
    }
    if holidays.contains(date) {
        return DayType::Weekend;
    }
    DayType::Weekday
}
