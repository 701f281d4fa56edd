use chrono::{FixedOffset, NaiveDate, Utc};

const DEFAULT_UTC_OFFSET_HOURS: i32 = 8;

/// Wall-clock source for the same-day cutoff and past-date checks. Bound to a
/// platform-configured UTC offset instead of whatever timezone the server
/// happens to run in, and injectable so the engine can be tested against a
/// frozen "now".
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    offset: FixedOffset,
}

impl Clock {
    pub fn with_offset_hours(hours: i32) -> Self {
        let secs = hours.clamp(-23, 23) * 3600;
        let offset = FixedOffset::east_opt(secs)
            .unwrap_or_else(|| FixedOffset::east_opt(DEFAULT_UTC_OFFSET_HOURS * 3600).unwrap());
        Self { offset }
    }

    /// Read `RESORT_UTC_OFFSET_HOURS` or fall back to the platform default.
    pub fn from_env() -> Self {
        let hours = std::env::var("RESORT_UTC_OFFSET_HOURS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_UTC_OFFSET_HOURS);
        Self::with_offset_hours(hours)
    }

    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.offset).date_naive()
    }

    /// Hour of day (0-23) in the configured offset.
    pub fn current_hour(&self) -> u32 {
        use chrono::Timelike;
        Utc::now().with_timezone(&self.offset).hour()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::with_offset_hours(DEFAULT_UTC_OFFSET_HOURS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_offset_falls_back_to_default() {
        // 48h east is not a real offset; constructor must not panic
        let clock = Clock::with_offset_hours(48);
        let _ = clock.today();
    }

    #[test]
    fn test_neighbouring_offsets_disagree_by_at_most_a_day() {
        let manila = Clock::with_offset_hours(8);
        let denver = Clock::with_offset_hours(-7);
        let diff = (manila.today() - denver.today()).num_days();
        assert!((0..=1).contains(&diff));
    }
}
