//! Business calendar — date-only reasoning in the business timezone
//!
//! Offers carry Unix millis for `createdAt`/`updatedAt` and a plain date for
//! `venceEl`. Every "today", date-range and days-remaining question is
//! answered against a [`BusinessCalendar`] so the engine never reads the
//! clock on its own.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;

use shared::{AppError, AppResult};

/// Timezone used when the configured one cannot be parsed
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Europe::Madrid;

/// How far ahead an expiration date may be set
pub const MAX_EXPIRATION_DAYS: i64 = 365;

/// Parse a date string (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::invalid_format(format!("Invalid date format: {}", date)))
}

/// Parse an IANA timezone name, falling back to [`DEFAULT_TIMEZONE`]
pub fn parse_timezone(name: &str) -> Tz {
    name.parse::<Tz>().unwrap_or_else(|e| {
        tracing::warn!(
            "Failed to parse business timezone '{}': {}, falling back to {}",
            name,
            e,
            DEFAULT_TIMEZONE
        );
        DEFAULT_TIMEZONE
    })
}

/// Today's date plus the timezone it was computed in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessCalendar {
    tz: Tz,
    today: NaiveDate,
}

impl BusinessCalendar {
    pub fn new(tz: Tz, today: NaiveDate) -> Self {
        Self { tz, today }
    }

    /// Calendar for the current instant
    pub fn now(tz: Tz) -> Self {
        let today = Utc::now().with_timezone(&tz).date_naive();
        Self { tz, today }
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Latest allowed expiration date
    pub fn max_expiration(&self) -> NaiveDate {
        self.today + Duration::days(MAX_EXPIRATION_DAYS)
    }

    /// Business date of a Unix-millis timestamp
    pub fn date_of(&self, millis: i64) -> NaiveDate {
        DateTime::from_timestamp_millis(millis)
            .unwrap_or_default()
            .with_timezone(&self.tz)
            .date_naive()
    }

    /// Whole days from today to `date`; negative once it has passed
    pub fn days_until(&self, date: NaiveDate) -> i64 {
        (date - self.today).num_days()
    }

    /// Parse date input from a form: `YYYY-MM-DD`, or an RFC 3339 timestamp
    /// whose business date is used.
    pub fn parse_input_date(&self, raw: &str) -> AppResult<NaiveDate> {
        let raw = raw.trim();
        if raw.contains('T') {
            return DateTime::parse_from_rfc3339(raw)
                .map(|dt| dt.with_timezone(&self.tz).date_naive())
                .map_err(|_| AppError::invalid_format(format!("Invalid date format: {}", raw)));
        }
        parse_date(raw)
    }

    /// Start of `date` (00:00:00 local) as Unix millis
    ///
    /// DST gap fallback: if local midnight does not exist, UTC midnight is used.
    pub fn day_start_millis(&self, date: NaiveDate) -> i64 {
        let naive = date.and_time(chrono::NaiveTime::MIN);
        naive
            .and_local_timezone(self.tz)
            .earliest()
            .map(|dt| dt.timestamp_millis())
            .unwrap_or_else(|| naive.and_utc().timestamp_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2026-03-09").unwrap(), date(2026, 3, 9));
        assert!(parse_date("09/03/2026").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn test_parse_timezone_fallback() {
        assert_eq!(parse_timezone("America/Mexico_City"), chrono_tz::America::Mexico_City);
        assert_eq!(parse_timezone("Mars/Olympus"), DEFAULT_TIMEZONE);
    }

    #[test]
    fn test_days_until() {
        let cal = BusinessCalendar::new(DEFAULT_TIMEZONE, date(2026, 10, 19));
        assert_eq!(cal.days_until(date(2026, 10, 19)), 0);
        assert_eq!(cal.days_until(date(2026, 10, 26)), 7);
        assert_eq!(cal.days_until(date(2026, 10, 18)), -1);
        assert_eq!(cal.max_expiration(), date(2027, 10, 19));
    }

    #[test]
    fn test_date_of_uses_business_timezone() {
        let cal = BusinessCalendar::new(DEFAULT_TIMEZONE, date(2026, 10, 19));
        // 2026-10-18T23:30:00Z is already the 19th in Madrid (UTC+2)
        let millis = DateTime::parse_from_rfc3339("2026-10-18T23:30:00Z")
            .unwrap()
            .timestamp_millis();
        assert_eq!(cal.date_of(millis), date(2026, 10, 19));
    }

    #[test]
    fn test_day_start_roundtrip() {
        let cal = BusinessCalendar::new(DEFAULT_TIMEZONE, date(2026, 10, 19));
        let start = cal.day_start_millis(date(2026, 7, 1));
        assert_eq!(cal.date_of(start), date(2026, 7, 1));
        assert_eq!(cal.date_of(start - 1), date(2026, 6, 30));
    }

    #[test]
    fn test_parse_input_date() {
        let cal = BusinessCalendar::new(DEFAULT_TIMEZONE, date(2026, 10, 19));
        assert_eq!(cal.parse_input_date(" 2026-11-02 ").unwrap(), date(2026, 11, 2));
        assert_eq!(
            cal.parse_input_date("2026-11-01T23:30:00Z").unwrap(),
            date(2026, 11, 2)
        );
        assert!(cal.parse_input_date("mañana").is_err());
    }
}
