//! Due value construction from the DUE_DATE and DUE_TIME columns.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;
use thiserror::Error;

/// Errors raised for malformed due columns
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DueError {
    #[error("Invalid DUE_DATE '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("Invalid DUE_TIME '{0}' (expected HH:MM, 24h)")]
    InvalidTime(String),

    #[error("{date} {time} does not exist in {zone}")]
    NonexistentLocalTime { date: String, time: String, zone: Tz },
}

/// When a task is due
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Due {
    /// All-day due value, no time of day
    Date(NaiveDate),

    /// Wall-clock time in the configured zone
    DateTime(DateTime<Tz>),
}

impl Due {
    /// `YYYY-MM-DD` for all-day values
    pub fn due_date(&self) -> Option<String> {
        match self {
            Due::Date(date) => Some(date.format("%Y-%m-%d").to_string()),
            Due::DateTime(_) => None,
        }
    }

    /// RFC 3339 with offset for timed values
    pub fn due_datetime(&self) -> Option<String> {
        match self {
            Due::Date(_) => None,
            Due::DateTime(instant) => Some(instant.to_rfc3339()),
        }
    }
}

/// Build a due value from optional date and time cells.
///
/// Blank cells count as absent. A time without a date is ignored, since
/// there is nothing to anchor it to.
pub fn build_due(date: Option<&str>, time: Option<&str>, zone: Tz) -> Result<Option<Due>, DueError> {
    let date_str = match date.map(str::trim).filter(|s| !s.is_empty()) {
        Some(d) => d,
        None => return Ok(None),
    };

    let day = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|_| DueError::InvalidDate(date_str.to_string()))?;

    let time_str = match time.map(str::trim).filter(|s| !s.is_empty()) {
        Some(t) => t,
        None => return Ok(Some(Due::Date(day))),
    };

    let clock = NaiveTime::parse_from_str(time_str, "%H:%M")
        .map_err(|_| DueError::InvalidTime(time_str.to_string()))?;

    // Ambiguous local times (DST fall-back) resolve to the earlier instant
    let instant = zone
        .from_local_datetime(&day.and_time(clock))
        .earliest()
        .ok_or_else(|| DueError::NonexistentLocalTime {
            date: date_str.to_string(),
            time: time_str.to_string(),
            zone,
        })?;

    Ok(Some(Due::DateTime(instant)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use chrono_tz::Australia::Sydney;

    #[test]
    fn test_no_date_means_no_due() {
        assert_eq!(build_due(None, None, Sydney), Ok(None));
        assert_eq!(build_due(Some("  "), Some("10:00"), Sydney), Ok(None));
    }

    #[test]
    fn test_date_only_is_all_day() {
        let due = build_due(Some("2024-03-01"), None, Sydney).unwrap().unwrap();

        assert_eq!(due, Due::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
        assert_eq!(due.due_date(), Some("2024-03-01".to_string()));
        assert_eq!(due.due_datetime(), None);

        let blank_time = build_due(Some("2024-03-01"), Some(""), Sydney).unwrap();
        assert_eq!(blank_time, Some(due));
    }

    #[test]
    fn test_date_and_time_keep_wall_clock() {
        let due = build_due(Some("2024-03-01"), Some("09:30"), Sydney)
            .unwrap()
            .unwrap();

        let Due::DateTime(instant) = &due else {
            panic!("expected a timed due value");
        };
        assert_eq!(instant.hour(), 9);
        assert_eq!(instant.minute(), 30);
        // March 1st is daylight saving time in Sydney
        assert_eq!(due.due_datetime(), Some("2024-03-01T09:30:00+11:00".to_string()));
        assert_eq!(due.due_date(), None);
    }

    #[test]
    fn test_winter_offset() {
        let due = build_due(Some("2024-07-15"), Some("23:59"), Sydney)
            .unwrap()
            .unwrap();
        assert_eq!(due.due_datetime(), Some("2024-07-15T23:59:00+10:00".to_string()));
    }

    #[test]
    fn test_malformed_values_are_rejected() {
        assert_eq!(
            build_due(Some("01/03/2024"), None, Sydney),
            Err(DueError::InvalidDate("01/03/2024".to_string()))
        );
        assert_eq!(
            build_due(Some("2024-03-01"), Some("9.30pm"), Sydney),
            Err(DueError::InvalidTime("9.30pm".to_string()))
        );
        assert_eq!(
            build_due(Some("2024-02-30"), None, Sydney),
            Err(DueError::InvalidDate("2024-02-30".to_string()))
        );
    }

    #[test]
    fn test_skipped_hour_is_rejected() {
        // Clocks jump from 02:00 to 03:00 on 2024-10-06 in Sydney
        let result = build_due(Some("2024-10-06"), Some("02:30"), Sydney);
        assert!(matches!(result, Err(DueError::NonexistentLocalTime { .. })));
    }
}
