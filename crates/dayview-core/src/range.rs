//! Date range used to bound event and task listing.

use chrono::{DateTime, Duration, NaiveDate, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Range spanning `days` days starting now.
    pub fn next_days(days: i64) -> Self {
        let start = Utc::now();
        Self { start, end: start + Duration::days(days) }
    }

    /// Full UTC day for a single date.
    pub fn for_day(date: NaiveDate) -> Self {
        let start = date
            .and_hms_opt(0, 0, 0)
            .map(|t| t.and_utc())
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        Self { start, end: start + Duration::days(1) }
    }

    /// RFC3339 lower bound, as the APIs expect for `timeMin`/`dueMin`.
    pub fn time_min(&self) -> String {
        self.start.to_rfc3339()
    }

    /// RFC3339 upper bound, as the APIs expect for `timeMax`/`dueMax`.
    pub fn time_max(&self) -> String {
        self.end.to_rfc3339()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_bounds_are_rfc3339() {
        let start = DateTime::parse_from_rfc3339("2026-02-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let end = DateTime::parse_from_rfc3339("2026-02-28T23:59:59Z")
            .unwrap()
            .with_timezone(&Utc);
        let range = DateRange::new(start, end);
        assert!(range.time_min().starts_with("2026-02-01T00:00:00"));
        assert!(range.time_max().starts_with("2026-02-28T23:59:59"));
    }

    #[test]
    fn test_for_day_spans_one_day() {
        let range = DateRange::for_day(NaiveDate::from_ymd_opt(2026, 1, 30).unwrap());
        assert_eq!(range.end - range.start, Duration::days(1));
    }
}
