//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Parses an RFC 3339 / ISO-8601 timestamp.
    pub fn parse(s: &str) -> Result<Self, chrono::ParseError> {
        Ok(Self(DateTime::parse_from_rfc3339(s)?.with_timezone(&Utc)))
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Formats as RFC 3339.
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339()
    }

    /// Checks if this timestamp is before another.
    pub fn is_before(&self, other: &Timestamp) -> bool {
        self.0 < other.0
    }

    /// Checks if this timestamp is after another.
    pub fn is_after(&self, other: &Timestamp) -> bool {
        self.0 > other.0
    }

    /// Creates a new timestamp by adding the specified number of days.
    pub fn plus_days(&self, days: i64) -> Self {
        Self(self.0 + Duration::days(days))
    }

    /// Creates a new timestamp by adding whole calendar months.
    ///
    /// Calendar months, not a 30-day approximation: Jan 31 + 1 month is
    /// Feb 28/29. Cooldown windows depend on this.
    pub fn plus_calendar_months(&self, months: u32) -> Self {
        Self(
            self.0
                .checked_add_months(Months::new(months))
                .unwrap_or(self.0),
        )
    }

    /// Decomposes the span from this timestamp to `end` into whole calendar
    /// months plus remaining days, floored at zero.
    ///
    /// Days are the remainder after whole months are subtracted, not a raw
    /// day count.
    pub fn calendar_span_until(&self, end: &Timestamp) -> (u32, u32) {
        if end.0 <= self.0 {
            return (0, 0);
        }
        let mut months: u32 = 0;
        let mut cursor = self.0;
        while let Some(next) = cursor.checked_add_months(Months::new(1)) {
            if next > end.0 {
                break;
            }
            cursor = next;
            months += 1;
        }
        let days = (end.0 - cursor).num_days().max(0) as u32;
        (months, days)
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse(s).unwrap()
    }

    #[test]
    fn timestamp_now_creates_current_time() {
        let before = Utc::now();
        let t = Timestamp::now();
        let after = Utc::now();

        assert!(t.as_datetime() >= &before);
        assert!(t.as_datetime() <= &after);
    }

    #[test]
    fn timestamp_parses_iso8601() {
        let t = ts("2024-01-15T10:30:00Z");
        assert_eq!(t.as_datetime().year(), 2024);
        assert_eq!(t.as_datetime().month(), 1);
        assert_eq!(t.as_datetime().day(), 15);
    }

    #[test]
    fn timestamp_ordering_works() {
        let t1 = ts("2024-01-01T00:00:00Z");
        let t2 = ts("2024-01-02T00:00:00Z");

        assert!(t1.is_before(&t2));
        assert!(t2.is_after(&t1));
        assert!(t1 < t2);
    }

    #[test]
    fn plus_calendar_months_handles_month_lengths() {
        let t = ts("2024-01-31T00:00:00Z").plus_calendar_months(1);
        // 2024 is a leap year
        assert_eq!(t.as_datetime().month(), 2);
        assert_eq!(t.as_datetime().day(), 29);
    }

    #[test]
    fn plus_calendar_months_three_months() {
        let t = ts("2024-01-01T00:00:00Z").plus_calendar_months(3);
        assert_eq!(t, ts("2024-04-01T00:00:00Z"));
    }

    #[test]
    fn calendar_span_until_whole_months_and_days() {
        let start = ts("2024-03-15T00:00:00Z");
        let end = ts("2024-04-01T00:00:00Z");
        assert_eq!(start.calendar_span_until(&end), (0, 17));
    }

    #[test]
    fn calendar_span_until_with_months_remainder() {
        let start = ts("2024-01-10T00:00:00Z");
        let end = ts("2024-04-01T00:00:00Z");
        // Jan 10 + 2 months = Mar 10; Mar 10 -> Apr 1 is 22 days
        assert_eq!(start.calendar_span_until(&end), (2, 22));
    }

    #[test]
    fn calendar_span_until_floors_at_zero() {
        let start = ts("2024-04-02T00:00:00Z");
        let end = ts("2024-04-01T00:00:00Z");
        assert_eq!(start.calendar_span_until(&end), (0, 0));
    }

    #[test]
    fn calendar_span_until_same_instant_is_zero() {
        let t = ts("2024-04-01T00:00:00Z");
        assert_eq!(t.calendar_span_until(&t), (0, 0));
    }

    #[test]
    fn timestamp_serializes_to_json() {
        let t = ts("2024-01-15T10:30:00Z");
        let json = serde_json::to_string(&t).unwrap();
        assert!(json.contains("2024-01-15"));
    }

    #[test]
    fn timestamp_deserializes_from_json() {
        let json = "\"2024-01-15T10:30:00Z\"";
        let t: Timestamp = serde_json::from_str(json).unwrap();
        assert_eq!(t.as_datetime().year(), 2024);
    }
}
