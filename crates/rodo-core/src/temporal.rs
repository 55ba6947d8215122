//! # Timestamps
//!
//! `Timestamp` is the UTC-only, seconds-precision instant used for
//! `created_at` / `updated_at` on assessments. Sub-second components are
//! discarded at construction so that "newest first" listings and
//! serialized documents are stable across round-trips.
//!
//! Calendar-level fields (remedial action due dates, history entry dates)
//! use `chrono::NaiveDate` directly; `Timestamp::date()` bridges the two.

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RodoError;

/// A UTC timestamp truncated to whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Current UTC time, truncated.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// From a `DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Parse an RFC 3339 string. Any offset is accepted and normalized to UTC.
    pub fn parse(s: &str) -> Result<Self, RodoError> {
        let dt = DateTime::parse_from_rfc3339(s).map_err(|_| RodoError::InvalidValue {
            field: "timestamp",
            value: s.to_string(),
        })?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// The UTC calendar date of this instant.
    pub fn date(&self) -> NaiveDate {
        self.0.date_naive()
    }

    /// Render as `YYYY-MM-DDTHH:MM:SSZ`.
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn now_has_no_subseconds() {
        assert_eq!(Timestamp::now().as_datetime().nanosecond(), 0);
    }

    #[test]
    fn from_utc_truncates() {
        let dt = Utc
            .with_ymd_and_hms(2025, 4, 15, 9, 30, 45)
            .unwrap()
            .with_nanosecond(987_000_000)
            .unwrap();
        let ts = Timestamp::from_utc(dt);
        assert_eq!(ts.to_iso8601(), "2025-04-15T09:30:45Z");
    }

    #[test]
    fn parse_normalizes_offsets() {
        let ts = Timestamp::parse("2025-04-15T11:00:00+02:00").unwrap();
        assert_eq!(ts.to_iso8601(), "2025-04-15T09:00:00Z");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(Timestamp::parse("2025-04-15").is_err());
        assert!(Timestamp::parse("").is_err());
    }

    #[test]
    fn date_is_utc_calendar_day() {
        let ts = Timestamp::parse("2025-04-15T23:30:00-02:00").unwrap();
        assert_eq!(ts.date(), NaiveDate::from_ymd_opt(2025, 4, 16).unwrap());
    }

    #[test]
    fn ordering_follows_time() {
        let earlier = Timestamp::parse("2025-04-15T12:00:00Z").unwrap();
        let later = Timestamp::parse("2025-04-15T12:00:01Z").unwrap();
        assert!(earlier < later);
    }

    #[test]
    fn serde_roundtrip() {
        let ts = Timestamp::parse("2025-04-17T08:00:00Z").unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(serde_json::from_str::<Timestamp>(&json).unwrap(), ts);
    }
}
