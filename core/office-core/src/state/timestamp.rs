//! `updated_at` parsing and age computation.
//!
//! Writers are not consistent about time zones: some emit RFC 3339 with an
//! offset, others emit naive local wall-clock time. The two are aged
//! differently and must stay that way:
//!
//! - **Zoned**: compared in UTC.
//! - **Naive**: compared against the local wall clock, with no conversion.
//!
//! Normalising naive values to UTC would shift their decay timing by the local
//! offset.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeDelta, Utc};

const ZONED_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordTimestamp {
    Zoned(DateTime<FixedOffset>),
    Naive(NaiveDateTime),
}

impl RecordTimestamp {
    /// Parses ISO 8601 / RFC 3339 text. Returns `None` for anything else.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(RecordTimestamp::Zoned(dt));
        }

        // RFC 3339 parsing above already covers "Z"; the formats below use
        // explicit offsets only.
        let normalized = match raw.strip_suffix('Z') {
            Some(stripped) => format!("{}+00:00", stripped),
            None => raw.to_string(),
        };

        for format in ZONED_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(&normalized, format) {
                return Some(RecordTimestamp::Zoned(dt));
            }
        }

        for format in NAIVE_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
                return Some(RecordTimestamp::Naive(dt));
            }
        }

        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(RecordTimestamp::Naive)
    }

    /// Elapsed time between this timestamp and `now`, in the timestamp's own
    /// clock domain. Negative when the timestamp is in the future.
    pub fn age(&self, now: DateTime<Local>) -> TimeDelta {
        match self {
            RecordTimestamp::Zoned(dt) => {
                now.with_timezone(&Utc)
                    .signed_duration_since(dt.with_timezone(&Utc))
            }
            RecordTimestamp::Naive(dt) => now.naive_local().signed_duration_since(*dt),
        }
    }
}
