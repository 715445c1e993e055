//! Auto-idle: the only implicit transition.
//!
//! ```text
//! {writing, researching, executing} ──(age > ttl)──▶ idle
//! ```
//!
//! Evaluated lazily by readers. Everything that is not clearly stale is left
//! alone: non-working states, unknown state names, and missing or unparsable
//! timestamps.

use chrono::{DateTime, Local, TimeDelta};

use super::timestamp::RecordTimestamp;
use super::types::StateRecord;

/// Outcome of checking one record against its TTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// State is not a working state.
    NotWorking,
    /// `updated_at` is missing or unparsable; fail open.
    UnknownAge,
    /// Within the TTL window.
    Fresh,
    /// Older than the TTL; should be reset to idle.
    Expired { age_secs: i64, ttl_secs: i64 },
}

pub fn evaluate(record: &StateRecord, now: DateTime<Local>) -> Verdict {
    if !record.is_working() {
        return Verdict::NotWorking;
    }

    let Some(updated_at) = record
        .updated_at
        .as_deref()
        .and_then(RecordTimestamp::parse)
    else {
        return Verdict::UnknownAge;
    };

    let ttl_secs = record.ttl_seconds();
    let age = updated_at.age(now);

    // A TTL too large for TimeDelta can never be exceeded.
    let Some(ttl) = TimeDelta::try_seconds(ttl_secs) else {
        return Verdict::Fresh;
    };

    if age > ttl {
        Verdict::Expired {
            age_secs: age.num_seconds(),
            ttl_secs,
        }
    } else {
        Verdict::Fresh
    }
}
