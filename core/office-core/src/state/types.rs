//! Serialized state types.
//!
//! The on-disk format is a flat JSON object with no version field. Keys this
//! crate does not know about are carried in [`StateRecord::extra`] and written
//! back untouched.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, SecondsFormat};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Decay window used when a record has no `ttl_seconds`.
pub const DEFAULT_TTL_SECS: i64 = 25;

/// Detail shown for the bootstrap/fallback record.
pub const DEFAULT_IDLE_DETAIL: &str = "等待任务中...";

/// Detail shown after a stale working state was reset.
pub const AUTO_IDLE_DETAIL: &str = "待命中（自动回到休息区）";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityState {
    Idle,
    Writing,
    Researching,
    Executing,
    Syncing,
    Error,
}

impl ActivityState {
    /// Valid state names in the order they are presented to users.
    pub const ALL: [ActivityState; 6] = [
        ActivityState::Idle,
        ActivityState::Writing,
        ActivityState::Researching,
        ActivityState::Executing,
        ActivityState::Syncing,
        ActivityState::Error,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ActivityState::Idle => "idle",
            ActivityState::Writing => "writing",
            ActivityState::Researching => "researching",
            ActivityState::Executing => "executing",
            ActivityState::Syncing => "syncing",
            ActivityState::Error => "error",
        }
    }

    /// Working states are the only ones subject to auto-idle.
    pub fn is_working(self) -> bool {
        matches!(
            self,
            ActivityState::Writing | ActivityState::Researching | ActivityState::Executing
        )
    }

    /// Comma-separated list of valid names, for usage messages.
    pub fn options() -> String {
        Self::ALL
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for ActivityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid state: {0}")]
pub struct InvalidState(pub String);

impl FromStr for ActivityState {
    type Err = InvalidState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActivityState::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| InvalidState(s.to_string()))
    }
}

impl From<ActivityState> for String {
    fn from(state: ActivityState) -> Self {
        state.as_str().to_string()
    }
}

/// Formats a write time as RFC 3339 local time with offset and microseconds.
pub fn format_timestamp(now: DateTime<Local>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// The single persisted activity record.
///
/// `state` stays a plain string: writers may store names outside
/// [`ActivityState`] and readers must pass them through unchanged.
///
/// Known fields are read leniently. Any JSON object loads; a field of an
/// unexpected type is coerced (numbers as text, `50.0` as `50`, `"60"` as
/// `60`) or falls back to its default, so one odd field never costs the rest
/// of the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateRecord {
    #[serde(default = "default_state", deserialize_with = "lenient::state")]
    pub state: String,
    #[serde(default, deserialize_with = "lenient::detail")]
    pub detail: String,
    #[serde(default, deserialize_with = "lenient::progress")]
    pub progress: i64,
    /// Kept verbatim; may be zoned or naive. See [`RecordTimestamp`](super::RecordTimestamp).
    /// A non-string value is kept as its JSON text, which never parses as a time.
    #[serde(
        default,
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::integer",
        skip_serializing_if = "Option::is_none"
    )]
    pub ttl_seconds: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_state() -> String {
    ActivityState::Idle.into()
}

mod lenient {
    use super::*;

    fn as_text(value: Value) -> Option<String> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        }
    }

    fn as_integer(value: &Value) -> Option<i64> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn state<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(as_text(Value::deserialize(deserializer)?).unwrap_or_else(default_state))
    }

    pub fn detail<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(as_text(Value::deserialize(deserializer)?).unwrap_or_default())
    }

    pub fn progress<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        Ok(as_integer(&Value::deserialize(deserializer)?).unwrap_or(0))
    }

    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        Ok(as_text(Value::deserialize(deserializer)?))
    }

    pub fn integer<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<i64>, D::Error> {
        Ok(as_integer(&Value::deserialize(deserializer)?))
    }
}

impl StateRecord {
    /// The record used when nothing valid is on disk.
    pub fn default_idle(now: DateTime<Local>) -> Self {
        StateRecord {
            state: ActivityState::Idle.into(),
            detail: DEFAULT_IDLE_DETAIL.to_string(),
            progress: 0,
            updated_at: Some(format_timestamp(now)),
            ttl_seconds: None,
            extra: Map::new(),
        }
    }

    /// Parsed state name, `None` for names outside the fixed set.
    pub fn activity(&self) -> Option<ActivityState> {
        self.state.parse().ok()
    }

    pub fn is_working(&self) -> bool {
        self.activity().is_some_and(ActivityState::is_working)
    }

    pub fn ttl_seconds(&self) -> i64 {
        self.ttl_seconds.unwrap_or(DEFAULT_TTL_SECS)
    }

    /// Resets this record to idle in place. `ttl_seconds` and extra keys survive.
    pub fn mark_auto_idle(&mut self, now: DateTime<Local>) {
        self.state = ActivityState::Idle.into();
        self.detail = AUTO_IDLE_DETAIL.to_string();
        self.progress = 0;
        self.updated_at = Some(format_timestamp(now));
    }

    /// Applies a caller-driven change: state, detail and `updated_at` always,
    /// progress and TTL only when supplied.
    pub fn apply(&mut self, update: StateUpdate, now: DateTime<Local>) {
        self.state = update.state;
        self.detail = update.detail;
        self.updated_at = Some(format_timestamp(now));
        if let Some(progress) = update.progress {
            self.progress = progress;
        }
        if let Some(ttl) = update.ttl_seconds {
            self.ttl_seconds = Some(ttl);
        }
    }
}

/// A requested state change, as passed to [`StateStore::write_state`](super::StateStore::write_state).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateUpdate {
    pub state: String,
    pub detail: String,
    pub progress: Option<i64>,
    pub ttl_seconds: Option<i64>,
}

impl StateUpdate {
    pub fn new(state: impl Into<String>, detail: impl Into<String>) -> Self {
        StateUpdate {
            state: state.into(),
            detail: detail.into(),
            progress: None,
            ttl_seconds: None,
        }
    }

    pub fn with_progress(mut self, progress: Option<i64>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_ttl_seconds(mut self, ttl_seconds: Option<i64>) -> Self {
        self.ttl_seconds = ttl_seconds;
        self
    }
}
