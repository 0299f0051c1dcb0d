//! Time source for ids and timestamps.

use chrono::{DateTime, SecondsFormat, Utc};
use std::cell::Cell;

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time, truncated to whole milliseconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        truncate_millis(Utc::now())
    }
}

/// Drop sub-millisecond precision so persisted timestamps round-trip exactly.
pub fn truncate_millis(ts: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ts.timestamp_millis()).unwrap_or(ts)
}

/// Issues millisecond-timestamp ids that never repeat.
///
/// Ids follow the clock, but two requests within the same millisecond (or a
/// clock that steps backwards) get `last + 1` instead of a duplicate.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: Cell<u64>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self, now: DateTime<Utc>) -> u64 {
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        let id = millis.max(self.last.get().saturating_add(1));
        self.last.set(id);
        id
    }

    /// Make sure future ids sort after an id that already exists.
    pub fn observe(&self, existing: u64) {
        if existing > self.last.get() {
            self.last.set(existing);
        }
    }
}

/// Serde helpers writing timestamps as `2024-05-01T12:00:00.000Z`.
pub mod iso_millis {
    use super::*;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn format(ts: &DateTime<Utc>) -> String {
        ts.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }

    /// Same format for optional fields (`None` is skipped by the caller).
    pub mod option {
        use super::*;

        pub fn serialize<S: Serializer>(
            ts: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match ts {
                Some(ts) => serializer.serialize_some(&format(ts)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            let raw: Option<String> = Option::deserialize(deserializer)?;
            raw.map(|s| {
                DateTime::parse_from_rfc3339(&s)
                    .map(|ts| ts.with_timezone(&Utc))
                    .map_err(serde::de::Error::custom)
            })
            .transpose()
        }
    }
}
