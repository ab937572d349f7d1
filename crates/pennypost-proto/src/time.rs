//! Server timestamps.
//!
//! The server emits either RFC 3339 timestamps or naive ISO-8601 values
//! without an offset, depending on the database backend. Naive values are
//! interpreted as UTC.

use std::fmt;

use chrono::{DateTime, Local, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A point in time reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Wrap a UTC instant.
    pub fn new(at: DateTime<Utc>) -> Self {
        Self(at)
    }

    /// Current time.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Parse RFC 3339, falling back to naive ISO-8601 interpreted as UTC.
    ///
    /// Returns `None` if neither format matches.
    pub fn parse(raw: &str) -> Option<Self> {
        if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
            return Some(Self(at.with_timezone(&Utc)));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| Self(naive.and_utc()))
    }

    /// The underlying UTC instant.
    pub fn as_utc(&self) -> DateTime<Utc> {
        self.0
    }

    /// Human-readable local time, e.g. `2024-05-01 12:00:00`.
    pub fn to_local_string(&self) -> String {
        self.0.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_rfc3339())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    }
}
