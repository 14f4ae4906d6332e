//! Entities exchanged with the project service
//!
//! The service is authoritative for all of these; the client only holds
//! read-only snapshots and sends writable payloads back.

pub mod checklist;
pub mod post;
pub mod project;
pub mod user;

pub use checklist::{
    ChecklistItem, ChecklistItemData, ChecklistItemPatch, ItemStatus, NewChecklistItem, Priority,
};
pub use post::{
    Answer, AnswerData, AnswerInput, Comment, CommentData, CommentInput, Post, PostData, PostInput, PostType,
};
pub use project::{Project, ProjectData, ProjectInput, ProjectStatus};
pub use user::{Credentials, User, UserData};

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::ops::Deref;

/// Decoded entity that remembers the exact JSON it was decoded from
///
/// Fields are read through `Deref`; serializing writes the original JSON
/// back, so keys the client does not model and explicit `null`s survive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot<T> {
    data: T,
    raw: Value,
}

impl<T> Snapshot<T> {
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn into_inner(self) -> T {
        self.data
    }
}

impl<T> Deref for Snapshot<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.data
    }
}

impl<T: Serialize> From<T> for Snapshot<T> {
    fn from(data: T) -> Self {
        let raw = serde_json::to_value(&data).unwrap_or_default();
        Self { data, raw }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Snapshot<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        let data = T::deserialize(&raw).map_err(D::Error::custom)?;
        Ok(Self { data, raw })
    }
}

impl<T> Serialize for Snapshot<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

/// Entity identifier as sent by the service
///
/// Kept in whichever JSON form it arrived in so that responses round-trip
/// unmodified; rendered through `Display` for path segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Number(i64),
    Text(String),
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Number(n) => write!(f, "{}", n),
            Id::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Id::Text(value.to_string())
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Id::Text(value)
    }
}

impl From<i64> for Id {
    fn from(value: i64) -> Self {
        Id::Number(value)
    }
}

impl std::str::FromStr for Id {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Id::from(s))
    }
}

impl Id {
    /// Compare ignoring representation, so `7` matches `"7"`
    pub fn matches(&self, other: &Id) -> bool {
        self.to_string() == other.to_string()
    }
}

/// Parse a calendar date as sent by the service: `YYYY-MM-DD` or a full
/// RFC 3339 timestamp
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_timestamp(raw).map(|ts| ts.date_naive()))
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

/// Short date for display, falling back to the raw text
pub fn display_date(raw: &str) -> String {
    parse_date(raw)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn id_keeps_wire_form() {
        let numeric: Id = serde_json::from_value(json!(42)).unwrap();
        let text: Id = serde_json::from_value(json!("p1")).unwrap();

        assert_eq!(numeric, Id::Number(42));
        assert_eq!(text, Id::Text("p1".to_string()));
        assert_eq!(serde_json::to_value(&numeric).unwrap(), json!(42));
        assert_eq!(numeric.to_string(), "42");
        assert!(numeric.matches(&Id::from("42")));
        assert!(!text.matches(&Id::from("p2")));
    }

    #[test]
    fn snapshot_writes_back_what_it_read() {
        let body = json!({
            "id": "p1",
            "name": "Launch",
            "description": null,
            "owner": {"id": "u1"},
            "progress": 40
        });
        let project: Project = serde_json::from_value(body.clone()).unwrap();

        assert_eq!(project.name, "Launch");
        assert_eq!(project.description, None);
        assert_eq!(serde_json::to_value(&project).unwrap(), body);
        assert_eq!(project.raw()["progress"], json!(40));
    }

    #[test]
    fn snapshot_from_fields_serializes_them() {
        let user = User::from(UserData {
            id: Id::from("u1"),
            name: "Alice".to_string(),
        });
        assert_eq!(serde_json::to_value(&user).unwrap(), json!({"id": "u1", "name": "Alice"}));
    }

    #[test]
    fn parses_dates_and_timestamps() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(parse_date("2024-03-01"), Some(expected));
        assert_eq!(parse_date("2024-03-01T09:30:00Z"), Some(expected));
        assert_eq!(parse_date("soon"), None);
        assert_eq!(display_date("2024-03-01T09:30:00+00:00"), "2024-03-01");
        assert_eq!(display_date("soon"), "soon");
    }
}
