//! Homework records and review statuses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::AppError;

/// A single homework entry from the `homeworks` list.
///
/// Only `homework_name` and `status` drive notifications. They stay optional
/// here so that a record missing either one is reported by
/// [`parse_status`](crate::pipeline::parse_status) with a precise error.
/// Text fields accept any JSON value, so a mistyped field never rejects the
/// whole response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeworkRecord {
    #[serde(default)]
    pub id: Option<Value>,

    #[serde(default, deserialize_with = "text_or_json")]
    pub homework_name: Option<String>,

    #[serde(default, deserialize_with = "text_or_json")]
    pub status: Option<String>,

    #[serde(default, deserialize_with = "text_or_json")]
    pub lesson_name: Option<String>,

    #[serde(default, deserialize_with = "text_or_json")]
    pub reviewer_comment: Option<String>,

    /// ISO 8601 timestamp of the last status change
    #[serde(default, deserialize_with = "text_or_json")]
    pub date_updated: Option<String>,
}

/// Strings pass through, `null` is absent, anything else keeps its JSON text.
fn text_or_json<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

impl HomeworkRecord {
    pub fn new(homework_name: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            homework_name: Some(homework_name.into()),
            status: Some(status.into()),
            ..Self::default()
        }
    }
}

/// Review status of a homework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    pub const ALL: [HomeworkStatus; 3] = [Self::Approved, Self::Reviewing, Self::Rejected];

    /// Wire value used by the API.
    pub fn as_str(&self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "approved",
            HomeworkStatus::Reviewing => "reviewing",
            HomeworkStatus::Rejected => "rejected",
        }
    }

    /// Human-readable verdict sent to the chat.
    pub fn verdict(&self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            HomeworkStatus::Reviewing => "Работа взята на проверку ревьюером.",
            HomeworkStatus::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

impl FromStr for HomeworkStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| AppError::homework_status(s))
    }
}

impl fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_wire_value() {
        for status in HomeworkStatus::ALL {
            assert_eq!(status.as_str().parse::<HomeworkStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_status_is_case_sensitive() {
        assert!("Approved".parse::<HomeworkStatus>().is_err());
    }

    #[test]
    fn test_record_ignores_unknown_fields() {
        let record: HomeworkRecord = serde_json::from_str(
            r#"{"id": 7, "homework_name": "proj1", "status": "rejected", "extra": true}"#,
        )
        .unwrap();
        assert_eq!(record.id, Some(Value::from(7)));
        assert_eq!(record.homework_name.as_deref(), Some("proj1"));
        assert_eq!(record.status.as_deref(), Some("rejected"));
    }

    #[test]
    fn test_record_tolerates_mistyped_fields() {
        let record: HomeworkRecord = serde_json::from_str(
            r#"{"id": "abc", "homework_name": "old", "status": 5, "lesson_name": ["x"], "date_updated": null}"#,
        )
        .unwrap();
        assert_eq!(record.id, Some(Value::from("abc")));
        assert_eq!(record.homework_name.as_deref(), Some("old"));
        assert_eq!(record.status.as_deref(), Some("5"));
        assert_eq!(record.lesson_name.as_deref(), Some("[\"x\"]"));
        assert!(record.date_updated.is_none());
    }

    #[test]
    fn test_record_tolerates_missing_fields() {
        let record: HomeworkRecord = serde_json::from_str("{}").unwrap();
        assert!(record.homework_name.is_none());
        assert!(record.status.is_none());
    }
}
