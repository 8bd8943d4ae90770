use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::store::{Row, StoreError};

const UNKNOWN_ACTOR: &str = "Unknown";

/// Activity row as returned to dashboards: the stored columns plus a
/// resolved `actorName`.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityRecord {
    #[serde(flatten)]
    pub row: Row,
    #[serde(rename = "actorName")]
    pub actor_name: String,
    #[serde(skip)]
    pub created_at: DateTime<Utc>,
}

impl ActivityRecord {
    pub fn from_row(mut row: Row) -> Result<Self, StoreError> {
        let created_at = timestamp(&row, "activity_events")?;
        let actor_name = match row.remove("actor_name") {
            Some(Value::String(name)) if !name.trim().is_empty() => name,
            _ => UNKNOWN_ACTOR.to_string(),
        };
        Ok(Self { row, actor_name, created_at })
    }
}

/// A prompt or favorite owned by the caller.
#[derive(Debug, Clone, Serialize)]
pub struct SavedItem {
    #[serde(flatten)]
    pub row: Row,
}

impl SavedItem {
    pub fn from_row(row: Row, collection: &'static str) -> Result<Self, StoreError> {
        match row.get("id") {
            Some(Value::String(_)) | Some(Value::Number(_)) => {}
            other => {
                return Err(StoreError::MalformedRow {
                    collection,
                    reason: format!("missing id: {:?}", other),
                })
            }
        }
        timestamp(&row, collection)?;
        Ok(Self { row })
    }
}

fn timestamp(row: &Row, collection: &'static str) -> Result<DateTime<Utc>, StoreError> {
    row.get("created_at")
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| StoreError::MalformedRow {
            collection,
            reason: "created_at is missing or not an RFC 3339 timestamp".to_string(),
        })
}
