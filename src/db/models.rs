use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One to-do item.
///
/// A task is an immutable value: edits never mutate a stored instance, they
/// build a full replacement through [`Task::with_completed`] or
/// [`Task::with_details`] and submit that to the store under the same id.
/// Structural equality (`PartialEq`) is what makes list diffing in the
/// presentation layer reliable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Task {
    /// 0 until the store assigns a rowid on first insert
    pub id: i64,
    pub name: String,
    pub is_important: bool,
    pub is_completed: bool,
    /// Milliseconds since epoch, set once at construction
    pub created_at: i64,
}

impl Task {
    /// Build a not-yet-persisted task stamped with the current time.
    pub fn new(name: impl Into<String>, is_important: bool) -> Self {
        Self {
            id: 0,
            name: name.into(),
            is_important,
            is_completed: false,
            created_at: Utc::now().timestamp_millis(),
        }
    }

    /// Replacement record with a flipped completion flag.
    pub fn with_completed(&self, is_completed: bool) -> Self {
        Self {
            is_completed,
            ..self.clone()
        }
    }

    /// Replacement record with edited name and importance; id, creation time
    /// and completion state carry over.
    pub fn with_details(&self, name: impl Into<String>, is_important: bool) -> Self {
        Self {
            name: name.into(),
            is_important,
            ..self.clone()
        }
    }

    /// Creation date rendered for display, e.g. "Aug 6, 2026".
    pub fn created_date_formatted(&self) -> String {
        DateTime::<Utc>::from_timestamp_millis(self.created_at)
            .map(|dt| dt.format("%b %-d, %Y").to_string())
            .unwrap_or_default()
    }
}
