//! Task data structure and its stored representation.
//!
//! A `Task` is a value: it is built once and never mutated. Editing a task
//! means building a new one and replacing it at its position in the store.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::fields::Priority;

/// Canonical text format of a deadline.
pub const DEADLINE_FORMAT: &str = "%Y-%m-%d";

/// A deadline-bound work item.
///
/// The entity performs no validation; the form adapter checks input before
/// a task is built, and stored records are accepted as they are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    title: String,
    deadline: String,
    priority: Priority,
    progress: i64,
    notes: String,
}

/// Flat serializable shape of a task, one element of the stored JSON array.
///
/// Missing keys and `null` values take the field's default, so one damaged
/// record does not make the whole collection unreadable.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StoredRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub deadline: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub priority: Priority,
    #[serde(default, deserialize_with = "null_as_default")]
    pub progress: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub notes: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Task {
    pub fn new(
        title: impl Into<String>,
        deadline: impl Into<String>,
        priority: Priority,
        progress: i64,
        notes: impl Into<String>,
    ) -> Self {
        Task {
            title: title.into(),
            deadline: deadline.into(),
            priority,
            progress,
            notes: notes.into(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Deadline text as supplied, normally `YYYY-MM-DD` or empty.
    pub fn deadline(&self) -> &str {
        &self.deadline
    }

    pub fn priority(&self) -> &Priority {
        &self.priority
    }

    /// Completion percentage.
    pub fn progress(&self) -> i64 {
        self.progress
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Parse the deadline, `None` if it is empty or not in canonical form.
    pub fn deadline_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.deadline, DEADLINE_FORMAT).ok()
    }

    /// Convert to the stored record shape.
    pub fn to_record(&self) -> StoredRecord {
        StoredRecord {
            title: self.title.clone(),
            deadline: self.deadline.clone(),
            priority: self.priority.clone(),
            progress: self.progress,
            notes: self.notes.clone(),
        }
    }

    /// Build a task from a stored record.
    pub fn from_record(record: StoredRecord) -> Self {
        Task {
            title: record.title,
            deadline: record.deadline,
            priority: record.priority,
            progress: record.progress,
            notes: record.notes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Task {
        Task::new("Write report", "2026-10-21", Priority::Medium, 40, "draft first")
    }

    #[test]
    fn test_accessors_return_constructor_values() {
        let t = sample();
        assert_eq!(t.title(), "Write report");
        assert_eq!(t.deadline(), "2026-10-21");
        assert_eq!(t.priority(), &Priority::Medium);
        assert_eq!(t.progress(), 40);
        assert_eq!(t.notes(), "draft first");
    }

    #[test]
    fn test_record_round_trip() {
        let tasks = vec![
            sample(),
            Task::new("x", "", Priority::Other("Someday".into()), 0, ""),
            Task::new("Edge", "2026-02-28", Priority::Low, 100, "multi\nline"),
        ];
        for t in tasks {
            assert_eq!(Task::from_record(t.to_record()), t);
        }
    }

    #[test]
    fn test_record_json_shape() {
        let json = serde_json::to_value(sample().to_record()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "title": "Write report",
                "deadline": "2026-10-21",
                "priority": "Medium",
                "progress": 40,
                "notes": "draft first"
            })
        );
    }

    #[test]
    fn test_record_missing_keys_default() {
        let record: StoredRecord = serde_json::from_str(r#"{"title":"Only title"}"#).unwrap();
        let t = Task::from_record(record);
        assert_eq!(t.title(), "Only title");
        assert_eq!(t.deadline(), "");
        assert_eq!(t.progress(), 0);
        assert_eq!(t.priority(), &Priority::High);
    }

    #[test]
    fn test_record_null_values_default() {
        let records: Vec<StoredRecord> = serde_json::from_str(
            r#"[
                {"title":"Bad progress","deadline":"2026-10-21","priority":"Low","progress":null,"notes":"x"},
                {"title":null,"deadline":null,"priority":null,"progress":55,"notes":null}
            ]"#,
        )
        .unwrap();
        let tasks: Vec<Task> = records.into_iter().map(Task::from_record).collect();
        assert_eq!(tasks[0], Task::new("Bad progress", "2026-10-21", Priority::Low, 0, "x"));
        assert_eq!(tasks[1], Task::new("", "", Priority::High, 55, ""));
    }

    #[test]
    fn test_deadline_date() {
        assert_eq!(sample().deadline_date(), NaiveDate::from_ymd_opt(2026, 10, 21));
        assert_eq!(Task::new("a", "", Priority::Low, 0, "").deadline_date(), None);
        assert_eq!(Task::new("a", "21/10/2026", Priority::Low, 0, "").deadline_date(), None);
    }
}
