//! A single to-do item and its on-disk record shape

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, TaskError};

pub const DEFAULT_PRIORITY: &str = "low";
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// One entry in the task list.
///
/// All four fields are required in the stored record; `due_date` may be
/// `null` but the key itself must be present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub description: String,
    pub priority: String,
    #[serde(deserialize_with = "Option::deserialize")]
    pub due_date: Option<String>,
    pub completed: bool,
}

impl Task {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            priority: DEFAULT_PRIORITY.to_string(),
            due_date: None,
            completed: false,
        }
    }

    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = priority.into();
        self
    }

    pub fn with_due_date(mut self, due_date: Option<String>) -> Self {
        self.due_date = due_date;
        self
    }

    /// Flags the task as done. Calling it again has no further effect.
    pub fn mark_completed(&mut self) {
        self.completed = true;
    }

    /// The stored form: an object with exactly `description`, `priority`,
    /// `due_date` and `completed`.
    pub fn to_record(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(TaskError::Encode)
    }

    pub fn from_record(record: Value) -> Result<Self> {
        serde_json::from_value(record).map_err(TaskError::malformed)
    }

    pub fn status_label(&self) -> &'static str {
        if self.completed {
            "Done"
        } else {
            "Pending"
        }
    }

    pub fn due_label(&self) -> &str {
        self.due_date
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or("No due date")
    }

    /// The due date as a calendar date, if it is present and well formed.
    pub fn due_date_parsed(&self) -> Option<NaiveDate> {
        let raw = self.due_date.as_deref()?;
        NaiveDate::parse_from_str(raw.trim(), DUE_DATE_FORMAT).ok()
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date_parsed().is_some_and(|due| due < today)
    }
}
