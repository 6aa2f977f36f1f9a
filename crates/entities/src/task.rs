//! Task record entity definitions.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Completion state of a planned day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TaskStatus {
    /// Nothing done yet.
    #[default]
    #[serde(rename = "Not Started", alias = "NotStarted")]
    NotStarted,
    /// Work has begun.
    #[serde(rename = "In Progress", alias = "InProgress")]
    InProgress,
    /// Day is finished.
    Completed,
}

impl TaskStatus {
    /// Converts the status to the label used in storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "Not Started",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }

    /// Parses a status from either its storage label or its compact name.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Not Started" | "NotStarted" => Some(Self::NotStarted),
            "In Progress" | "InProgress" => Some(Self::InProgress),
            "Completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One day of the plan.
///
/// Records carry no identity of their own: a record is addressed by its
/// position in the sequence written by the most recent full replace.
/// Every field has a default so artifacts written before a field existed
/// still decode, and an explicit `null` decodes as the default too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TaskRecord {
    /// Week number within the plan.
    #[serde(deserialize_with = "null_as_default")]
    pub week: u32,
    /// Day number, unique across the plan.
    #[serde(deserialize_with = "null_as_default")]
    pub day: u32,
    /// Short topic line.
    #[serde(deserialize_with = "null_as_default")]
    pub topic: String,
    /// Free text describing what to do.
    #[serde(deserialize_with = "null_as_default")]
    pub activities: String,
    /// Number of practice problems planned.
    #[serde(deserialize_with = "null_as_default")]
    pub problems: u32,
    /// Current status.
    #[serde(deserialize_with = "null_as_default")]
    pub status: TaskStatus,
    /// Target date as `YYYY-MM-DD` text.
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
    /// Optional notes, empty when unset.
    #[serde(deserialize_with = "null_as_default")]
    pub remarks: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl TaskRecord {
    /// Creates a new record with no date, no remarks and the default status.
    pub fn new(
        week: u32,
        day: u32,
        topic: impl Into<String>,
        activities: impl Into<String>,
        problems: u32,
    ) -> Self {
        Self {
            week,
            day,
            topic: topic.into(),
            activities: activities.into(),
            problems,
            ..Self::default()
        }
    }

    /// Sets the target date.
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    /// Sets the status.
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the remarks.
    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = remarks.into();
        self
    }
}
