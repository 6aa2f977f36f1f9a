//! Sparse updates to a task record.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::{TaskRecord, TaskStatus};

/// Keys that belong to storage backends and are dropped from untyped input.
pub const RESERVED_KEYS: [&str; 2] = ["idx", "_id"];

/// Errors produced when building a patch from untyped input.
#[derive(Debug, Error)]
pub enum PatchError {
    /// Input was not a JSON object.
    #[error("Task update must be a JSON object")]
    NotAnObject,

    /// Input contained an unknown field or a value of the wrong type.
    #[error("Invalid task update: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// A semantic field of [`TaskRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskField {
    Week,
    Day,
    Topic,
    Activities,
    Problems,
    Status,
    Date,
    Remarks,
}

impl TaskField {
    /// Field name as it appears in every persisted shape.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Day => "day",
            Self::Topic => "topic",
            Self::Activities => "activities",
            Self::Problems => "problems",
            Self::Status => "status",
            Self::Date => "date",
            Self::Remarks => "remarks",
        }
    }
}

impl fmt::Display for TaskField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Storage-neutral value of a single patched field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Integer(i64),
    Text(String),
}

/// Any subset of the semantic fields of a [`TaskRecord`].
///
/// `Some` values are applied even when empty or zero; `None` leaves the
/// stored value untouched. A JSON `null` decodes as `None`, so a patch can
/// never write a null into storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activities: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problems: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

impl TaskPatch {
    /// Creates a patch that only sets the status.
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Builds a patch from an untyped JSON object.
    ///
    /// Storage-internal keys (`idx`, `_id`) are dropped, any other unknown key
    /// is rejected and `null` counts as absent.
    pub fn from_json(value: Value) -> Result<Self, PatchError> {
        let Value::Object(mut map) = value else {
            return Err(PatchError::NotAnObject);
        };
        for key in RESERVED_KEYS {
            map.remove(key);
        }
        Ok(serde_json::from_value(Value::Object(map))?)
    }

    /// Returns true when no field is present.
    pub fn is_empty(&self) -> bool {
        self.values().is_empty()
    }

    /// Present fields with their values, in declaration order.
    pub fn values(&self) -> Vec<(TaskField, FieldValue)> {
        let mut values = Vec::new();
        if let Some(week) = self.week {
            values.push((TaskField::Week, FieldValue::Integer(week.into())));
        }
        if let Some(day) = self.day {
            values.push((TaskField::Day, FieldValue::Integer(day.into())));
        }
        if let Some(topic) = &self.topic {
            values.push((TaskField::Topic, FieldValue::Text(topic.clone())));
        }
        if let Some(activities) = &self.activities {
            values.push((TaskField::Activities, FieldValue::Text(activities.clone())));
        }
        if let Some(problems) = self.problems {
            values.push((TaskField::Problems, FieldValue::Integer(problems.into())));
        }
        if let Some(status) = self.status {
            values.push((TaskField::Status, FieldValue::Text(status.as_str().to_string())));
        }
        if let Some(date) = &self.date {
            values.push((TaskField::Date, FieldValue::Text(date.clone())));
        }
        if let Some(remarks) = &self.remarks {
            values.push((TaskField::Remarks, FieldValue::Text(remarks.clone())));
        }
        values
    }

    /// Writes every present field into `record`.
    pub fn apply_to(&self, record: &mut TaskRecord) {
        if let Some(week) = self.week {
            record.week = week;
        }
        if let Some(day) = self.day {
            record.day = day;
        }
        if let Some(topic) = &self.topic {
            record.topic.clone_from(topic);
        }
        if let Some(activities) = &self.activities {
            record.activities.clone_from(activities);
        }
        if let Some(problems) = self.problems {
            record.problems = problems;
        }
        if let Some(status) = self.status {
            record.status = status;
        }
        if let Some(date) = &self.date {
            record.date.clone_from(date);
        }
        if let Some(remarks) = &self.remarks {
            record.remarks.clone_from(remarks);
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_from_json_drops_storage_keys() {
        let patch = TaskPatch::from_json(json!({
            "idx": 7,
            "_id": "65f0c0ffee",
            "status": "Completed",
        }))
        .unwrap();

        assert_eq!(patch, TaskPatch::status(TaskStatus::Completed));
    }

    #[test]
    fn test_from_json_rejects_unknown_fields() {
        let err = TaskPatch::from_json(json!({ "priority": "high" })).unwrap_err();
        assert!(matches!(err, PatchError::Invalid(_)));

        let err = TaskPatch::from_json(json!(["status"])).unwrap_err();
        assert!(matches!(err, PatchError::NotAnObject));
    }

    #[test]
    fn test_empty_values_are_present() {
        let patch = TaskPatch::from_json(json!({ "remarks": "", "problems": 0 })).unwrap();

        assert!(!patch.is_empty());
        assert_eq!(
            patch.values(),
            vec![
                (TaskField::Problems, FieldValue::Integer(0)),
                (TaskField::Remarks, FieldValue::Text(String::new())),
            ]
        );
    }

    #[test]
    fn test_null_counts_as_absent() {
        let patch = TaskPatch::from_json(json!({ "topic": null })).unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn test_apply_to_touches_only_present_fields() {
        let mut record = TaskRecord::new(1, 1, "Arrays", "Theory", 3).with_date("2025-01-01");
        let patch = TaskPatch {
            topic: Some("Strings".to_string()),
            remarks: Some("went well".to_string()),
            ..TaskPatch::default()
        };

        patch.apply_to(&mut record);

        assert_eq!(record.topic, "Strings");
        assert_eq!(record.remarks, "went well");
        assert_eq!(record.activities, "Theory");
        assert_eq!(record.problems, 3);
        assert_eq!(record.date, "2025-01-01");
        assert_eq!(record.status, TaskStatus::NotStarted);
    }
}
