//! Task item record.
//!
//! The serialized shape is the persisted wire format:
//! `{"id": <ms>, "value": "...", "checked": false, "removed": false}`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Creation timestamp in milliseconds, doubling as the task identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub i64);

impl TaskId {
    pub fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        trimmed
            .parse::<i64>()
            .map(TaskId)
            .map_err(|_| Error::InvalidArgument(format!("invalid task id '{trimmed}'")))
    }
}

impl From<i64> for TaskId {
    fn from(value: i64) -> Self {
        TaskId(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskItem {
    pub id: TaskId,
    pub value: String,
    pub checked: bool,
    pub removed: bool,
}

impl TaskItem {
    /// A fresh, unchecked and untrashed item.
    pub fn new(id: TaskId, value: impl Into<String>) -> Self {
        Self {
            id,
            value: value.into(),
            checked: false,
            removed: false,
        }
    }

    /// Short state word used by the presentation layer.
    pub fn state(&self) -> &'static str {
        match (self.checked, self.removed) {
            (_, true) => "trashed",
            (true, false) => "done",
            (false, false) => "open",
        }
    }
}
