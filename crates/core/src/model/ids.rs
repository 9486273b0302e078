use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for a tutoring task (question)
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    /// Creates a new `TaskId`
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying u64 value
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Classifier-assigned cluster label for a completed question
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterId(i64);

impl ClusterId {
    /// Creates a new `ClusterId`
    #[must_use]
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the underlying i64 value
    #[must_use]
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Debug for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TaskId({})", self.0)
    }
}

impl fmt::Debug for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClusterId({})", self.0)
    }
}

// ─── Display Implementations ───────────────────────────────────────────────────

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─── FromStr Implementations ───────────────────────────────────────────────────

/// Error type for parsing ID from string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: String,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {} from string", self.kind)
    }
}

impl std::error::Error for ParseIdError {}

impl FromStr for TaskId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(TaskId::new).map_err(|_| ParseIdError {
            kind: "TaskId".to_string(),
        })
    }
}

impl FromStr for ClusterId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>()
            .map(ClusterId::new)
            .map_err(|_| ParseIdError {
                kind: "ClusterId".to_string(),
            })
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_id_display() {
        let id = TaskId::new(42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn test_task_id_from_str() {
        let id: TaskId = "123".parse().unwrap();
        assert_eq!(id, TaskId::new(123));
    }

    #[test]
    fn test_task_id_from_str_invalid() {
        let result = "not-a-number".parse::<TaskId>();
        assert!(result.is_err());
    }

    #[test]
    fn test_cluster_id_display() {
        let id = ClusterId::new(3);
        assert_eq!(id.to_string(), "3");
    }

    #[test]
    fn test_cluster_id_from_str() {
        let id: ClusterId = "4".parse().unwrap();
        assert_eq!(id, ClusterId::new(4));
    }

    #[test]
    fn test_id_roundtrip() {
        let original = TaskId::new(42);
        let serialized = original.to_string();
        let deserialized: TaskId = serialized.parse().unwrap();
        assert_eq!(original, deserialized);
    }
}
