use serde::{Deserialize, Serialize};

use crate::model::TaskId;

/// A single tutoring exercise.
///
/// Immutable once loaded from the question bank; identity is `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    id: TaskId,
    title: String,
    description: String,
    solution: String,
}

impl Question {
    #[must_use]
    pub fn new(
        id: TaskId,
        title: impl Into<String>,
        description: impl Into<String>,
        solution: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            solution: solution.into(),
        }
    }

    #[must_use]
    pub fn id(&self) -> TaskId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The reference solution used for the local equivalence check.
    #[must_use]
    pub fn solution(&self) -> &str {
        &self.solution
    }
}
