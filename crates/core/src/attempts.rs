use std::collections::HashMap;

use crate::model::TaskId;

/// Fixed ceiling on submissions per question.
pub const MAX_ATTEMPTS: u32 = 4;

/// Per-question attempt counter.
///
/// Counts only submissions that completed a round trip to the remote
/// evaluator; a submission that fails at the network layer consumes no
/// attempt. Counts never decrease.
#[derive(Debug, Clone, Default)]
pub struct AttemptTracker {
    counts: HashMap<TaskId, u32>,
}

impl AttemptTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero the counter for every question in the loaded set.
    #[must_use]
    pub fn zeroed(ids: impl IntoIterator<Item = TaskId>) -> Self {
        Self {
            counts: ids.into_iter().map(|id| (id, 0)).collect(),
        }
    }

    /// Current count for a question, 0 if unseen.
    #[must_use]
    pub fn count(&self, id: TaskId) -> u32 {
        self.counts.get(&id).copied().unwrap_or(0)
    }

    /// Raise the stored count by exactly one.
    pub fn increment(&mut self, id: TaskId) {
        *self.counts.entry(id).or_insert(0) += 1;
    }

    /// True once the question has consumed every allowed attempt.
    #[must_use]
    pub fn exhausted(&self, id: TaskId) -> bool {
        self.count(id) >= MAX_ATTEMPTS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unseen_question_counts_zero() {
        let tracker = AttemptTracker::new();
        assert_eq!(tracker.count(TaskId::new(7)), 0);
        assert!(!tracker.exhausted(TaskId::new(7)));
    }

    #[test]
    fn increment_raises_by_one() {
        let mut tracker = AttemptTracker::zeroed([TaskId::new(1), TaskId::new(2)]);
        tracker.increment(TaskId::new(1));
        tracker.increment(TaskId::new(1));
        assert_eq!(tracker.count(TaskId::new(1)), 2);
        assert_eq!(tracker.count(TaskId::new(2)), 0);
    }

    #[test]
    fn exhaustion_at_ceiling() {
        let mut tracker = AttemptTracker::new();
        let id = TaskId::new(3);
        for _ in 0..MAX_ATTEMPTS {
            assert!(!tracker.exhausted(id));
            tracker.increment(id);
        }
        assert!(tracker.exhausted(id));
        assert_eq!(tracker.count(id), MAX_ATTEMPTS);
    }
}
