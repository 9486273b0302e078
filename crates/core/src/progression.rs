use std::collections::BTreeSet;
use std::fmt;

use crate::model::{Question, TaskId};

/// Ordered question set with the completed set and the active-question
/// pointer.
///
/// Questions keep stable ascending-id order. Completing a question shrinks
/// the available subsequence, which can invalidate a stale pointer, so the
/// pointer is clamped on every read.
#[derive(Clone)]
pub struct QuestionProgression {
    questions: Vec<Question>,
    completed: BTreeSet<TaskId>,
    cursor: usize,
}

impl QuestionProgression {
    /// Build a progression over the loaded question set, sorted ascending by
    /// task id.
    #[must_use]
    pub fn new(mut questions: Vec<Question>) -> Self {
        questions.sort_by_key(Question::id);
        Self {
            questions,
            completed: BTreeSet::new(),
            cursor: 0,
        }
    }

    /// Every loaded question, in presentation order.
    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Questions not yet completed, preserving original order.
    #[must_use]
    pub fn available(&self) -> Vec<&Question> {
        self.questions
            .iter()
            .filter(|q| !self.completed.contains(&q.id()))
            .collect()
    }

    /// The active question: the clamped pointer into `available()`, or none
    /// when every question is completed.
    #[must_use]
    pub fn current(&self) -> Option<&Question> {
        let available = self.available();
        if available.is_empty() {
            return None;
        }
        let index = self.cursor.min(available.len() - 1);
        Some(available[index])
    }

    /// Reset the pointer to the first available question.
    ///
    /// Returns the new active question, or `None` to signal exhaustion when
    /// all questions are completed. Idempotent.
    pub fn advance(&mut self) -> Option<&Question> {
        self.cursor = 0;
        self.current()
    }

    /// Add a question to the completed set. The set only grows; completing
    /// an already-completed question is a no-op.
    pub fn complete(&mut self, id: TaskId) {
        self.completed.insert(id);
    }

    #[must_use]
    pub fn is_completed(&self, id: TaskId) -> bool {
        self.completed.contains(&id)
    }

    /// True once no question remains available.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.available().is_empty()
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    /// 1-based index of a question in the full ordered list, for display.
    #[must_use]
    pub fn position(&self, id: TaskId) -> Option<usize> {
        self.questions
            .iter()
            .position(|q| q.id() == id)
            .map(|index| index + 1)
    }
}

impl fmt::Debug for QuestionProgression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuestionProgression")
            .field("questions_len", &self.questions.len())
            .field("completed_len", &self.completed.len())
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_question(id: u64) -> Question {
        Question::new(
            TaskId::new(id),
            format!("Q{id}"),
            format!("Describe {id}"),
            format!("SELECT {id};"),
        )
    }

    fn build_progression(ids: &[u64]) -> QuestionProgression {
        QuestionProgression::new(ids.iter().map(|id| build_question(*id)).collect())
    }

    #[test]
    fn questions_sort_ascending_by_id() {
        let progression = build_progression(&[3, 1, 2]);
        let ids: Vec<u64> = progression
            .questions()
            .iter()
            .map(|q| q.id().value())
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn current_points_at_first_available() {
        let mut progression = build_progression(&[1, 2, 3]);
        assert_eq!(progression.current().unwrap().id(), TaskId::new(1));

        progression.complete(TaskId::new(1));
        assert_eq!(progression.current().unwrap().id(), TaskId::new(2));
    }

    #[test]
    fn pointer_is_clamped_after_completion() {
        let mut progression = build_progression(&[1, 2]);
        progression.complete(TaskId::new(1));
        progression.complete(TaskId::new(2));
        assert!(progression.current().is_none());
        assert!(progression.is_exhausted());
    }

    #[test]
    fn advance_resets_to_first_available_or_signals_exhaustion() {
        let mut progression = build_progression(&[1, 2]);
        progression.complete(TaskId::new(1));
        assert_eq!(progression.advance().unwrap().id(), TaskId::new(2));

        progression.complete(TaskId::new(2));
        assert!(progression.advance().is_none());
    }

    #[test]
    fn completed_set_only_grows() {
        let mut progression = build_progression(&[1, 2, 3]);
        progression.complete(TaskId::new(2));
        progression.complete(TaskId::new(2));
        assert_eq!(progression.completed_count(), 1);
        assert!(progression.is_completed(TaskId::new(2)));
    }

    #[test]
    fn position_is_one_based_over_full_list() {
        let mut progression = build_progression(&[10, 20, 30]);
        progression.complete(TaskId::new(10));
        // Position keeps counting over the full list, not the available one.
        assert_eq!(progression.position(TaskId::new(20)), Some(2));
        assert_eq!(progression.position(TaskId::new(99)), None);
    }
}
