use services::{AdvanceOutcome, QuestionState, SessionFlowController, SubmitOutcome};
use tutor_core::attempts::MAX_ATTEMPTS;
use tutor_core::model::{Persona, Question, SubmissionVerdict, resolve_persona};

/// User actions on the tutor screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TutorIntent {
    Submit,
    Retry,
    RequestQuit,
    CancelQuit,
    ConfirmQuit,
    Advance,
    Exit,
}

/// Which overlay, if any, sits above the tutor screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TutorModal {
    None,
    ConfirmQuit,
    Outcome,
    AllDone,
}

/// How the active question ended, for the outcome overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutcomeKind {
    Solved,
    OutOfAttempts,
    Quit,
}

/// View model for the tutor screen: the flow controller plus UI-only state
/// (the draft answer and the modal layer).
pub struct TutorVm {
    flow: SessionFlowController,
    query: String,
    modal: TutorModal,
}

impl TutorVm {
    #[must_use]
    pub fn new(flow: SessionFlowController) -> Self {
        Self {
            flow,
            query: String::new(),
            modal: TutorModal::None,
        }
    }

    #[must_use]
    pub fn question(&self) -> Option<&Question> {
        self.flow.current_question()
    }

    #[must_use]
    pub fn question_number(&self) -> usize {
        self.flow.current_position().unwrap_or(0)
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.flow.total_questions()
    }

    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.flow.attempts_on_current()
    }

    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        MAX_ATTEMPTS
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Replace the draft answer. Ignored while the question is locked.
    pub fn set_query(&mut self, text: String) {
        if self.flow.state().is_editable() {
            self.query = text;
        }
    }

    /// Key press on the answer textarea.
    pub fn key_down(&mut self, key: &str) {
        self.flow.record_key_down(key);
    }

    /// Key release on the answer textarea.
    pub fn key_up(&mut self, key: &str) {
        self.flow.record_key_up(key);
    }

    #[must_use]
    pub fn modal(&self) -> TutorModal {
        self.modal
    }

    #[must_use]
    pub fn is_editable(&self) -> bool {
        self.flow.state().is_editable()
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.flow.state().is_pending()
    }

    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.flow.state().is_editable()
            && !self.query.trim().is_empty()
            && self.question().is_some()
    }

    /// Verdict to show in the feedback card: evaluator feedback while in the
    /// `Feedback` state, or the transient network notice.
    #[must_use]
    pub fn feedback(&self) -> Option<&SubmissionVerdict> {
        if let QuestionState::Feedback(verdict) = self.flow.state() {
            return Some(verdict);
        }
        self.flow.network_notice()
    }

    /// Solution text, revealed only in the attempts-exhausted terminal.
    #[must_use]
    pub fn revealed_solution(&self) -> Option<&str> {
        match self.flow.state() {
            QuestionState::Exhausted { solution, .. } => Some(solution),
            _ => None,
        }
    }

    #[must_use]
    pub fn outcome(&self) -> Option<OutcomeKind> {
        match self.flow.state() {
            QuestionState::Solved { .. } => Some(OutcomeKind::Solved),
            QuestionState::Exhausted { .. } => Some(OutcomeKind::OutOfAttempts),
            QuestionState::Quit { .. } => Some(OutcomeKind::Quit),
            _ => None,
        }
    }

    /// Learner persona for the just-ended question.
    #[must_use]
    pub fn persona(&self) -> Persona {
        resolve_persona(self.flow.state().cluster_id())
    }

    pub async fn submit(&mut self) {
        let query = self.query.clone();
        match self.flow.submit(&query).await {
            SubmitOutcome::Solved | SubmitOutcome::Exhausted => {
                self.modal = TutorModal::Outcome;
            }
            SubmitOutcome::Feedback
            | SubmitOutcome::NetworkFailure
            | SubmitOutcome::Ignored => {}
        }
    }

    pub fn retry(&mut self) {
        if self.flow.retry() {
            self.query.clear();
        }
    }

    pub fn request_quit(&mut self) {
        if self.modal == TutorModal::None
            && !self.flow.state().is_pending()
            && !self.flow.state().is_terminal()
            && self.question().is_some()
        {
            self.modal = TutorModal::ConfirmQuit;
        }
    }

    pub fn cancel_quit(&mut self) {
        if self.modal == TutorModal::ConfirmQuit {
            self.modal = TutorModal::None;
        }
    }

    pub async fn confirm_quit(&mut self) {
        self.modal = TutorModal::None;
        if self.flow.quit().await {
            self.modal = TutorModal::Outcome;
        }
    }

    /// Leave the outcome overlay and move to the next question, or to the
    /// all-done overlay when none remains.
    pub fn advance(&mut self) -> AdvanceOutcome {
        let outcome = self.flow.advance();
        match outcome {
            AdvanceOutcome::NextQuestion => {
                self.query.clear();
                self.modal = TutorModal::None;
            }
            AdvanceOutcome::SessionComplete => {
                self.query.clear();
                self.modal = TutorModal::AllDone;
            }
            AdvanceOutcome::Ignored => {}
        }
        outcome
    }

    /// Best-effort end-session notification before leaving the screen.
    pub async fn exit(&mut self) {
        self.flow.end_session().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use services::{ApiError, EndReason, EvaluatorApi, SubmitFeedback, SubmitRequest};
    use std::sync::Arc;
    use tutor_core::model::{ClusterId, SessionContext, TaskId};
    use tutor_core::time::fixed_now;

    struct StubApi;

    #[async_trait]
    impl EvaluatorApi for StubApi {
        async fn start_session(&self, _username: &str) -> Result<String, ApiError> {
            Ok("s".to_string())
        }

        async fn submit_answer(&self, _request: &SubmitRequest) -> Result<SubmitFeedback, ApiError> {
            Ok(SubmitFeedback::default())
        }

        async fn end_question(
            &self,
            _session_id: &str,
            _task_id: TaskId,
            _reason: EndReason,
        ) -> Result<Option<ClusterId>, ApiError> {
            Ok(Some(ClusterId::new(3)))
        }

        async fn end_session(&self, _session_id: &str) -> Result<(), ApiError> {
            Ok(())
        }
    }

    fn build_vm(ids: &[u64]) -> TutorVm {
        let context = SessionContext::new("ada", "s", fixed_now()).unwrap();
        let questions = ids
            .iter()
            .map(|id| {
                Question::new(
                    TaskId::new(*id),
                    format!("Q{id}"),
                    String::new(),
                    format!("SELECT {id};"),
                )
            })
            .collect();
        TutorVm::new(SessionFlowController::new(
            context,
            questions,
            Arc::new(StubApi),
        ))
    }

    #[tokio::test]
    async fn solving_opens_the_outcome_overlay() {
        let mut vm = build_vm(&[1, 2]);
        vm.set_query("SELECT 1;".to_string());
        vm.submit().await;

        assert_eq!(vm.modal(), TutorModal::Outcome);
        assert_eq!(vm.outcome(), Some(OutcomeKind::Solved));
        assert_eq!(vm.persona().title, "Proficient Learner");

        assert_eq!(vm.advance(), AdvanceOutcome::NextQuestion);
        assert_eq!(vm.modal(), TutorModal::None);
        assert_eq!(vm.query(), "");
        assert_eq!(vm.question().unwrap().id(), TaskId::new(2));
    }

    #[tokio::test]
    async fn quit_flow_needs_confirmation() {
        let mut vm = build_vm(&[1]);
        vm.request_quit();
        assert_eq!(vm.modal(), TutorModal::ConfirmQuit);
        vm.cancel_quit();
        assert_eq!(vm.modal(), TutorModal::None);

        vm.request_quit();
        vm.confirm_quit().await;
        assert_eq!(vm.modal(), TutorModal::Outcome);
        assert_eq!(vm.outcome(), Some(OutcomeKind::Quit));
        assert_eq!(vm.revealed_solution(), None);
    }

    #[tokio::test]
    async fn finishing_the_last_question_shows_all_done() {
        let mut vm = build_vm(&[1]);
        vm.set_query("SELECT 1;".to_string());
        vm.submit().await;
        assert_eq!(vm.advance(), AdvanceOutcome::SessionComplete);
        assert_eq!(vm.modal(), TutorModal::AllDone);
        assert!(vm.question().is_none());
    }

    #[tokio::test]
    async fn locked_question_ignores_edits() {
        let mut vm = build_vm(&[1]);
        vm.set_query("SELECT 1;".to_string());
        vm.submit().await;
        vm.set_query("SELECT 2;".to_string());
        assert_eq!(vm.query(), "SELECT 1;");
    }
}
