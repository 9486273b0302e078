use std::sync::Arc;

use tracing::{debug, info, warn};

use tutor_core::attempts::{AttemptTracker, MAX_ATTEMPTS};
use tutor_core::metrics::TypingMetrics;
use tutor_core::model::{ClusterId, Question, SessionContext, SubmissionVerdict, TaskId};
use tutor_core::normalize::is_locally_correct;
use tutor_core::progression::QuestionProgression;
use tutor_core::telemetry::TelemetryRecorder;

use crate::api::{EndReason, EvaluatorApi, SubmitRequest};
use super::state::{AdvanceOutcome, QuestionState, SubmitOutcome};

/// The question-progression state machine with integrated telemetry capture.
///
/// Owns the ordered question set, the per-question attempt counts, the
/// telemetry recorder, and the active question's state. All transitions are
/// synchronous apart from the evaluator round trips; at most one submission
/// is in flight per question, enforced by the `LockedPending` state.
pub struct SessionFlowController {
    context: SessionContext,
    api: Arc<dyn EvaluatorApi>,
    progression: QuestionProgression,
    attempts: AttemptTracker,
    recorder: TelemetryRecorder,
    state: QuestionState,
    network_notice: Option<SubmissionVerdict>,
}

impl std::fmt::Debug for SessionFlowController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionFlowController").finish_non_exhaustive()
    }
}

impl SessionFlowController {
    #[must_use]
    pub fn new(
        context: SessionContext,
        questions: Vec<Question>,
        api: Arc<dyn EvaluatorApi>,
    ) -> Self {
        let progression = QuestionProgression::new(questions);
        let attempts = AttemptTracker::zeroed(progression.questions().iter().map(Question::id));
        let mut controller = Self {
            context,
            api,
            progression,
            attempts,
            recorder: TelemetryRecorder::default(),
            state: QuestionState::Unlocked,
            network_notice: None,
        };
        controller.sync_recorder();
        controller
    }

    /// Replace the telemetry recorder, e.g. with one driven by a manual
    /// clock in tests.
    #[must_use]
    pub fn with_recorder(mut self, recorder: TelemetryRecorder) -> Self {
        self.recorder = recorder;
        self.sync_recorder();
        self
    }

    #[must_use]
    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    #[must_use]
    pub fn state(&self) -> &QuestionState {
        &self.state
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.progression.current()
    }

    /// 1-based display position of the active question in the full list.
    #[must_use]
    pub fn current_position(&self) -> Option<usize> {
        let id = self.progression.current()?.id();
        self.progression.position(id)
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.progression.total()
    }

    #[must_use]
    pub fn attempts_on_current(&self) -> u32 {
        self.progression
            .current()
            .map_or(0, |q| self.attempts.count(q.id()))
    }

    #[must_use]
    pub fn attempt_count(&self, id: TaskId) -> u32 {
        self.attempts.count(id)
    }

    #[must_use]
    pub fn is_completed(&self, id: TaskId) -> bool {
        self.progression.is_completed(id)
    }

    /// True once every question is completed.
    #[must_use]
    pub fn is_session_complete(&self) -> bool {
        self.progression.is_exhausted()
    }

    /// Transient verdict shown after a failed submit round trip.
    #[must_use]
    pub fn network_notice(&self) -> Option<&SubmissionVerdict> {
        self.network_notice.as_ref()
    }

    #[must_use]
    pub fn is_telemetry_armed(&self) -> bool {
        self.recorder.is_armed()
    }

    /// Feed a key press from the answer-entry surface.
    pub fn record_key_down(&mut self, key: &str) {
        self.recorder.record_key_down(key);
    }

    /// Feed a key release from the answer-entry surface.
    pub fn record_key_up(&mut self, key: &str) {
        self.recorder.record_key_up(key);
    }

    /// Armed if and only if the active question is unlocked for editing.
    fn sync_recorder(&mut self) {
        if self.state.is_editable() && self.progression.current().is_some() {
            self.recorder.arm();
        } else {
            self.recorder.disarm();
        }
    }

    /// Submit the learner's answer for the active question.
    ///
    /// Guarded: a blank answer, a locked question, or an in-flight
    /// submission makes this a no-op. On a completed round trip the attempt
    /// counter rises by one and the state branches on the local correctness
    /// oracle; a network failure consumes no attempt and unlocks the
    /// question with a generic notice.
    pub async fn submit(&mut self, raw_query: &str) -> SubmitOutcome {
        if !self.state.is_editable() {
            return SubmitOutcome::Ignored;
        }
        if raw_query.trim().is_empty() {
            return SubmitOutcome::Ignored;
        }
        let Some(question) = self.progression.current().cloned() else {
            return SubmitOutcome::Ignored;
        };

        self.network_notice = None;
        let task_id = question.id();
        let local_correct = is_locally_correct(raw_query, question.solution());
        let events = self.recorder.drain();
        self.state = QuestionState::LockedPending;
        self.sync_recorder();

        let metrics = TypingMetrics::from_events(&events);
        debug!(
            task_id = task_id.value(),
            events = events.len(),
            keys_per_sec = metrics.keys_per_sec,
            avg_dwell_ms = metrics.avg_dwell_ms,
            "submitting answer"
        );

        let request = SubmitRequest {
            username: self.context.username().to_string(),
            session_id: self.context.session_id().to_string(),
            task_id,
            query: raw_query.to_string(),
            events,
            is_correct: local_correct,
        };

        let feedback = match self.api.submit_answer(&request).await {
            Ok(feedback) => feedback,
            Err(err) => {
                warn!(task_id = task_id.value(), %err, "submit round trip failed");
                self.network_notice = Some(SubmissionVerdict::network_failure());
                self.state = QuestionState::Unlocked;
                self.sync_recorder();
                return SubmitOutcome::NetworkFailure;
            }
        };

        // Branch decision and counter increment come from one snapshot.
        let next_attempts = self.attempts.count(task_id) + 1;
        self.attempts.increment(task_id);

        let outcome = if local_correct {
            let cluster_id = self.end_question(task_id, EndReason::Correct).await;
            self.progression.complete(task_id);
            self.state = QuestionState::Solved { cluster_id };
            info!(task_id = task_id.value(), attempts = next_attempts, "question solved");
            SubmitOutcome::Solved
        } else if next_attempts < MAX_ATTEMPTS {
            self.state = QuestionState::Feedback(SubmissionVerdict::from_feedback(
                feedback.error_type,
                feedback.error_subtype,
                feedback.personalized_feedback,
                false,
            ));
            SubmitOutcome::Feedback
        } else {
            let cluster_id = self.end_question(task_id, EndReason::MaxAttempts).await;
            self.progression.complete(task_id);
            self.state = QuestionState::Exhausted {
                solution: question.solution().to_string(),
                cluster_id,
            };
            info!(task_id = task_id.value(), "attempts exhausted");
            SubmitOutcome::Exhausted
        };

        self.sync_recorder();
        outcome
    }

    /// Clear the previous result and unlock for another attempt.
    ///
    /// Returns false while a submission is pending or after the question has
    /// ended. Re-arms telemetry with an empty buffer.
    pub fn retry(&mut self) -> bool {
        if self.state.is_pending() || self.state.is_terminal() {
            return false;
        }
        self.network_notice = None;
        self.recorder.clear();
        self.state = QuestionState::Unlocked;
        self.sync_recorder();
        true
    }

    /// End the active question on the learner's confirmed request.
    ///
    /// Available from `Unlocked` or `Feedback`, never while a submission is
    /// pending. The lifecycle notification is best-effort; its failure
    /// degrades the cluster id to absent.
    pub async fn quit(&mut self) -> bool {
        if self.state.is_pending() || self.state.is_terminal() {
            return false;
        }
        let Some(task_id) = self.progression.current().map(Question::id) else {
            return false;
        };

        let cluster_id = self.end_question(task_id, EndReason::Quit).await;
        self.progression.complete(task_id);
        self.state = QuestionState::Quit { cluster_id };
        self.sync_recorder();
        info!(task_id = task_id.value(), "question quit");
        true
    }

    /// Leave a terminal state and select the next available question.
    ///
    /// Clears all per-question transient state. Deterministic and
    /// idempotent; any settle delay before calling this is cosmetic.
    pub fn advance(&mut self) -> AdvanceOutcome {
        if !self.state.is_terminal() {
            return AdvanceOutcome::Ignored;
        }

        self.network_notice = None;
        self.recorder.clear();
        self.state = QuestionState::Unlocked;

        let outcome = if self.progression.advance().is_some() {
            AdvanceOutcome::NextQuestion
        } else {
            AdvanceOutcome::SessionComplete
        };
        self.sync_recorder();
        outcome
    }

    /// Notify the lifecycle endpoint that the session is over. Best-effort.
    pub async fn end_session(&self) {
        if let Err(err) = self.api.end_session(self.context.session_id()).await {
            warn!(%err, "end session notification failed");
        }
    }

    async fn end_question(&self, task_id: TaskId, reason: EndReason) -> Option<ClusterId> {
        match self
            .api
            .end_question(self.context.session_id(), task_id, reason)
            .await
        {
            Ok(cluster_id) => cluster_id,
            Err(err) => {
                warn!(task_id = task_id.value(), %reason, %err, "end question notification failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::SubmitFeedback;
    use crate::error::ApiError;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tutor_core::time::{TelemetryClock, fixed_now};

    #[derive(Default)]
    struct FakeApi {
        fail_submit: AtomicBool,
        fail_end_question: AtomicBool,
        cluster_id: Option<i64>,
        submissions: Mutex<Vec<SubmitRequest>>,
        reasons: Mutex<Vec<(u64, EndReason)>>,
        ended_sessions: Mutex<Vec<String>>,
    }

    impl FakeApi {
        fn failing_submit() -> Self {
            let api = Self::default();
            api.fail_submit.store(true, Ordering::SeqCst);
            api
        }

        fn with_cluster(cluster_id: i64) -> Self {
            Self {
                cluster_id: Some(cluster_id),
                ..Self::default()
            }
        }

        fn error() -> ApiError {
            ApiError::HttpStatus(reqwest::StatusCode::BAD_GATEWAY)
        }
    }

    #[async_trait]
    impl EvaluatorApi for FakeApi {
        async fn start_session(&self, _username: &str) -> Result<String, ApiError> {
            Ok("fake-session".to_string())
        }

        async fn submit_answer(&self, request: &SubmitRequest) -> Result<SubmitFeedback, ApiError> {
            if self.fail_submit.load(Ordering::SeqCst) {
                return Err(Self::error());
            }
            self.submissions.lock().unwrap().push(request.clone());
            Ok(SubmitFeedback {
                error_type: "SYNTAX".to_string(),
                error_subtype: "MISSING_CLAUSE".to_string(),
                personalized_feedback: "Check your FROM clause.".to_string(),
            })
        }

        async fn end_question(
            &self,
            _session_id: &str,
            task_id: TaskId,
            reason: EndReason,
        ) -> Result<Option<ClusterId>, ApiError> {
            if self.fail_end_question.load(Ordering::SeqCst) {
                return Err(Self::error());
            }
            self.reasons.lock().unwrap().push((task_id.value(), reason));
            Ok(self.cluster_id.map(ClusterId::new))
        }

        async fn end_session(&self, session_id: &str) -> Result<(), ApiError> {
            self.ended_sessions
                .lock()
                .unwrap()
                .push(session_id.to_string());
            Ok(())
        }
    }

    fn build_question(id: u64) -> Question {
        Question::new(
            TaskId::new(id),
            format!("Q{id}"),
            format!("Describe {id}"),
            format!("SELECT {id};"),
        )
    }

    fn build_controller(api: Arc<FakeApi>, ids: &[u64]) -> SessionFlowController {
        let context = SessionContext::new("ada", "s-1", fixed_now()).unwrap();
        let questions = ids.iter().map(|id| build_question(*id)).collect();
        SessionFlowController::new(context, questions, api)
            .with_recorder(TelemetryRecorder::new(TelemetryClock::manual(0.0)))
    }

    #[tokio::test]
    async fn submit_guards_reject_blank_answer() {
        let api = Arc::new(FakeApi::default());
        let mut flow = build_controller(Arc::clone(&api), &[1]);

        assert_eq!(flow.submit("   ").await, SubmitOutcome::Ignored);
        assert_eq!(flow.attempts_on_current(), 0);
        assert!(api.submissions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn incorrect_submit_lands_in_feedback_and_counts() {
        let api = Arc::new(FakeApi::default());
        let mut flow = build_controller(Arc::clone(&api), &[1]);

        flow.record_key_down("x");
        flow.record_key_up("x");
        let outcome = flow.submit("SELECT wrong;").await;

        assert_eq!(outcome, SubmitOutcome::Feedback);
        assert_eq!(flow.attempts_on_current(), 1);
        let QuestionState::Feedback(verdict) = flow.state() else {
            panic!("expected feedback state");
        };
        assert_eq!(verdict.error_type(), "SYNTAX");
        assert!(!flow.is_telemetry_armed());

        // The drained buffer went out with the request.
        let submissions = api.submissions.lock().unwrap();
        assert_eq!(submissions[0].events.len(), 2);
        assert!(!submissions[0].is_correct);
    }

    #[tokio::test]
    async fn feedback_locks_until_retry() {
        let api = Arc::new(FakeApi::default());
        let mut flow = build_controller(Arc::clone(&api), &[1]);

        flow.submit("SELECT wrong;").await;
        assert_eq!(flow.submit("SELECT 1;").await, SubmitOutcome::Ignored);
        assert_eq!(flow.attempts_on_current(), 1);

        assert!(flow.retry());
        assert!(flow.is_telemetry_armed());
        assert_eq!(flow.submit("SELECT 1;").await, SubmitOutcome::Solved);
    }

    #[tokio::test]
    async fn network_failure_consumes_no_attempt_and_unlocks() {
        let api = Arc::new(FakeApi::failing_submit());
        let mut flow = build_controller(Arc::clone(&api), &[1]);

        flow.record_key_down("a");
        let outcome = flow.submit("SELECT 1;").await;

        assert_eq!(outcome, SubmitOutcome::NetworkFailure);
        assert_eq!(flow.attempts_on_current(), 0);
        assert!(flow.state().is_editable());
        assert!(flow.is_telemetry_armed());
        let notice = flow.network_notice().expect("notice surfaced");
        assert_eq!(notice.error_subtype(), "NETWORK_ERROR");
        // The stale buffer was discarded with the failed submission.
        assert!(api.submissions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn solved_marks_completed_and_sends_correct_reason() {
        let api = Arc::new(FakeApi::with_cluster(3));
        let mut flow = build_controller(Arc::clone(&api), &[1, 2]);

        let outcome = flow.submit("select 1 ;").await;
        assert_eq!(outcome, SubmitOutcome::Solved);
        assert_eq!(
            flow.state().cluster_id(),
            Some(ClusterId::new(3))
        );
        assert!(flow.is_completed(TaskId::new(1)));
        assert_eq!(
            *api.reasons.lock().unwrap(),
            vec![(1, EndReason::Correct)]
        );

        assert_eq!(flow.advance(), AdvanceOutcome::NextQuestion);
        assert_eq!(flow.current_question().unwrap().id(), TaskId::new(2));
        assert!(flow.is_telemetry_armed());
    }

    #[tokio::test]
    async fn lifecycle_failure_degrades_cluster_id_only() {
        let api = Arc::new(FakeApi::with_cluster(2));
        api.fail_end_question.store(true, Ordering::SeqCst);
        let mut flow = build_controller(Arc::clone(&api), &[1]);

        let outcome = flow.submit("SELECT 1;").await;
        assert_eq!(outcome, SubmitOutcome::Solved);
        assert_eq!(flow.state().cluster_id(), None);
        assert!(flow.is_completed(TaskId::new(1)));
    }

    #[tokio::test]
    async fn quit_completes_without_solution() {
        let api = Arc::new(FakeApi::default());
        let mut flow = build_controller(Arc::clone(&api), &[1]);

        flow.submit("SELECT wrong;").await;
        assert!(flow.quit().await);
        assert!(matches!(flow.state(), QuestionState::Quit { .. }));
        assert!(flow.is_completed(TaskId::new(1)));
        assert_eq!(*api.reasons.lock().unwrap(), vec![(1, EndReason::Quit)]);

        // Quit from a terminal state is refused.
        assert!(!flow.quit().await);
    }

    #[tokio::test]
    async fn advance_past_last_question_completes_session() {
        let api = Arc::new(FakeApi::default());
        let mut flow = build_controller(Arc::clone(&api), &[1]);

        flow.submit("SELECT 1;").await;
        assert_eq!(flow.advance(), AdvanceOutcome::SessionComplete);
        assert!(flow.is_session_complete());
        assert!(flow.current_question().is_none());
        assert!(!flow.is_telemetry_armed());

        // Idempotent once terminal state has been left.
        assert_eq!(flow.advance(), AdvanceOutcome::Ignored);

        flow.end_session().await;
        assert_eq!(*api.ended_sessions.lock().unwrap(), vec!["s-1".to_string()]);
    }
}
