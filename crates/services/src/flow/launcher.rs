use std::sync::Arc;

use tracing::info;

use tutor_core::model::SessionContext;
use tutor_core::time::WallClock;

use crate::api::EvaluatorApi;
use crate::error::LaunchError;
use crate::question_bank::QuestionBank;
use super::controller::SessionFlowController;

/// Orchestrates session start: remote session creation plus question load.
#[derive(Clone)]
pub struct SessionLauncher {
    clock: WallClock,
    api: Arc<dyn EvaluatorApi>,
    bank: Arc<dyn QuestionBank>,
}

impl SessionLauncher {
    #[must_use]
    pub fn new(clock: WallClock, api: Arc<dyn EvaluatorApi>, bank: Arc<dyn QuestionBank>) -> Self {
        Self { clock, api, bank }
    }

    /// Start a tutoring session for `username`.
    ///
    /// Establishes the remote session identity, loads the question set, and
    /// hands back a flow controller positioned on the first question.
    ///
    /// # Errors
    ///
    /// Returns `LaunchError::EmptyUsername` for a blank name,
    /// `LaunchError::EmptyBank` when no questions are available, and
    /// transport errors from either remote collaborator.
    pub async fn start(&self, username: &str) -> Result<SessionFlowController, LaunchError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(LaunchError::EmptyUsername);
        }

        let session_id = self.api.start_session(username).await?;
        let context = SessionContext::new(username, session_id, self.clock.now())?;

        let questions = self.bank.list_questions().await?;
        if questions.is_empty() {
            return Err(LaunchError::EmptyBank);
        }

        info!(
            username,
            session_id = context.session_id(),
            questions = questions.len(),
            "tutoring session started"
        );

        Ok(SessionFlowController::new(
            context,
            questions,
            Arc::clone(&self.api),
        ))
    }
}
