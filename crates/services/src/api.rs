use std::env;
use std::fmt;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use tutor_core::model::{ClusterId, TaskId};
use tutor_core::telemetry::TypingEvent;

use crate::error::ApiError;

const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Connection settings for the remote evaluator and lifecycle endpoints.
#[derive(Clone, Debug)]
pub struct TutorApiConfig {
    pub base_url: String,
}

impl TutorApiConfig {
    /// Build a config from an explicit base URL.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidBaseUrl` if the URL does not parse.
    pub fn new(raw: &str) -> Result<Self, ApiError> {
        let trimmed = raw.trim().trim_end_matches('/');
        Url::parse(trimmed)?;
        Ok(Self {
            base_url: trimmed.to_string(),
        })
    }

    /// Build a config from `TUTOR_API_BASE_URL`, falling back to the local
    /// development default.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidBaseUrl` if the configured URL does not
    /// parse.
    pub fn from_env() -> Result<Self, ApiError> {
        let raw = env::var("TUTOR_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        Self::new(&raw)
    }
}

/// Why a question ended, in wire spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    Correct,
    MaxAttempts,
    Quit,
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndReason::Correct => write!(f, "correct"),
            EndReason::MaxAttempts => write!(f, "max_attempts"),
            EndReason::Quit => write!(f, "quit"),
        }
    }
}

/// Payload for one answer submission. Field names and semantics follow the
/// evaluator wire contract exactly.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitRequest {
    pub username: String,
    pub session_id: String,
    pub task_id: TaskId,
    pub query: String,
    pub events: Vec<TypingEvent>,
    pub is_correct: bool,
}

/// The evaluator's feedback on one submission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitFeedback {
    #[serde(default)]
    pub error_type: String,
    #[serde(default)]
    pub error_subtype: String,
    #[serde(default)]
    pub personalized_feedback: String,
}

/// Remote evaluator and session-lifecycle endpoints.
///
/// Held as a trait object so the flow controller can be exercised against
/// in-memory fakes.
#[async_trait]
pub trait EvaluatorApi: Send + Sync {
    /// Establish a session for `username`, returning the server session id.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the round trip fails.
    async fn start_session(&self, username: &str) -> Result<String, ApiError>;

    /// Send one answer submission with its telemetry.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the round trip fails.
    async fn submit_answer(&self, request: &SubmitRequest) -> Result<SubmitFeedback, ApiError>;

    /// Report that a question ended, returning the classifier's cluster id
    /// when one is available.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the round trip fails.
    async fn end_question(
        &self,
        session_id: &str,
        task_id: TaskId,
        reason: EndReason,
    ) -> Result<Option<ClusterId>, ApiError>;

    /// Report that the whole session ended.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the round trip fails.
    async fn end_session(&self, session_id: &str) -> Result<(), ApiError>;
}

/// HTTP implementation of [`EvaluatorApi`].
#[derive(Clone)]
pub struct TutorClient {
    client: Client,
    config: TutorApiConfig,
}

impl TutorClient {
    #[must_use]
    pub fn new(config: TutorApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Build a client from the environment.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidBaseUrl` for a malformed base URL.
    pub fn from_env() -> Result<Self, ApiError> {
        Ok(Self::new(TutorApiConfig::from_env()?))
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    async fn post<Req: Serialize + ?Sized, Resp: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        payload: &Req,
    ) -> Result<Resp, ApiError> {
        let url = format!("{}{path}", self.config.base_url);
        let response = self.client.post(url).json(payload).send().await?;

        if !response.status().is_success() {
            return Err(ApiError::HttpStatus(response.status()));
        }

        Ok(response.json().await?)
    }
}

#[derive(Debug, Serialize)]
struct StartRequest<'a> {
    username: &'a str,
}

#[derive(Debug, Deserialize)]
struct StartResponse {
    session_id: String,
}

#[derive(Debug, Serialize)]
struct EndQuestionRequest<'a> {
    session_id: &'a str,
    task_id: TaskId,
    reason: EndReason,
}

#[derive(Debug, Deserialize)]
struct EndQuestionResponse {
    #[serde(default)]
    question_cluster_id: Option<i64>,
}

#[derive(Debug, Serialize)]
struct EndSessionRequest<'a> {
    session_id: &'a str,
}

#[async_trait]
impl EvaluatorApi for TutorClient {
    async fn start_session(&self, username: &str) -> Result<String, ApiError> {
        let response: StartResponse = self.post("/start", &StartRequest { username }).await?;
        Ok(response.session_id)
    }

    async fn submit_answer(&self, request: &SubmitRequest) -> Result<SubmitFeedback, ApiError> {
        self.post("/submit_query", request).await
    }

    async fn end_question(
        &self,
        session_id: &str,
        task_id: TaskId,
        reason: EndReason,
    ) -> Result<Option<ClusterId>, ApiError> {
        let response: EndQuestionResponse = self
            .post(
                "/end_question",
                &EndQuestionRequest {
                    session_id,
                    task_id,
                    reason,
                },
            )
            .await?;
        Ok(response.question_cluster_id.map(ClusterId::new))
    }

    async fn end_session(&self, session_id: &str) -> Result<(), ApiError> {
        // The end-session endpoint replies with an empty body.
        let url = format!("{}/end_session", self.config.base_url);
        let response = self
            .client
            .post(url)
            .json(&EndSessionRequest { session_id })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::HttpStatus(response.status()));
        }
        Ok(())
    }
}
