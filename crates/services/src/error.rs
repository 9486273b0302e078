//! Shared error types for the services crate.

use thiserror::Error;

use tutor_core::model::SessionContextError;

/// Errors emitted by the remote evaluator/lifecycle client.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("invalid api base url: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
    #[error("evaluator request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by question-bank implementations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionBankError {
    #[error("question bank request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted while launching a tutoring session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LaunchError {
    #[error("username must not be empty")]
    EmptyUsername,
    #[error("question bank returned no questions")]
    EmptyBank,
    #[error(transparent)]
    Context(#[from] SessionContextError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Bank(#[from] QuestionBankError),
}
