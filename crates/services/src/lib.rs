#![forbid(unsafe_code)]

pub mod api;
pub mod error;
pub mod flow;
pub mod question_bank;

pub use tutor_core::time::WallClock;

pub use api::{EndReason, EvaluatorApi, SubmitFeedback, SubmitRequest, TutorApiConfig, TutorClient};
pub use error::{ApiError, LaunchError, QuestionBankError};
pub use question_bank::{HttpQuestionBank, InMemoryQuestionBank, QuestionBank};

pub use flow::{
    AdvanceOutcome, QuestionState, SessionFlowController, SessionLauncher, SubmitOutcome,
};
