#![forbid(unsafe_code)]

pub mod attempts;
pub mod metrics;
pub mod model;
pub mod normalize;
pub mod progression;
pub mod telemetry;
pub mod time;

pub use attempts::{AttemptTracker, MAX_ATTEMPTS};
pub use metrics::TypingMetrics;
pub use model::{
    ClusterId, Persona, Question, SessionContext, SessionContextError, SubmissionVerdict, TaskId,
    resolve_persona,
};
pub use normalize::{is_locally_correct, normalize};
pub use progression::QuestionProgression;
pub use telemetry::{KeyEventKind, TelemetryRecorder, TypingEvent};
pub use time::{TelemetryClock, WallClock};
