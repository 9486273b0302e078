mod controller;
mod launcher;
mod state;

// Public API of the tutoring-flow subsystem.
pub use controller::SessionFlowController;
pub use launcher::SessionLauncher;
pub use state::{AdvanceOutcome, QuestionState, SubmitOutcome};
