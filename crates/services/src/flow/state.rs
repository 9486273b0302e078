use tutor_core::model::{ClusterId, SubmissionVerdict};

/// Lifecycle of the active question.
///
/// `Unlocked` is the only state in which the answer field is editable and
/// telemetry is armed. A submission moves through `LockedPending` and lands
/// in `Feedback` (incorrect, attempts remain) or one of the terminal states.
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionState {
    /// Editable; telemetry capture armed.
    Unlocked,
    /// Submission in flight; input locked.
    LockedPending,
    /// Incorrect with attempts remaining; locked until an explicit retry.
    Feedback(SubmissionVerdict),
    /// Answered correctly.
    Solved { cluster_id: Option<ClusterId> },
    /// Attempts exhausted; the reference solution is revealed here only.
    Exhausted {
        solution: String,
        cluster_id: Option<ClusterId>,
    },
    /// Abandoned by the learner. No solution is revealed.
    Quit { cluster_id: Option<ClusterId> },
}

impl QuestionState {
    /// True while the learner may edit (and therefore type telemetry).
    #[must_use]
    pub fn is_editable(&self) -> bool {
        matches!(self, QuestionState::Unlocked)
    }

    /// True while a submission round trip is in flight.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, QuestionState::LockedPending)
    }

    /// True once the question has ended, one way or another.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            QuestionState::Solved { .. } | QuestionState::Exhausted { .. } | QuestionState::Quit { .. }
        )
    }

    /// Cluster id attached to a terminal state, if the lifecycle endpoint
    /// supplied one.
    #[must_use]
    pub fn cluster_id(&self) -> Option<ClusterId> {
        match self {
            QuestionState::Solved { cluster_id }
            | QuestionState::Exhausted { cluster_id, .. }
            | QuestionState::Quit { cluster_id } => *cluster_id,
            _ => None,
        }
    }
}

/// What a submit call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Guard rejected the call: empty answer, locked input, submission
    /// already pending, or no active question. Nothing changed.
    Ignored,
    Solved,
    Feedback,
    Exhausted,
    /// The round trip failed; no attempt was consumed and the question is
    /// unlocked again.
    NetworkFailure,
}

/// What an advance call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// A next question is active and unlocked.
    NextQuestion,
    /// Every question is completed; the session-complete terminal state.
    SessionComplete,
    /// Advance is only available from a terminal question state.
    Ignored,
}
