use crate::model::ClusterId;

/// Outcome of one submission, combining the local correctness oracle with the
/// remote evaluator's classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionVerdict {
    error_type: String,
    error_subtype: String,
    feedback: String,
    local_correct: bool,
    cluster_id: Option<ClusterId>,
}

impl SubmissionVerdict {
    /// Build a verdict from the remote evaluator's feedback fields.
    ///
    /// Blank classification fields degrade to `"UNKNOWN"` and a blank
    /// feedback text to a generic retry prompt, so the UI always has
    /// something to show.
    #[must_use]
    pub fn from_feedback(
        error_type: impl Into<String>,
        error_subtype: impl Into<String>,
        feedback: impl Into<String>,
        local_correct: bool,
    ) -> Self {
        let error_type = non_blank(error_type.into(), "UNKNOWN");
        let error_subtype = non_blank(error_subtype.into(), "UNKNOWN");
        let feedback = non_blank(feedback.into(), "Please try again.");
        Self {
            error_type,
            error_subtype,
            feedback,
            local_correct,
            cluster_id: None,
        }
    }

    /// The fixed verdict shown when the submit round trip could not complete.
    #[must_use]
    pub fn network_failure() -> Self {
        Self {
            error_type: "API_ERROR".to_string(),
            error_subtype: "NETWORK_ERROR".to_string(),
            feedback: "Network error, please retry.".to_string(),
            local_correct: false,
            cluster_id: None,
        }
    }

    #[must_use]
    pub fn with_cluster_id(mut self, cluster_id: Option<ClusterId>) -> Self {
        self.cluster_id = cluster_id;
        self
    }

    #[must_use]
    pub fn error_type(&self) -> &str {
        &self.error_type
    }

    #[must_use]
    pub fn error_subtype(&self) -> &str {
        &self.error_subtype
    }

    #[must_use]
    pub fn feedback(&self) -> &str {
        &self.feedback
    }

    #[must_use]
    pub fn local_correct(&self) -> bool {
        self.local_correct
    }

    #[must_use]
    pub fn cluster_id(&self) -> Option<ClusterId> {
        self.cluster_id
    }
}

fn non_blank(value: String, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_fields_degrade_to_defaults() {
        let verdict = SubmissionVerdict::from_feedback("", "  ", "", false);
        assert_eq!(verdict.error_type(), "UNKNOWN");
        assert_eq!(verdict.error_subtype(), "UNKNOWN");
        assert_eq!(verdict.feedback(), "Please try again.");
        assert!(!verdict.local_correct());
        assert_eq!(verdict.cluster_id(), None);
    }

    #[test]
    fn network_failure_is_generic() {
        let verdict = SubmissionVerdict::network_failure();
        assert_eq!(verdict.error_type(), "API_ERROR");
        assert_eq!(verdict.error_subtype(), "NETWORK_ERROR");
        assert!(!verdict.local_correct());
    }
}
