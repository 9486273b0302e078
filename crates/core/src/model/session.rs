use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionContextError {
    #[error("username must not be empty")]
    EmptyUsername,

    #[error("session id must not be empty")]
    EmptySessionId,
}

/// Identity of one tutoring session.
///
/// Constructed once at entry (after the start-session round trip) and passed
/// into every operation for the lifetime of the tutoring screen. Its absence
/// is a hard precondition failure handled by the routing layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    username: String,
    session_id: String,
    started_at: DateTime<Utc>,
}

impl SessionContext {
    /// Build a session context from the entry screen's inputs.
    ///
    /// # Errors
    ///
    /// Returns `SessionContextError` if either field is blank.
    pub fn new(
        username: impl Into<String>,
        session_id: impl Into<String>,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionContextError> {
        let username = username.into();
        let session_id = session_id.into();
        if username.trim().is_empty() {
            return Err(SessionContextError::EmptyUsername);
        }
        if session_id.trim().is_empty() {
            return Err(SessionContextError::EmptySessionId);
        }
        Ok(Self {
            username,
            session_id,
            started_at,
        })
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn context_rejects_blank_username() {
        let err = SessionContext::new("   ", "s-1", fixed_now()).unwrap_err();
        assert_eq!(err, SessionContextError::EmptyUsername);
    }

    #[test]
    fn context_rejects_blank_session_id() {
        let err = SessionContext::new("ada", "", fixed_now()).unwrap_err();
        assert_eq!(err, SessionContextError::EmptySessionId);
    }

    #[test]
    fn context_holds_identity() {
        let ctx = SessionContext::new("ada", "s-1", fixed_now()).unwrap();
        assert_eq!(ctx.username(), "ada");
        assert_eq!(ctx.session_id(), "s-1");
        assert_eq!(ctx.started_at(), fixed_now());
    }
}
