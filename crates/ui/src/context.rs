use std::sync::{Arc, Mutex};

use services::{SessionFlowController, SessionLauncher};

/// Services the UI needs from the composition root.
pub trait UiApp: Send + Sync {
    fn launcher(&self) -> Arc<SessionLauncher>;
}

/// App-level slot holding the active tutoring flow between routes.
///
/// The flow controller is constructed once on the entry screen and handed to
/// the tutor route through this slot; it replaces the original's
/// browser-persisted identity with an explicit object whose lifetime is one
/// session.
#[derive(Clone, Default)]
pub struct SessionSlot {
    inner: Arc<Mutex<Option<SessionFlowController>>>,
}

impl SessionSlot {
    /// Store a freshly started flow, replacing any previous one.
    pub fn put(&self, flow: SessionFlowController) {
        *self.inner.lock().expect("session slot poisoned") = Some(flow);
    }

    /// Move the flow out of the slot. Returns `None` when no session is
    /// active, which the tutor route treats as a precondition failure and
    /// routes back to the entry screen.
    pub fn take(&self) -> Option<SessionFlowController> {
        self.inner.lock().expect("session slot poisoned").take()
    }

    /// Drop any stored session identity.
    pub fn clear(&self) {
        *self.inner.lock().expect("session slot poisoned") = None;
    }
}

#[derive(Clone)]
pub struct AppContext {
    launcher: Arc<SessionLauncher>,
    session: SessionSlot,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            launcher: app.launcher(),
            session: SessionSlot::default(),
        }
    }

    #[must_use]
    pub fn launcher(&self) -> Arc<SessionLauncher> {
        Arc::clone(&self.launcher)
    }

    #[must_use]
    pub fn session(&self) -> SessionSlot {
        self.session.clone()
    }
}

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
