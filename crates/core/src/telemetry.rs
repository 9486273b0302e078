use serde::{Deserialize, Serialize};

use crate::time::TelemetryClock;

/// Key-press or key-release, in wire spelling (`keydown` / `keyup`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyEventKind {
    KeyDown,
    KeyUp,
}

/// One captured input event on the answer-entry surface.
///
/// Serializes to the evaluator wire shape `{type, key, timestamp}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypingEvent {
    #[serde(rename = "type")]
    pub kind: KeyEventKind,
    pub key: String,
    #[serde(rename = "timestamp")]
    pub timestamp_ms: f64,
}

/// Buffering recorder for typing telemetry.
///
/// The recorder only captures while armed; arming and disarming are
/// idempotent so repeated cycles cannot leak capture across questions. The
/// flow controller re-derives the armed flag from the question state on
/// every transition, which keeps capture scoped to exactly the interval the
/// learner may type.
#[derive(Debug, Clone)]
pub struct TelemetryRecorder {
    clock: TelemetryClock,
    armed: bool,
    events: Vec<TypingEvent>,
}

impl TelemetryRecorder {
    #[must_use]
    pub fn new(clock: TelemetryClock) -> Self {
        Self {
            clock,
            armed: false,
            events: Vec::new(),
        }
    }

    /// Begin capturing. Idempotent.
    pub fn arm(&mut self) {
        self.armed = true;
    }

    /// Stop capturing. Idempotent; buffered events stay until drained.
    pub fn disarm(&mut self) {
        self.armed = false;
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Record a key press. No-op while disarmed.
    pub fn record_key_down(&mut self, key: &str) {
        self.record(KeyEventKind::KeyDown, key);
    }

    /// Record a key release. No-op while disarmed.
    pub fn record_key_up(&mut self, key: &str) {
        self.record(KeyEventKind::KeyUp, key);
    }

    fn record(&mut self, kind: KeyEventKind, key: &str) {
        if !self.armed {
            return;
        }
        self.events.push(TypingEvent {
            kind,
            key: key.to_string(),
            timestamp_ms: self.clock.now_ms(),
        });
    }

    /// Return the buffered ordered sequence and clear it.
    ///
    /// An empty buffer is a valid outcome (the learner never typed).
    pub fn drain(&mut self) -> Vec<TypingEvent> {
        std::mem::take(&mut self.events)
    }

    /// Discard buffered events without returning them.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Mutable clock access, useful for deterministic tests with a manual
    /// clock.
    pub fn clock_mut(&mut self) -> &mut TelemetryClock {
        &mut self.clock
    }
}

impl Default for TelemetryRecorder {
    fn default() -> Self {
        Self::new(TelemetryClock::start())
    }
}
