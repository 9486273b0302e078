use crate::telemetry::{KeyEventKind, TypingEvent};

/// Summary statistics over one drained telemetry buffer.
///
/// Dwell time pairs each key release with the latest unmatched press of the
/// same key; flight time is the gap between a release and the next press.
/// Negative intervals (out-of-order hardware repeats) are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TypingMetrics {
    pub avg_dwell_ms: f64,
    pub avg_flight_ms: f64,
    pub keys_per_sec: f64,
    pub backspace_rate: f64,
    pub delete_rate: f64,
}

impl TypingMetrics {
    /// Compute metrics from an ordered event sequence.
    ///
    /// An empty buffer yields all-zero metrics.
    #[must_use]
    pub fn from_events(events: &[TypingEvent]) -> Self {
        if events.is_empty() {
            return Self::default();
        }

        let mut dwell_times: Vec<f64> = Vec::new();
        let mut flight_times: Vec<f64> = Vec::new();
        let mut total_key_count: u32 = 0;
        let mut backspace_count: u32 = 0;
        let mut delete_count: u32 = 0;

        // Unmatched presses, in arrival order.
        let mut pressed: Vec<(&str, f64)> = Vec::new();
        let mut last_key_up: Option<f64> = None;

        for event in events {
            match event.kind {
                KeyEventKind::KeyDown => {
                    total_key_count += 1;
                    match event.key.as_str() {
                        "Backspace" => backspace_count += 1,
                        "Delete" => delete_count += 1,
                        _ => {}
                    }

                    if let Some(up_at) = last_key_up {
                        let flight = event.timestamp_ms - up_at;
                        if flight > 0.0 {
                            flight_times.push(flight);
                        }
                    }

                    pressed.push((event.key.as_str(), event.timestamp_ms));
                }
                KeyEventKind::KeyUp => {
                    if let Some(index) = pressed.iter().rposition(|(key, _)| *key == event.key) {
                        let (_, down_at) = pressed.remove(index);
                        let dwell = event.timestamp_ms - down_at;
                        if dwell > 0.0 {
                            dwell_times.push(dwell);
                        }
                    }
                    last_key_up = Some(event.timestamp_ms);
                }
            }
        }

        let span_ms = if events.len() > 1 {
            events[events.len() - 1].timestamp_ms - events[0].timestamp_ms
        } else {
            0.0
        };
        let keys_per_sec = if span_ms > 0.0 {
            f64::from(total_key_count) / (span_ms / 1000.0)
        } else {
            0.0
        };

        let denominator = f64::from(total_key_count.max(1));

        Self {
            avg_dwell_ms: mean(&dwell_times),
            avg_flight_ms: mean(&flight_times),
            keys_per_sec,
            backspace_rate: f64::from(backspace_count) / denominator,
            delete_rate: f64::from(delete_count) / denominator,
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(kind: KeyEventKind, key: &str, timestamp_ms: f64) -> TypingEvent {
        TypingEvent {
            kind,
            key: key.to_string(),
            timestamp_ms,
        }
    }

    #[test]
    fn empty_buffer_yields_zero_metrics() {
        assert_eq!(TypingMetrics::from_events(&[]), TypingMetrics::default());
    }

    #[test]
    fn dwell_and_flight_are_averaged() {
        let events = [
            event(KeyEventKind::KeyDown, "a", 0.0),
            event(KeyEventKind::KeyUp, "a", 100.0),
            event(KeyEventKind::KeyDown, "b", 150.0),
            event(KeyEventKind::KeyUp, "b", 350.0),
        ];
        let metrics = TypingMetrics::from_events(&events);
        // dwell: 100 and 200; flight: 150 - 100 = 50
        assert_eq!(metrics.avg_dwell_ms, 150.0);
        assert_eq!(metrics.avg_flight_ms, 50.0);
        // 2 presses over 350 ms
        assert!((metrics.keys_per_sec - 2.0 / 0.35).abs() < 1e-9);
    }

    #[test]
    fn correction_keys_are_rated_per_press() {
        let events = [
            event(KeyEventKind::KeyDown, "a", 0.0),
            event(KeyEventKind::KeyUp, "a", 50.0),
            event(KeyEventKind::KeyDown, "Backspace", 100.0),
            event(KeyEventKind::KeyUp, "Backspace", 150.0),
            event(KeyEventKind::KeyDown, "Delete", 200.0),
            event(KeyEventKind::KeyUp, "Delete", 250.0),
            event(KeyEventKind::KeyDown, "b", 300.0),
            event(KeyEventKind::KeyUp, "b", 350.0),
        ];
        let metrics = TypingMetrics::from_events(&events);
        assert_eq!(metrics.backspace_rate, 0.25);
        assert_eq!(metrics.delete_rate, 0.25);
    }

    #[test]
    fn repeated_key_pairs_with_latest_press() {
        // Two overlapping presses of the same key: the release pairs with
        // the most recent one.
        let events = [
            event(KeyEventKind::KeyDown, "a", 0.0),
            event(KeyEventKind::KeyDown, "a", 40.0),
            event(KeyEventKind::KeyUp, "a", 100.0),
        ];
        let metrics = TypingMetrics::from_events(&events);
        assert_eq!(metrics.avg_dwell_ms, 60.0);
    }

    #[test]
    fn lone_press_produces_no_intervals() {
        let events = [event(KeyEventKind::KeyDown, "a", 0.0)];
        let metrics = TypingMetrics::from_events(&events);
        assert_eq!(metrics.avg_dwell_ms, 0.0);
        assert_eq!(metrics.avg_flight_ms, 0.0);
        assert_eq!(metrics.keys_per_sec, 0.0);
    }
}
