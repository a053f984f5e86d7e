//! Test-only observer that captures all events into a shared vector.
//!
//! Lets unit tests assert on emitted warnings without capturing logs.

use std::sync::{Arc, Mutex};

use crate::observability::traits::{Observer, ObserverEvent, ObserverMetric};

/// Observer that records all events for test assertions.
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<ObserverEvent>>>,
    metrics: Arc<Mutex<Vec<ObserverMetric>>>,
}

impl RecordingObserver {
    /// Create a new recording observer and return handles to the captured data.
    #[allow(clippy::type_complexity)]
    pub fn new() -> (
        Self,
        Arc<Mutex<Vec<ObserverEvent>>>,
        Arc<Mutex<Vec<ObserverMetric>>>,
    ) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let metrics = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                events: Arc::clone(&events),
                metrics: Arc::clone(&metrics),
            },
            events,
            metrics,
        )
    }
}

impl Observer for RecordingObserver {
    fn record_event(&self, event: &ObserverEvent) {
        self.events.lock().unwrap().push(event.clone());
    }

    fn record_metric(&self, metric: &ObserverMetric) {
        self.metrics.lock().unwrap().push(metric.clone());
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// Count the warnings among captured events.
pub fn warning_count(events: &Mutex<Vec<ObserverEvent>>) -> usize {
    events
        .lock()
        .unwrap()
        .iter()
        .filter(|e| e.is_warning())
        .count()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn captures_events_and_metrics() {
        let (obs, events, metrics) = RecordingObserver::new();

        obs.record_event(&ObserverEvent::SessionMissing {
            platform: "messenger".into(),
            operation: "sendText".into(),
        });
        obs.record_metric(&ObserverMetric::JobLatency(Duration::from_millis(100)));

        assert_eq!(warning_count(&events), 1);
        assert_eq!(metrics.lock().unwrap().len(), 1);
    }

    #[test]
    fn name_is_recording() {
        let (obs, _, _) = RecordingObserver::new();
        assert_eq!(obs.name(), "recording");
    }
}
