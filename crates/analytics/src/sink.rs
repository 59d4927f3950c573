use std::sync::Mutex;

use crate::event::{AnalyticsAction, AnalyticsEvent};

/// Destination for analytics events.
///
/// Sinks are shared between layers, so recording takes `&self`.
pub trait AnalyticsSink: Send + Sync {
    fn record(&self, event: AnalyticsEvent);
}

/// Discards everything.
#[derive(Debug, Default)]
pub struct NullSink;

impl AnalyticsSink for NullSink {
    fn record(&self, _event: AnalyticsEvent) {}
}

/// Emits each event as a structured `tracing` record.
#[derive(Debug, Default)]
pub struct TracingSink;

impl AnalyticsSink for TracingSink {
    fn record(&self, event: AnalyticsEvent) {
        tracing::info!(
            target: "geolayer::analytics",
            category = %event.category,
            action = %event.action,
            label = %event.label,
            value = ?event.value,
            "analytics event"
        );
    }
}

/// Keeps events in memory, in arrival order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<AnalyticsEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far.
    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.lock().clone()
    }

    /// Just the actions, in order.
    pub fn actions(&self) -> Vec<AnalyticsAction> {
        self.lock().iter().map(|e| e.action).collect()
    }

    /// Most recent event with the given action.
    pub fn last(&self, action: AnalyticsAction) -> Option<AnalyticsEvent> {
        self.lock().iter().rev().find(|e| e.action == action).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drain and return the recorded events.
    pub fn drain(&self) -> Vec<AnalyticsEvent> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<AnalyticsEvent>> {
        // A panic while holding the lock leaves a valid Vec behind.
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl AnalyticsSink for RecordingSink {
    fn record(&self, event: AnalyticsEvent) {
        self.lock().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_sink_keeps_order() {
        let sink = RecordingSink::new();
        sink.record(AnalyticsEvent::data_source(AnalyticsAction::Added, "A", None));
        sink.record(AnalyticsEvent::data_source(AnalyticsAction::Shown, "A", None));
        assert_eq!(
            sink.actions(),
            vec![AnalyticsAction::Added, AnalyticsAction::Shown]
        );
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn last_finds_most_recent() {
        let sink = RecordingSink::new();
        sink.record(AnalyticsEvent::data_source(AnalyticsAction::Hidden, "A", Some(1.0)));
        sink.record(AnalyticsEvent::data_source(AnalyticsAction::Hidden, "B", Some(2.0)));
        let last = sink.last(AnalyticsAction::Hidden).unwrap();
        assert_eq!(last.label, "B");
        assert!(sink.last(AnalyticsAction::ZoomTo).is_none());
    }

    #[test]
    fn drain_empties_the_sink() {
        let sink = RecordingSink::new();
        sink.record(AnalyticsEvent::data_source(AnalyticsAction::ZoomTo, "A", None));
        assert_eq!(sink.drain().len(), 1);
        assert!(sink.is_empty());
    }

    #[test]
    fn null_and_tracing_sinks_accept_events() {
        let event = AnalyticsEvent::data_source(AnalyticsAction::Added, "A", None);
        NullSink.record(event.clone());
        TracingSink.record(event);
    }
}
