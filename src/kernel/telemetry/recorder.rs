use std::collections::VecDeque;
use super::event::TelemetryEvent;
use super::metrics::{TelemetrySnapshot, compute_snapshot};
use crate::memory::store::EntityStore;

const MAX_EVENTS: usize = 10_000;

#[derive(Debug)]
pub struct TelemetryRecorder {
    buffer: VecDeque<TelemetryEvent>,
}

impl Default for TelemetryRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetryRecorder {
    pub fn new() -> Self {
        Self {
            buffer: VecDeque::with_capacity(MAX_EVENTS),
        }
    }

    pub fn record(&mut self, event: TelemetryEvent) {
        if self.buffer.len() >= MAX_EVENTS {
            self.buffer.pop_front();
        }
        self.buffer.push_back(event);
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        // Delegate to pure functional metrics module
        compute_snapshot(&self.buffer)
    }

    pub fn events(&self) -> impl Iterator<Item = &TelemetryEvent> {
        self.buffer.iter()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Called on shutdown. Counts only.
    pub fn aggregate_session(&self, store: &EntityStore) -> TelemetryEvent {
        let snap = self.snapshot();
        TelemetryEvent::SessionSummary {
            turns: store.turns().len(),
            insights: store.insights().len(),
            origins: store.origins().len(),
            hypotheses: store.hypotheses().len(),
            fallbacks: snap.turn_stats.fallbacks,
        }
    }
}
