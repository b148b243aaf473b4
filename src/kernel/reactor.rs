use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use super::event::Event;
use super::state::{SessionState, StateDelta};
use super::telemetry::event::{
    LifecycleEvent, RecalibrationEventKind, RecordKind, SynthesisEventKind, TelemetryEvent,
    TurnOutcomeKind,
};
use super::telemetry::recorder::TelemetryRecorder;

use crate::config::SessionConfig;
use crate::hypothesis::lifecycle::{HypothesisLifecycle, ResolveOutcome};
use crate::memory::types::{HypothesisId, InsightId, InsightStatus, OriginId, OriginStatus, Resolution};
use crate::planner::turn_processor::TurnProcessor;
use crate::planner::types::TurnReply;
use crate::services::llm::ReasoningGateway;
use crate::synthesis::profile::ProfileSynthesizer;

const EVENT_CHANNEL_CAPACITY: usize = 100;

/// Single owner of the session. Operations mutate state synchronously;
/// gateway calls run detached and come back as `Event`s applied in `apply`.
pub struct Reactor {
    receiver: mpsc::Receiver<Event>,
    pub state: SessionState,
    pub telemetry: TelemetryRecorder,
    turn_processor: TurnProcessor,
    lifecycle: HypothesisLifecycle,
    synthesizer: ProfileSynthesizer,
    // Dispatched calls whose event has not been applied yet
    outstanding: usize,
}

impl Reactor {
    pub fn new(gateway: Arc<dyn ReasoningGateway>, config: SessionConfig) -> Self {
        let (tx, receiver) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            receiver,
            state: SessionState::new(),
            telemetry: TelemetryRecorder::new(),
            turn_processor: TurnProcessor::new(Arc::clone(&gateway), tx.clone(), config.context_window),
            lifecycle: HypothesisLifecycle::new(Arc::clone(&gateway), tx.clone()),
            synthesizer: ProfileSynthesizer::new(
                gateway,
                tx,
                config.synthesis_window,
                config.synthesis_threshold,
                config.theory_count,
            ),
            outstanding: 0,
        }
    }

    pub fn synthesizer(&self) -> &ProfileSynthesizer {
        &self.synthesizer
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    /// Submits a user utterance. Inactive session, blank text or a turn
    /// already in flight drop the input silently.
    pub fn submit(&mut self, text: &str) {
        if let Err(reason) = TurnProcessor::admit(&self.state, text) {
            debug!("Input dropped: {:?}", reason);
            self.telemetry.record(TelemetryEvent::TurnRejected { reason });
            return;
        }

        let turn = self.turn_processor.begin(&mut self.state, text);
        self.outstanding += 1;
        self.telemetry.record(TelemetryEvent::TurnAccepted { turn_id: turn.id });
        self.observe_turns();
    }

    /// Resolves a pending hypothesis. Unknown or already-resolved ids are no-ops.
    pub fn resolve_hypothesis(&mut self, id: HypothesisId, resolution: Resolution) {
        match self.lifecycle.resolve(&mut self.state, id, resolution) {
            ResolveOutcome::Resolved { recalibrating } => {
                self.telemetry.record(TelemetryEvent::HypothesisResolved { hypothesis_id: id, resolution });
                if recalibrating {
                    self.outstanding += 1;
                    self.telemetry.record(TelemetryEvent::Recalibration {
                        hypothesis_id: id,
                        event: RecalibrationEventKind::Requested,
                    });
                }
            }
            ResolveOutcome::UnknownId | ResolveOutcome::AlreadyResolved(_) => {}
        }
    }

    pub fn set_insight_status(&mut self, id: InsightId, status: InsightStatus) {
        self.state.reduce(StateDelta::InsightStatusChanged { id, status });
    }

    pub fn set_origin_status(&mut self, id: OriginId, status: OriginStatus) {
        self.state.reduce(StateDelta::OriginStatusChanged { id, status });
    }

    /// Deactivates the session. In-flight calls still complete and still apply.
    pub fn stop(&mut self) {
        if !self.state.active {
            return;
        }
        self.state.reduce(StateDelta::SessionStopped);
        self.telemetry.record(TelemetryEvent::Lifecycle(LifecycleEvent::SessionStopped));
        info!("Session stopped at {} turns", self.state.store().turns().len());
        self.observe_turns();
    }

    /// Applies one background result.
    pub fn apply(&mut self, event: Event) {
        self.outstanding = self.outstanding.saturating_sub(1);

        match event {
            Event::TurnProcessed(reply) => self.complete_turn(reply),
            Event::AdjustmentReady { id, plan } => {
                let kind = if HypothesisLifecycle::accept_adjustment(&mut self.state, id, plan) {
                    RecalibrationEventKind::Attached
                } else {
                    RecalibrationEventKind::Discarded
                };
                self.telemetry.record(TelemetryEvent::Recalibration { hypothesis_id: id, event: kind });
            }
            Event::AdjustmentFailed { id } => {
                self.telemetry.record(TelemetryEvent::Recalibration {
                    hypothesis_id: id,
                    event: RecalibrationEventKind::Failed,
                });
            }
            Event::ProfileSynthesized(theories) => {
                let kind = if theories.is_some() {
                    SynthesisEventKind::Completed
                } else {
                    SynthesisEventKind::Failed
                };
                self.synthesizer.accept(theories);
                self.telemetry.record(TelemetryEvent::Synthesis(kind));
            }
        }
    }

    fn complete_turn(&mut self, reply: TurnReply) {
        let outcome = match reply {
            TurnReply::Decoded(_) => TurnOutcomeKind::Replied,
            TurnReply::Fallback => TurnOutcomeKind::FellBack,
        };

        for delta in TurnProcessor::complete(reply) {
            let minted = match &delta {
                StateDelta::InsightMinted(_) => Some(RecordKind::Insight),
                StateDelta::OriginMinted(_) => Some(RecordKind::Origin),
                StateDelta::HypothesisMinted(_) => Some(RecordKind::Hypothesis),
                _ => None,
            };
            let model_turn = match &delta {
                StateDelta::TurnAppended(turn) => Some(turn.id),
                _ => None,
            };

            if self.state.reduce(delta) {
                if let Some(kind) = minted {
                    self.telemetry.record(TelemetryEvent::RecordMinted { kind });
                }
                if let Some(turn_id) = model_turn {
                    self.telemetry.record(TelemetryEvent::TurnCompleted { turn_id, outcome });
                }
            }
        }

        self.observe_turns();
    }

    fn observe_turns(&mut self) {
        if self.synthesizer.observe(self.state.store()) {
            self.outstanding += 1;
            self.telemetry.record(TelemetryEvent::Synthesis(SynthesisEventKind::Attempted));
        }
    }

    /// Waits for the next background result without applying it.
    pub async fn next_event(&mut self) -> Option<Event> {
        self.receiver.recv().await
    }

    /// Applies whatever results have already arrived. Never waits.
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.receiver.try_recv() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    /// Applies results until no dispatched call remains outstanding.
    pub async fn settle(&mut self) {
        while self.outstanding > 0 {
            match self.receiver.recv().await {
                Some(event) => self.apply(event),
                None => break,
            }
        }
    }
}
