use std::collections::VecDeque;
use super::event::{
    TelemetryEvent, TurnOutcomeKind, RecordKind, RecalibrationEventKind, SynthesisEventKind,
};
use crate::memory::types::Resolution;

#[derive(Debug, Clone, Default)]
pub struct TelemetrySnapshot {
    pub turn_stats: TurnStats,
    pub record_stats: RecordStats,
    pub hypothesis_stats: HypothesisStats,
    pub synthesis_stats: SynthesisStats,
}

#[derive(Debug, Clone, Default)]
pub struct TurnStats {
    pub accepted: u64,
    pub rejected: u64,
    pub replied: u64,
    pub fallbacks: u64,
}

#[derive(Debug, Clone, Default)]
pub struct RecordStats {
    pub insights: u64,
    pub origins: u64,
    pub hypotheses: u64,
}

#[derive(Debug, Clone, Default)]
pub struct HypothesisStats {
    pub confirmed_primary: u64,
    pub confirmed_competing: u64,
    pub rejected: u64,
    pub recalibrations_requested: u64,
    pub adjustments_attached: u64,
    pub recalibrations_failed: u64,
    pub adjustments_discarded: u64,
}

#[derive(Debug, Clone, Default)]
pub struct SynthesisStats {
    pub attempted: u64,
    pub completed: u64,
    pub failed: u64,
}

pub fn compute_snapshot(events: &VecDeque<TelemetryEvent>) -> TelemetrySnapshot {
    let mut snap = TelemetrySnapshot::default();

    for event in events {
        match event {
            TelemetryEvent::TurnAccepted { .. } => snap.turn_stats.accepted += 1,
            TelemetryEvent::TurnRejected { .. } => snap.turn_stats.rejected += 1,
            TelemetryEvent::TurnCompleted { outcome, .. } => match outcome {
                TurnOutcomeKind::Replied => snap.turn_stats.replied += 1,
                TurnOutcomeKind::FellBack => snap.turn_stats.fallbacks += 1,
            },
            TelemetryEvent::RecordMinted { kind } => match kind {
                RecordKind::Insight => snap.record_stats.insights += 1,
                RecordKind::Origin => snap.record_stats.origins += 1,
                RecordKind::Hypothesis => snap.record_stats.hypotheses += 1,
            },
            TelemetryEvent::HypothesisResolved { resolution, .. } => match resolution {
                Resolution::ConfirmedPrimary => snap.hypothesis_stats.confirmed_primary += 1,
                Resolution::ConfirmedCompeting => snap.hypothesis_stats.confirmed_competing += 1,
                Resolution::RejectedAll => snap.hypothesis_stats.rejected += 1,
            },
            TelemetryEvent::Recalibration { event, .. } => match event {
                RecalibrationEventKind::Requested => snap.hypothesis_stats.recalibrations_requested += 1,
                RecalibrationEventKind::Attached => snap.hypothesis_stats.adjustments_attached += 1,
                RecalibrationEventKind::Failed => snap.hypothesis_stats.recalibrations_failed += 1,
                RecalibrationEventKind::Discarded => snap.hypothesis_stats.adjustments_discarded += 1,
            },
            TelemetryEvent::Synthesis(kind) => match kind {
                SynthesisEventKind::Attempted => snap.synthesis_stats.attempted += 1,
                SynthesisEventKind::Completed => snap.synthesis_stats.completed += 1,
                SynthesisEventKind::Failed => snap.synthesis_stats.failed += 1,
            },
            TelemetryEvent::Lifecycle(_) | TelemetryEvent::SessionSummary { .. } => {}
        }
    }

    snap
}
