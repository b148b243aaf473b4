use serde::{Deserialize, Serialize};

use crate::memory::types::{HypothesisId, Resolution, TurnId};
use crate::planner::types::RejectReason;

// Allowed: IDs, Timestamps, Counts, Enums
// Forbidden: Turn text, hypothesis text, plans, theories

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TelemetryEvent {
    TurnAccepted {
        turn_id: TurnId,
    },

    TurnRejected {
        reason: RejectReason,
    },

    TurnCompleted {
        turn_id: TurnId,
        outcome: TurnOutcomeKind,
    },

    RecordMinted {
        kind: RecordKind,
    },

    HypothesisResolved {
        hypothesis_id: HypothesisId,
        resolution: Resolution,
    },

    Recalibration {
        hypothesis_id: HypothesisId,
        event: RecalibrationEventKind,
    },

    Synthesis(SynthesisEventKind),

    Lifecycle(LifecycleEvent),

    SessionSummary {
        turns: usize,
        insights: usize,
        origins: usize,
        hypotheses: usize,
        fallbacks: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnOutcomeKind {
    Replied,
    FellBack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordKind {
    Insight,
    Origin,
    Hypothesis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecalibrationEventKind {
    Requested,
    Attached,
    Failed,
    Discarded, // Record no longer present
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SynthesisEventKind {
    Attempted,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleEvent {
    SessionStopped,
}
