use crate::memory::types::{HypothesisId, ProfileTheory};
use crate::planner::types::TurnReply;

/// Results of background gateway calls, delivered back to the reactor.
/// Every dispatched call produces exactly one event.
#[derive(Debug, Clone)]
pub enum Event {
    TurnProcessed(TurnReply),
    /// Keyed by id; the reactor checks the record still exists before writing.
    AdjustmentReady { id: HypothesisId, plan: String },
    AdjustmentFailed { id: HypothesisId },
    /// `None` when the synthesis call or its decoding failed.
    ProfileSynthesized(Option<Vec<ProfileTheory>>),
}
