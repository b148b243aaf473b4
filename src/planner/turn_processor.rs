use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use crate::kernel::event::Event;
use crate::kernel::state::{SessionState, StateDelta};
use crate::memory::types::{
    HypothesisId, HypothesisStatus, InsightId, InsightRecord, InsightStatus, OriginEntry, OriginId,
    OriginStatus, SpeculativeHypothesis, Turn,
};
use crate::planner::context::build_turn_request;
use crate::planner::types::{RejectReason, TurnOutcome, TurnReply};
use crate::services::llm::policy::FALLBACK_REPLY;
use crate::services::llm::{GatewayError, ReasoningGateway};

/// Runs one user utterance through the reasoning gateway.
pub struct TurnProcessor {
    gateway: Arc<dyn ReasoningGateway>,
    tx: mpsc::Sender<Event>,
    context_window: usize,
}

impl TurnProcessor {
    pub fn new(gateway: Arc<dyn ReasoningGateway>, tx: mpsc::Sender<Event>, context_window: usize) -> Self {
        Self { gateway, tx, context_window }
    }

    /// Input gate. Rejected input must leave the session untouched.
    pub fn admit(state: &SessionState, text: &str) -> Result<(), RejectReason> {
        if !state.active {
            return Err(RejectReason::SessionInactive);
        }
        if text.trim().is_empty() {
            return Err(RejectReason::EmptyInput);
        }
        if state.turn_in_flight {
            return Err(RejectReason::TurnInFlight);
        }
        Ok(())
    }

    /// Appends the user turn, marks the call in flight and dispatches the request.
    /// The caller must already have passed `admit`.
    pub fn begin(&self, state: &mut SessionState, text: &str) -> Turn {
        let turn = Turn::user(text);
        state.reduce(StateDelta::TurnAppended(turn.clone()));
        state.reduce(StateDelta::TurnDispatched);

        self.dispatch(state, &turn);
        turn
    }

    fn dispatch(&self, state: &SessionState, turn: &Turn) {
        let request = build_turn_request(state.store(), turn, self.context_window);
        let gateway = Arc::clone(&self.gateway);
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let reply = match gateway.generate(request).await {
                Ok(text) => match TurnOutcome::decode(&text) {
                    Ok(outcome) => TurnReply::Decoded(outcome),
                    Err(e) => {
                        let e = GatewayError::Parse(e.to_string());
                        error!("Turn processing failed: {}", e);
                        TurnReply::Fallback
                    }
                },
                Err(e) => {
                    error!("Turn processing failed: {}", e);
                    TurnReply::Fallback
                }
            };

            if tx.send(Event::TurnProcessed(reply)).await.is_err() {
                warn!("Session gone before turn result could be delivered");
            }
        });
    }

    /// Pure projection: reply -> deltas. Exactly one model turn, then any minted records.
    pub fn complete(reply: TurnReply) -> Vec<StateDelta> {
        let mut deltas = vec![StateDelta::TurnSettled];

        let outcome = match reply {
            TurnReply::Fallback => {
                deltas.push(StateDelta::TurnAppended(Turn::model(FALLBACK_REPLY, None)));
                return deltas;
            }
            TurnReply::Decoded(outcome) => outcome,
        };

        deltas.push(StateDelta::TurnAppended(Turn::model(outcome.reply, Some(outcome.classification))));

        if let Some(draft) = outcome.speculation {
            deltas.push(StateDelta::HypothesisMinted(SpeculativeHypothesis {
                id: HypothesisId::new(),
                primary_hypothesis: draft.primary_hypothesis,
                competing_hypothesis: draft.competing_hypothesis,
                grounding_signals: draft.grounding_signals,
                mechanism_explanation: draft.mechanism_explanation,
                shock_level: draft.shock_level,
                status: HypothesisStatus::Pending,
                adjustment_plan: None,
                timestamp: Utc::now(),
            }));
        }

        if let Some(draft) = outcome.insight {
            deltas.push(StateDelta::InsightMinted(InsightRecord {
                id: InsightId::new(),
                pattern: draft.pattern,
                causes: draft.causes,
                shape: draft.shape,
                contradictions: draft.contradictions,
                future_prediction: draft.future_prediction,
                confidence: draft.confidence,
                evidence: draft.evidence,
                status: InsightStatus::Pending,
            }));
        }

        if let Some(draft) = outcome.origin {
            deltas.push(StateDelta::OriginMinted(OriginEntry {
                id: OriginId::new(),
                inference: draft.inference,
                experiences: draft.experiences,
                reasoning: draft.reasoning,
                confidence: draft.confidence,
                status: OriginStatus::Pending,
            }));
        }

        debug!("Turn completed with {} deltas", deltas.len());
        deltas
    }
}
