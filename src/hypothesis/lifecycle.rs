use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::kernel::event::Event;
use crate::kernel::state::{SessionState, StateDelta};
use crate::memory::types::{HypothesisId, HypothesisStatus, Resolution, SpeculativeHypothesis};
use crate::services::llm::policy::{DEFAULT_ADJUSTMENT, RECALIBRATION_INSTRUCTION};
use crate::services::llm::{GatewayMode, GatewayRequest, ReasoningGateway};

/// What `resolve` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveOutcome {
    UnknownId,
    /// Already terminal; nothing changed, nothing dispatched.
    AlreadyResolved(HypothesisStatus),
    Resolved { recalibrating: bool },
}

/// Owns the pending -> terminal transition and the follow-up recalibration call.
pub struct HypothesisLifecycle {
    gateway: Arc<dyn ReasoningGateway>,
    tx: mpsc::Sender<Event>,
}

impl HypothesisLifecycle {
    pub fn new(gateway: Arc<dyn ReasoningGateway>, tx: mpsc::Sender<Event>) -> Self {
        Self { gateway, tx }
    }

    /// Applies the status immediately, then (for confirmations) detaches a recalibration.
    /// The status change never depends on the recalibration outcome.
    pub fn resolve(&self, state: &mut SessionState, id: HypothesisId, resolution: Resolution) -> ResolveOutcome {
        let Some(hypothesis) = state.store().hypotheses().get(id) else {
            warn!("Resolution for unknown hypothesis {}", id);
            return ResolveOutcome::UnknownId;
        };
        if hypothesis.status.is_terminal() {
            info!("Hypothesis {} already {}", id, hypothesis.status.as_str());
            return ResolveOutcome::AlreadyResolved(hypothesis.status);
        }

        let status = HypothesisStatus::from(resolution);
        state.reduce(StateDelta::HypothesisResolved { id, status });

        if !resolution.is_confirmation() {
            return ResolveOutcome::Resolved { recalibrating: false };
        }

        // Read back after the transition so the prompt carries the new status.
        match state.store().hypotheses().get(id) {
            Some(resolved) => {
                self.dispatch_recalibration(resolved);
                ResolveOutcome::Resolved { recalibrating: true }
            }
            None => ResolveOutcome::Resolved { recalibrating: false },
        }
    }

    fn dispatch_recalibration(&self, hypothesis: &SpeculativeHypothesis) {
        let id = hypothesis.id;
        let request = GatewayRequest::prompt(GatewayMode::Recalibration, recalibration_prompt(hypothesis));
        let gateway = Arc::clone(&self.gateway);
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let event = match gateway.generate(request).await {
                Ok(text) => {
                    let plan = if text.trim().is_empty() {
                        DEFAULT_ADJUSTMENT.to_string()
                    } else {
                        text
                    };
                    Event::AdjustmentReady { id, plan }
                }
                Err(e) => {
                    error!("Recalibration for {} failed: {}", id, e);
                    Event::AdjustmentFailed { id }
                }
            };

            if tx.send(event).await.is_err() {
                warn!("Session gone before recalibration for {} could be delivered", id);
            }
        });
    }

    /// Writes a delivered plan, but only onto a record that still exists.
    pub fn accept_adjustment(state: &mut SessionState, id: HypothesisId, plan: String) -> bool {
        if !state.store().hypotheses().contains(id) {
            warn!("Discarding adjustment for vanished hypothesis {}", id);
            return false;
        }
        state.reduce(StateDelta::AdjustmentAttached { id, plan })
    }
}

pub fn recalibration_prompt(hypothesis: &SpeculativeHypothesis) -> String {
    format!(
        "Calibration feedback received.\nHypothesis: {}\nCompeting hypothesis: {}\nConfirmed: {}\nStatus: {}\nGrounding: {}\n\n{}",
        hypothesis.primary_hypothesis,
        hypothesis.competing_hypothesis,
        hypothesis.confirmed_text().unwrap_or("none"),
        hypothesis.status.as_str(),
        hypothesis.grounding_signals.join(", "),
        RECALIBRATION_INSTRUCTION,
    )
}
