use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::kernel::event::Event;
use crate::memory::store::EntityStore;
use crate::memory::types::ProfileTheory;
use crate::planner::types::{strip_code_fence, DecodeError};
use crate::services::llm::policy::SYNTHESIS_INSTRUCTION;
use crate::services::llm::{schema, GatewayMode, GatewayRequest, ReasoningGateway};

/// One-shot latch. Moves to `Attempted` before the request goes out,
/// so a failed attempt still consumes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthesisGuard {
    NotAttempted,
    Attempted,
}

/// Best-effort, once-per-session batch summary of accumulated patterns.
pub struct ProfileSynthesizer {
    gateway: Arc<dyn ReasoningGateway>,
    tx: mpsc::Sender<Event>,
    guard: SynthesisGuard,
    theories: Vec<ProfileTheory>,
    window: usize,
    threshold: usize,
    theory_count: usize,
}

impl ProfileSynthesizer {
    pub fn new(
        gateway: Arc<dyn ReasoningGateway>,
        tx: mpsc::Sender<Event>,
        window: usize,
        threshold: usize,
        theory_count: usize,
    ) -> Self {
        Self {
            gateway,
            tx,
            guard: SynthesisGuard::NotAttempted,
            theories: Vec::new(),
            window,
            threshold,
            theory_count,
        }
    }

    pub fn guard(&self) -> SynthesisGuard {
        self.guard
    }

    pub fn theories(&self) -> &[ProfileTheory] {
        &self.theories
    }

    /// Called whenever the turn collection may have grown.
    /// Returns true if this call dispatched the synthesis request.
    pub fn observe(&mut self, store: &EntityStore) -> bool {
        if self.guard == SynthesisGuard::Attempted || store.turns().len() < self.threshold {
            return false;
        }

        self.guard = SynthesisGuard::Attempted;
        info!("Profile synthesis triggered at {} turns", store.turns().len());

        let request = GatewayRequest::prompt(GatewayMode::ProfileSynthesis, synthesis_prompt(store, self.window))
            .with_schema(schema::profile_synthesis());
        let gateway = Arc::clone(&self.gateway);
        let tx = self.tx.clone();
        let theory_count = self.theory_count;

        tokio::spawn(async move {
            let theories = match gateway.generate(request).await {
                Ok(text) => match decode_theories(&text, theory_count) {
                    Ok(theories) => Some(theories),
                    Err(e) => {
                        error!("Profile synthesis response unusable: {}", e);
                        None
                    }
                },
                Err(e) => {
                    error!("Profile synthesis failed: {}", e);
                    None
                }
            };

            if tx.send(Event::ProfileSynthesized(theories)).await.is_err() {
                warn!("Session gone before synthesis result could be delivered");
            }
        });
        true
    }

    /// Replaces the buffer on success. On failure the buffer stays as it was.
    pub fn accept(&mut self, theories: Option<Vec<ProfileTheory>>) {
        if let Some(theories) = theories {
            debug!("Profile synthesis produced {} theories", theories.len());
            self.theories = theories;
        }
    }
}

/// Last `window` turns plus every accumulated insight pattern.
pub fn synthesis_prompt(store: &EntityStore, window: usize) -> String {
    let turns = store.turns();
    let history = turns
        .iter()
        .skip(turns.len().saturating_sub(window))
        .map(|t| format!("{}: {}", t.role.as_str(), t.content))
        .collect::<Vec<_>>()
        .join("\n");
    let patterns = store
        .insights()
        .iter()
        .map(|i| i.pattern.as_str())
        .collect::<Vec<_>>()
        .join("; ");

    format!(
        "{}\n\nInputs:\nPatterns: {}\nRecent dialogue:\n{}\n\nFormat: JSON array of {{ theory, competing, logic, shockEvidence }}.",
        SYNTHESIS_INSTRUCTION, patterns, history
    )
}

/// Keeps the well-formed entries, at most `count` of them.
pub fn decode_theories(text: &str, count: usize) -> Result<Vec<ProfileTheory>, DecodeError> {
    let body = strip_code_fence(text);
    if body.is_empty() {
        return Ok(Vec::new());
    }

    let Value::Array(items) = serde_json::from_str::<Value>(body)? else {
        return Err(DecodeError::NotAnArray);
    };

    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<ProfileTheory>(item).ok())
        .take(count)
        .collect())
}
