use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::memory::types::{Classification, ShockLevel};
use crate::services::llm::policy::EMPTY_REPLY;

/// Why a submission was dropped before any state changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    SessionInactive,
    EmptyInput,
    TurnInFlight,
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON array of theories")]
    NotAnArray,
}

/// Hypothesis fields as produced by the gateway; id, status and timestamp are local.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HypothesisDraft {
    pub primary_hypothesis: String,
    pub competing_hypothesis: String,
    pub grounding_signals: Vec<String>,
    pub mechanism_explanation: String,
    pub shock_level: ShockLevel,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightDraft {
    pub pattern: String,
    pub causes: Vec<String>,
    pub shape: String,
    pub contradictions: String,
    pub future_prediction: String,
    pub confidence: f32,
    pub evidence: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OriginDraft {
    pub inference: String,
    pub experiences: Vec<String>,
    pub reasoning: String,
    pub confidence: f32,
}

/// Wire shape. Payloads stay untyped until their flag says they matter.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTurnResponse {
    classification: Classification,
    reply: String,
    has_speculation: bool,
    speculation: Option<Value>,
    has_insight: bool,
    insight: Option<Value>,
    has_origin: bool,
    origin: Option<Value>,
}

/// A decoded turn-processing response.
/// Each optional entity is present only if flagged true AND its payload validated.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    pub classification: Classification,
    pub reply: String,
    pub speculation: Option<HypothesisDraft>,
    pub insight: Option<InsightDraft>,
    pub origin: Option<OriginDraft>,
}

/// What the turn processor hands back to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnReply {
    Decoded(TurnOutcome),
    /// Gateway failed or the response missed a required field.
    Fallback,
}

impl TurnOutcome {
    /// Missing top-level fields are an error; bad payloads are simply dropped.
    pub fn decode(text: &str) -> Result<Self, DecodeError> {
        let raw: RawTurnResponse = serde_json::from_str(strip_code_fence(text))?;

        let reply = if raw.reply.trim().is_empty() {
            EMPTY_REPLY.to_string()
        } else {
            raw.reply
        };

        Ok(Self {
            classification: raw.classification,
            reply,
            speculation: gated::<HypothesisDraft>(raw.has_speculation, raw.speculation, "speculation")
                .filter(HypothesisDraft::is_usable),
            insight: gated::<InsightDraft>(raw.has_insight, raw.insight, "insight")
                .and_then(InsightDraft::normalized),
            origin: gated::<OriginDraft>(raw.has_origin, raw.origin, "origin")
                .and_then(OriginDraft::normalized),
        })
    }
}

fn gated<T: for<'de> Deserialize<'de>>(flag: bool, payload: Option<Value>, kind: &str) -> Option<T> {
    if !flag {
        return None;
    }
    let Some(value) = payload else {
        debug!("{} flagged but absent", kind);
        return None;
    };
    match serde_json::from_value(value) {
        Ok(draft) => Some(draft),
        Err(e) => {
            debug!("{} flagged but invalid: {}", kind, e);
            None
        }
    }
}

fn normalize_confidence(confidence: f32) -> Option<f32> {
    confidence.is_finite().then(|| confidence.clamp(0.0, 1.0))
}

impl HypothesisDraft {
    fn is_usable(&self) -> bool {
        !self.primary_hypothesis.trim().is_empty() && !self.competing_hypothesis.trim().is_empty()
    }
}

impl InsightDraft {
    fn normalized(mut self) -> Option<Self> {
        if self.pattern.trim().is_empty() {
            return None;
        }
        self.confidence = normalize_confidence(self.confidence)?;
        Some(self)
    }
}

impl OriginDraft {
    fn normalized(mut self) -> Option<Self> {
        if self.inference.trim().is_empty() {
            return None;
        }
        self.confidence = normalize_confidence(self.confidence)?;
        Some(self)
    }
}

/// Tolerates a response wrapped in a markdown code fence.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
