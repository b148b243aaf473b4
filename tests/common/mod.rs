#![allow(dead_code)]

use async_trait::async_trait;
use lens::config::SessionConfig;
use lens::memory::types::{HypothesisId, HypothesisStatus, ShockLevel, SpeculativeHypothesis};
use lens::services::llm::{GatewayError, GatewayMode, GatewayRequest, ReasoningGateway};
use lens::Reactor;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// In-process gateway: replays queued responses per mode and records every request.
/// An empty queue answers with a network error.
#[derive(Default)]
pub struct ScriptedGateway {
    scripts: Mutex<HashMap<GatewayMode, VecDeque<Result<String, GatewayError>>>>,
    requests: Mutex<Vec<GatewayRequest>>,
}

impl ScriptedGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_ok(&self, mode: GatewayMode, text: impl Into<String>) {
        self.scripts.lock().unwrap().entry(mode).or_default().push_back(Ok(text.into()));
    }

    pub fn push_err(&self, mode: GatewayMode, err: GatewayError) {
        self.scripts.lock().unwrap().entry(mode).or_default().push_back(Err(err));
    }

    pub fn requests(&self) -> Vec<GatewayRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_for(&self, mode: GatewayMode) -> Vec<GatewayRequest> {
        self.requests().into_iter().filter(|r| r.mode == mode).collect()
    }
}

#[async_trait]
impl ReasoningGateway for ScriptedGateway {
    async fn generate(&self, request: GatewayRequest) -> Result<String, GatewayError> {
        let mode = request.mode;
        self.requests.lock().unwrap().push(request);
        self.scripts
            .lock()
            .unwrap()
            .get_mut(&mode)
            .and_then(|queue| queue.pop_front())
            .unwrap_or_else(|| Err(GatewayError::Network("no scripted response".to_string())))
    }
}

pub fn reactor_with(gateway: &Arc<ScriptedGateway>) -> Reactor {
    Reactor::new(gateway.clone(), SessionConfig::default())
}

/// A turn response with every flag false.
pub fn plain_reply(classification: &str, reply: &str) -> Value {
    json!({
        "classification": classification,
        "reply": reply,
        "hasSpeculation": false,
        "hasInsight": false,
        "hasOrigin": false
    })
}

pub fn speculation_payload() -> Value {
    json!({
        "primaryHypothesis": "You rehearse conversations before phone calls",
        "competingHypothesis": "You avoid calls to keep control of timing",
        "groundingSignals": ["hedged phrasing", "late-start preference"],
        "mechanismExplanation": "Control over pacing reduces exposure",
        "shockLevel": "high"
    })
}

pub fn insight_payload() -> Value {
    json!({
        "pattern": "Defers commitments until the last moment",
        "causes": ["fear of being pinned down"],
        "shape": "procrastination as autonomy",
        "contradictions": "Punctual for other people's events",
        "futurePrediction": "Will push back on fixed schedules",
        "confidence": 0.72,
        "evidence": ["mornings", "late starts"]
    })
}

pub fn origin_payload() -> Value {
    json!({
        "inference": "Early schedules were imposed rather than chosen",
        "experiences": ["strict school mornings"],
        "reasoning": "Resistance attaches to imposed timing, not effort",
        "confidence": 0.4
    })
}

pub fn pending_hypothesis() -> SpeculativeHypothesis {
    SpeculativeHypothesis {
        id: HypothesisId::new(),
        primary_hypothesis: "You keep a private list of grudges".to_string(),
        competing_hypothesis: "You forgive fast to avoid revisiting pain".to_string(),
        grounding_signals: vec!["short answers about family".to_string()],
        mechanism_explanation: "Emotional bookkeeping".to_string(),
        shock_level: ShockLevel::Medium,
        status: HypothesisStatus::Pending,
        adjustment_plan: None,
        timestamp: chrono::Utc::now(),
    }
}
