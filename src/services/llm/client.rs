use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use super::{ContentPart, GatewayError, GatewayMode, GatewayRequest, ReasoningGateway};
use crate::config::LensConfig;

/// Gemini `generateContent` client.
#[derive(Clone)]
pub struct GeminiGateway {
    client: Client,
    base_url: String,
    api_key: String,
    turn_model: String,
    synthesis_model: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

impl GeminiGateway {
    pub fn new(config: &LensConfig) -> Result<Self, GatewayError> {
        let api_key = config.api_key.clone().ok_or(GatewayError::MissingApiKey)?;
        let client = Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .timeout(config.request_timeout) // Network-level hard timeout
            .build()
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            turn_model: config.turn_model.clone(),
            synthesis_model: config.synthesis_model.clone(),
        })
    }

    pub fn model_for(&self, mode: GatewayMode) -> &str {
        match mode {
            GatewayMode::TurnProcessing | GatewayMode::Recalibration => &self.turn_model,
            GatewayMode::ProfileSynthesis => &self.synthesis_model,
        }
    }

    /// Request body for `generateContent`.
    pub fn build_body(request: &GatewayRequest) -> Value {
        let mut body = json!({
            "contents": format_contents(&request.contents),
        });

        if let Some(system) = &request.system_instruction {
            body["systemInstruction"] = json!({ "parts": [{ "text": system }] });
        }
        if let Some(schema) = &request.response_schema {
            body["generationConfig"] = json!({
                "responseMimeType": "application/json",
                "responseSchema": schema,
            });
        }
        body
    }
}

/// Gemini needs alternating roles, so consecutive same-role entries are merged.
pub fn format_contents(contents: &[ContentPart]) -> Vec<Value> {
    let mut merged: Vec<(&str, Vec<Value>)> = Vec::new();
    for part in contents {
        let role = part.role.as_str();
        let text = json!({ "text": part.text });
        match merged.last_mut() {
            Some((last_role, parts)) if *last_role == role => parts.push(text),
            _ => merged.push((role, vec![text])),
        }
    }
    merged
        .into_iter()
        .map(|(role, parts)| json!({ "role": role, "parts": parts }))
        .collect()
}

/// Concatenates the non-thought text parts of the first candidate.
pub fn extract_text(raw: &str) -> Result<String, GatewayError> {
    let response: GenerateResponse =
        serde_json::from_str(raw).map_err(|e| GatewayError::Parse(e.to_string()))?;
    let candidate = response.candidates.into_iter().next().ok_or(GatewayError::EmptyResponse)?;

    let text = candidate
        .content
        .map(|c| {
            c.parts
                .into_iter()
                .filter(|p| !p.thought)
                .filter_map(|p| p.text)
                .collect::<String>()
        })
        .unwrap_or_default();
    Ok(text)
}

#[async_trait]
impl ReasoningGateway for GeminiGateway {
    async fn generate(&self, request: GatewayRequest) -> Result<String, GatewayError> {
        let model = self.model_for(request.mode);
        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        let body = Self::build_body(&request);

        info!("Gateway request mode={} model={}", request.mode.as_str(), model);

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let raw = response.text().await?;
        if !status.is_success() {
            return Err(GatewayError::Api { status: status.as_u16(), message: raw });
        }

        let text = extract_text(&raw)?;
        debug!("Gateway response mode={} bytes={}", request.mode.as_str(), text.len());
        Ok(text)
    }
}
