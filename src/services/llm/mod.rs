//! Reasoning gateway boundary.
//!
//! The session core only ever talks to `dyn ReasoningGateway`: a structured
//! request goes in, raw response text comes out. Decoding is the caller's job.

pub mod client;
pub mod policy;
pub mod schema;

use crate::memory::types::Role;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Which of the three independent call shapes a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum GatewayMode {
    TurnProcessing,
    Recalibration,
    ProfileSynthesis,
}

impl GatewayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GatewayMode::TurnProcessing => "turn",
            GatewayMode::Recalibration => "recalibration",
            GatewayMode::ProfileSynthesis => "synthesis",
        }
    }
}

/// One role-tagged entry of the conversation sent to the gateway.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentPart {
    pub role: Role,
    pub text: String,
}

impl ContentPart {
    pub fn user(text: impl Into<String>) -> Self {
        Self { role: Role::User, text: text.into() }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self { role: Role::Model, text: text.into() }
    }
}

#[derive(Debug, Clone)]
pub struct GatewayRequest {
    pub mode: GatewayMode,
    pub system_instruction: Option<String>,
    pub contents: Vec<ContentPart>,
    /// When set, the response must be JSON conforming to this schema.
    pub response_schema: Option<Value>,
}

impl GatewayRequest {
    /// Single free-text prompt, plain text back.
    pub fn prompt(mode: GatewayMode, text: impl Into<String>) -> Self {
        Self {
            mode,
            system_instruction: None,
            contents: vec![ContentPart::user(text)],
            response_schema: None,
        }
    }

    pub fn with_schema(mut self, schema: Value) -> Self {
        self.response_schema = Some(schema);
        self
    }
}

/// Failures at the gateway call boundary.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("API key not configured")]
    MissingApiKey,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Response carried no candidates")]
    EmptyResponse,
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GatewayError::Timeout
        } else if e.is_decode() {
            GatewayError::Parse(e.to_string())
        } else {
            GatewayError::Network(e.to_string())
        }
    }
}

/// The external reasoning service.
#[async_trait]
pub trait ReasoningGateway: Send + Sync {
    /// Issue one request. Fire-once: implementations must not retry.
    async fn generate(&self, request: GatewayRequest) -> Result<String, GatewayError>;
}
