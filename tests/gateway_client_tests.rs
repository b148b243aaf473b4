use lens::config::LensConfig;
use lens::services::llm::client::{extract_text, format_contents, GeminiGateway};
use lens::services::llm::{schema, ContentPart, GatewayError, GatewayMode, GatewayRequest};
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;

fn config_with_key() -> LensConfig {
    LensConfig {
        api_key: Some("test-key".to_string()),
        ..LensConfig::default()
    }
}

#[test]
fn test_consecutive_same_role_entries_are_merged() {
    let contents = vec![
        ContentPart::user("memo"),
        ContentPart::user("hello"),
        ContentPart::model("hi"),
        ContentPart::user("again"),
    ];

    let formatted = format_contents(&contents);

    assert_eq!(formatted.len(), 3);
    assert_eq!(formatted[0]["role"], "user");
    assert_eq!(formatted[0]["parts"], json!([{ "text": "memo" }, { "text": "hello" }]));
    assert_eq!(formatted[1]["role"], "model");
    assert_eq!(formatted[2]["parts"][0]["text"], "again");
}

#[test]
fn test_body_carries_instruction_and_schema_only_when_set() {
    let plain = GatewayRequest::prompt(GatewayMode::Recalibration, "adjust");
    let body = GeminiGateway::build_body(&plain);
    assert!(body.get("systemInstruction").is_none());
    assert!(body.get("generationConfig").is_none());
    assert_eq!(body["contents"][0]["parts"][0]["text"], "adjust");

    let mut structured = GatewayRequest::prompt(GatewayMode::TurnProcessing, "hello")
        .with_schema(schema::turn_response());
    structured.system_instruction = Some("policy".to_string());
    let body = GeminiGateway::build_body(&structured);
    assert_eq!(body["systemInstruction"]["parts"][0]["text"], "policy");
    assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
    assert!(body["generationConfig"]["responseSchema"].is_object());
}

#[test]
fn test_extract_text_skips_thought_parts() {
    let raw = json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [
                    { "text": "thinking...", "thought": true },
                    { "text": "{\"a\":" },
                    { "text": "1}" }
                ]
            }
        }]
    })
    .to_string();

    assert_eq!(extract_text(&raw).unwrap(), "{\"a\":1}");
}

#[test]
fn test_extract_text_failures() {
    assert!(matches!(extract_text("{\"candidates\": []}"), Err(GatewayError::EmptyResponse)));
    assert!(matches!(extract_text("{}"), Err(GatewayError::EmptyResponse)));
    assert!(matches!(extract_text("<html>"), Err(GatewayError::Parse(_))));
    // A candidate without content yields empty text, not an error.
    assert_eq!(extract_text("{\"candidates\": [{}]}").unwrap(), "");
}

#[test]
fn test_gateway_requires_api_key() {
    let result = GeminiGateway::new(&LensConfig::default());
    assert!(matches!(result, Err(GatewayError::MissingApiKey)));
}

#[test]
fn test_model_selection_per_mode() {
    let gateway = GeminiGateway::new(&config_with_key()).unwrap();
    assert_eq!(gateway.model_for(GatewayMode::TurnProcessing), "gemini-3-flash-preview");
    assert_eq!(gateway.model_for(GatewayMode::Recalibration), "gemini-3-flash-preview");
    assert_eq!(gateway.model_for(GatewayMode::ProfileSynthesis), "gemini-3-pro-preview");
}

#[test]
fn test_config_from_lookup() {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("API_KEY", "fallback-key"),
        ("LENS_TURN_MODEL", "custom-flash"),
        ("LENS_SYNTHESIS_MODEL", "   "),
        ("LENS_TIMEOUT_SECS", "5"),
    ]);
    let config = LensConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));

    assert_eq!(config.api_key.as_deref(), Some("fallback-key"));
    assert_eq!(config.turn_model, "custom-flash");
    assert_eq!(config.synthesis_model, "gemini-3-pro-preview");
    assert_eq!(config.request_timeout, Duration::from_secs(5));

    let preferred = HashMap::from([("GEMINI_API_KEY", "primary"), ("API_KEY", "secondary")]);
    let config = LensConfig::from_lookup(|k| preferred.get(k).map(|v| v.to_string()));
    assert_eq!(config.api_key.as_deref(), Some("primary"));
    assert_eq!(config.request_timeout, Duration::from_secs(30));
}
