mod common;

use common::{plain_reply, reactor_with, ScriptedGateway};
use lens::kernel::state::{SessionState, StateDelta};
use lens::memory::types::{InsightId, InsightRecord, InsightStatus, Turn};
use lens::planner::types::DecodeError;
use lens::services::llm::{GatewayError, GatewayMode};
use lens::synthesis::{decode_theories, synthesis_prompt, SynthesisGuard};
use lens::Reactor;
use serde_json::json;

fn script_turns(gateway: &ScriptedGateway, count: usize) {
    for i in 0..count {
        gateway.push_ok(GatewayMode::TurnProcessing, plain_reply("SHALLOW", &format!("reply {}", i)).to_string());
    }
}

async fn exchange(reactor: &mut Reactor, text: &str) {
    reactor.submit(text);
    reactor.settle().await;
}

fn theories_json(count: usize) -> String {
    let items: Vec<_> = (0..count)
        .map(|i| {
            json!({
                "theory": format!("theory {}", i),
                "competing": format!("competing {}", i),
                "logic": "because",
                "shockEvidence": ["signal"]
            })
        })
        .collect();
    serde_json::Value::Array(items).to_string()
}

#[tokio::test]
async fn test_four_turns_do_not_trigger() {
    let gateway = ScriptedGateway::new();
    script_turns(&gateway, 2);
    let mut reactor = reactor_with(&gateway);

    exchange(&mut reactor, "one").await;
    exchange(&mut reactor, "two").await;

    assert_eq!(reactor.state.store().turns().len(), 4);
    assert_eq!(reactor.synthesizer().guard(), SynthesisGuard::NotAttempted);
    assert!(gateway.requests_for(GatewayMode::ProfileSynthesis).is_empty());
}

#[tokio::test]
async fn test_fifth_turn_triggers_exactly_once() {
    let gateway = ScriptedGateway::new();
    script_turns(&gateway, 5);
    gateway.push_ok(GatewayMode::ProfileSynthesis, theories_json(3));
    let mut reactor = reactor_with(&gateway);

    for text in ["one", "two", "three", "four", "five"] {
        exchange(&mut reactor, text).await;
    }

    assert_eq!(reactor.state.store().turns().len(), 10);
    assert_eq!(reactor.synthesizer().guard(), SynthesisGuard::Attempted);
    assert_eq!(gateway.requests_for(GatewayMode::ProfileSynthesis).len(), 1);
    assert_eq!(reactor.synthesizer().theories().len(), 3);
    assert_eq!(reactor.synthesizer().theories()[0].theory, "theory 0");

    let request = &gateway.requests_for(GatewayMode::ProfileSynthesis)[0];
    assert!(request.response_schema.is_some());
    // Dispatched when the fifth turn (the third user turn) landed.
    assert!(request.contents[0].text.contains("user: three"));
    assert!(!request.contents[0].text.contains("reply 2"));
}

#[tokio::test]
async fn test_failed_synthesis_consumes_the_latch() {
    let gateway = ScriptedGateway::new();
    script_turns(&gateway, 4);
    gateway.push_err(GatewayMode::ProfileSynthesis, GatewayError::Timeout);
    gateway.push_ok(GatewayMode::ProfileSynthesis, theories_json(1));
    let mut reactor = reactor_with(&gateway);

    for text in ["one", "two", "three", "four"] {
        exchange(&mut reactor, text).await;
    }

    assert_eq!(reactor.synthesizer().guard(), SynthesisGuard::Attempted);
    assert!(reactor.synthesizer().theories().is_empty());
    assert_eq!(gateway.requests_for(GatewayMode::ProfileSynthesis).len(), 1, "No retry after failure");

    let stats = reactor.telemetry.snapshot().synthesis_stats;
    assert_eq!(stats.attempted, 1);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.completed, 0);
}

#[tokio::test]
async fn test_oversized_result_is_truncated() {
    let gateway = ScriptedGateway::new();
    script_turns(&gateway, 3);
    gateway.push_ok(GatewayMode::ProfileSynthesis, theories_json(5));
    let mut reactor = reactor_with(&gateway);

    for text in ["one", "two", "three"] {
        exchange(&mut reactor, text).await;
    }

    let theories = reactor.synthesizer().theories();
    assert_eq!(theories.len(), 3);
    assert_eq!(theories[2].theory, "theory 2");
}

#[tokio::test]
async fn test_stop_checks_the_threshold_again() {
    let gateway = ScriptedGateway::new();
    script_turns(&gateway, 1);
    let mut reactor = reactor_with(&gateway);

    exchange(&mut reactor, "one").await;
    reactor.stop();

    assert_eq!(reactor.synthesizer().guard(), SynthesisGuard::NotAttempted);
    assert_eq!(reactor.outstanding(), 0);
}

#[test]
fn test_prompt_holds_recent_turns_and_patterns() {
    let mut state = SessionState::new();
    for i in 0..25 {
        state.reduce(StateDelta::TurnAppended(Turn::user(format!("line {}", i))));
    }
    state.reduce(StateDelta::InsightMinted(InsightRecord {
        id: InsightId::new(),
        pattern: "Avoids fixed commitments".to_string(),
        causes: vec![],
        shape: "autonomy".to_string(),
        contradictions: "none".to_string(),
        future_prediction: "more deferral".to_string(),
        confidence: 0.6,
        evidence: vec![],
        status: InsightStatus::Pending,
    }));

    let prompt = synthesis_prompt(state.store(), 20);

    assert!(prompt.contains("Avoids fixed commitments"));
    assert!(prompt.contains("user: line 24"));
    assert!(prompt.contains("user: line 5\n"));
    assert!(!prompt.contains("user: line 4\n"));
}

#[test]
fn test_decode_skips_malformed_items() {
    let text = json!([
        { "theory": "a", "competing": "b", "logic": "c", "shockEvidence": [] },
        { "theory": "missing the rest" },
        { "theory": "d", "competing": "e", "logic": "f", "shockEvidence": ["g"] }
    ])
    .to_string();

    let theories = decode_theories(&text, 3).unwrap();
    assert_eq!(theories.len(), 2);
    assert_eq!(theories[1].shock_evidence, vec!["g".to_string()]);
}

#[test]
fn test_decode_edge_cases() {
    assert!(decode_theories("", 3).unwrap().is_empty());
    assert!(decode_theories("[]", 3).unwrap().is_empty());
    assert!(matches!(decode_theories("{\"theory\": \"x\"}", 3), Err(DecodeError::NotAnArray)));
    assert!(matches!(decode_theories("not json", 3), Err(DecodeError::Json(_))));

    let fenced = format!("```json\n{}\n```", theories_json(2));
    assert_eq!(decode_theories(&fenced, 3).unwrap().len(), 2);
}
