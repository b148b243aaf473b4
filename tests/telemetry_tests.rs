mod common;

use common::{insight_payload, plain_reply, reactor_with, speculation_payload, ScriptedGateway};
use lens::kernel::telemetry::event::{LifecycleEvent, TelemetryEvent};
use lens::kernel::telemetry::recorder::TelemetryRecorder;
use lens::memory::types::Resolution;
use lens::services::llm::{GatewayError, GatewayMode};
use serde_json::json;

#[tokio::test]
async fn test_session_counters() {
    let gateway = ScriptedGateway::new();
    let mut response = plain_reply("IDENTITY", "Say more about that.");
    response["hasSpeculation"] = json!(true);
    response["speculation"] = speculation_payload();
    response["hasInsight"] = json!(true);
    response["insight"] = insight_payload();
    gateway.push_ok(GatewayMode::TurnProcessing, response.to_string());
    gateway.push_err(GatewayMode::TurnProcessing, GatewayError::Network("reset".to_string()));
    gateway.push_ok(GatewayMode::Recalibration, "Lean on routine");
    let mut reactor = reactor_with(&gateway);

    reactor.submit("");
    reactor.submit("I never tell anyone my plans");
    reactor.settle().await;
    reactor.submit("because they change");
    reactor.settle().await;

    let id = reactor.state.store().hypotheses().nth(0).unwrap().id;
    reactor.resolve_hypothesis(id, Resolution::ConfirmedPrimary);
    reactor.settle().await;
    reactor.stop();

    let snap = reactor.telemetry.snapshot();
    assert_eq!(snap.turn_stats.accepted, 2);
    assert_eq!(snap.turn_stats.rejected, 1);
    assert_eq!(snap.turn_stats.replied, 1);
    assert_eq!(snap.turn_stats.fallbacks, 1);
    assert_eq!(snap.record_stats.hypotheses, 1);
    assert_eq!(snap.record_stats.insights, 1);
    assert_eq!(snap.record_stats.origins, 0);
    assert_eq!(snap.hypothesis_stats.confirmed_primary, 1);
    assert_eq!(snap.hypothesis_stats.adjustments_attached, 1);
    assert!(reactor
        .telemetry
        .events()
        .any(|e| matches!(e, TelemetryEvent::Lifecycle(LifecycleEvent::SessionStopped))));

    match reactor.telemetry.aggregate_session(reactor.state.store()) {
        TelemetryEvent::SessionSummary { turns, insights, origins, hypotheses, fallbacks } => {
            assert_eq!(turns, 4);
            assert_eq!(insights, 1);
            assert_eq!(origins, 0);
            assert_eq!(hypotheses, 1);
            assert_eq!(fallbacks, 1);
        }
        other => panic!("unexpected event {:?}", other),
    }
}

#[tokio::test]
async fn test_events_never_carry_user_text() {
    let gateway = ScriptedGateway::new();
    let mut response = plain_reply("MEANINGFUL", "Reply text stays out of telemetry");
    response["hasSpeculation"] = json!(true);
    response["speculation"] = speculation_payload();
    gateway.push_ok(GatewayMode::TurnProcessing, response.to_string());
    gateway.push_ok(GatewayMode::Recalibration, "Secret adjustment plan");
    let mut reactor = reactor_with(&gateway);

    reactor.submit("My secret confession");
    reactor.settle().await;
    let id = reactor.state.store().hypotheses().nth(0).unwrap().id;
    reactor.resolve_hypothesis(id, Resolution::ConfirmedCompeting);
    reactor.settle().await;

    let serialized: Vec<String> = reactor
        .telemetry
        .events()
        .map(|e| serde_json::to_string(e).unwrap())
        .collect();
    assert!(!serialized.is_empty());
    for line in &serialized {
        assert!(!line.contains("secret confession"));
        assert!(!line.contains("Reply text"));
        assert!(!line.contains("rehearse conversations"));
        assert!(!line.contains("Secret adjustment"));
    }
}

#[test]
fn test_recorder_is_bounded() {
    let mut recorder = TelemetryRecorder::new();
    for _ in 0..10_050 {
        recorder.record(TelemetryEvent::Lifecycle(LifecycleEvent::SessionStopped));
    }
    assert_eq!(recorder.events().count(), 10_000);

    recorder.clear();
    assert_eq!(recorder.events().count(), 0);
}
