use crate::memory::store::EntityStore;
use crate::memory::types::Turn;
use crate::services::llm::policy::{CONFIRMED_MEMO_HEADER, CONFIRMED_MEMO_ITEM, TURN_POLICY};
use crate::services::llm::{schema, ContentPart, GatewayMode, GatewayRequest};

/// Synthetic leading turn listing every confirmed hypothesis, so the
/// reasoning service treats them as settled.
pub fn confirmed_memo(store: &EntityStore) -> ContentPart {
    let lines: Vec<String> = store
        .confirmed_hypotheses()
        .filter_map(|h| h.confirmed_text())
        .map(|text| format!("{} {}", CONFIRMED_MEMO_ITEM, text))
        .collect();

    ContentPart::user(format!("{}\n{}", CONFIRMED_MEMO_HEADER, lines.join("\n")))
}

/// Memo, then up to `window` turns preceding `new_turn`, then `new_turn` itself.
pub fn build_turn_request(store: &EntityStore, new_turn: &Turn, window: usize) -> GatewayRequest {
    let prior: Vec<&Turn> = store.turns().iter().filter(|t| t.id != new_turn.id).collect();
    let start = prior.len().saturating_sub(window);

    let mut contents = Vec::with_capacity(prior.len() - start + 2);
    contents.push(confirmed_memo(store));
    contents.extend(prior[start..].iter().map(|t| ContentPart {
        role: t.role,
        text: t.content.clone(),
    }));
    contents.push(ContentPart::user(new_turn.content.clone()));

    GatewayRequest {
        mode: GatewayMode::TurnProcessing,
        system_instruction: Some(TURN_POLICY.to_string()),
        contents,
        response_schema: Some(schema::turn_response()),
    }
}
