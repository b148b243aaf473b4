use serde_json::{json, Value};

/// Response schema for turn processing.
/// Only the five top-level fields are required; each payload is gated by its flag.
pub fn turn_response() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "classification": {
                "type": "STRING",
                "enum": ["TRIVIAL", "SHALLOW", "MEANINGFUL", "IDENTITY"]
            },
            "reply": { "type": "STRING" },
            "hasSpeculation": { "type": "BOOLEAN" },
            "speculation": {
                "type": "OBJECT",
                "properties": {
                    "primaryHypothesis": { "type": "STRING" },
                    "competingHypothesis": { "type": "STRING" },
                    "groundingSignals": { "type": "ARRAY", "items": { "type": "STRING" } },
                    "mechanismExplanation": { "type": "STRING" },
                    "shockLevel": { "type": "STRING", "enum": ["low", "medium", "high"] }
                },
                "required": [
                    "primaryHypothesis",
                    "competingHypothesis",
                    "groundingSignals",
                    "mechanismExplanation",
                    "shockLevel"
                ]
            },
            "hasInsight": { "type": "BOOLEAN" },
            "insight": {
                "type": "OBJECT",
                "properties": {
                    "pattern": { "type": "STRING" },
                    "causes": { "type": "ARRAY", "items": { "type": "STRING" } },
                    "shape": { "type": "STRING" },
                    "contradictions": { "type": "STRING" },
                    "futurePrediction": { "type": "STRING" },
                    "confidence": { "type": "NUMBER" },
                    "evidence": { "type": "ARRAY", "items": { "type": "STRING" } }
                },
                "required": [
                    "pattern",
                    "causes",
                    "shape",
                    "contradictions",
                    "futurePrediction",
                    "confidence",
                    "evidence"
                ]
            },
            "hasOrigin": { "type": "BOOLEAN" },
            "origin": {
                "type": "OBJECT",
                "properties": {
                    "inference": { "type": "STRING" },
                    "experiences": { "type": "ARRAY", "items": { "type": "STRING" } },
                    "reasoning": { "type": "STRING" },
                    "confidence": { "type": "NUMBER" }
                },
                "required": ["inference", "experiences", "reasoning", "confidence"]
            }
        },
        "required": ["classification", "reply", "hasSpeculation", "hasInsight", "hasOrigin"]
    })
}

/// Response schema for profile synthesis: an array of theory tuples.
pub fn profile_synthesis() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "theory": { "type": "STRING" },
                "competing": { "type": "STRING" },
                "logic": { "type": "STRING" },
                "shockEvidence": { "type": "ARRAY", "items": { "type": "STRING" } }
            },
            "required": ["theory", "competing", "logic", "shockEvidence"]
        }
    })
}
