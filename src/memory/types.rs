use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a conversational turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TurnId(pub Uuid);

impl TurnId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InsightId(pub Uuid);

impl InsightId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OriginId(pub Uuid);

impl OriginId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HypothesisId(pub Uuid);

impl HypothesisId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for TurnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "turn-{}", self.0)
    }
}

impl fmt::Display for InsightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "insight-{}", self.0)
    }
}

impl fmt::Display for OriginId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "origin-{}", self.0)
    }
}

impl fmt::Display for HypothesisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "spec-{}", self.0)
    }
}

/// Who authored a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    /// Role tag used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

/// Personal-disclosure depth of a model turn.
/// Ordering is for display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Classification {
    Trivial,    // Greetings, demographic hints at most
    Shallow,    // Surface details
    Meaningful, // Preferences, emotions, judgments
    Identity,   // Formative events, core triggers, conflicts
}

impl Classification {
    pub const ALL: [Classification; 4] = [
        Classification::Trivial,
        Classification::Shallow,
        Classification::Meaningful,
        Classification::Identity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Trivial => "TRIVIAL",
            Classification::Shallow => "SHALLOW",
            Classification::Meaningful => "MEANINGFUL",
            Classification::Identity => "IDENTITY",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One exchange unit. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub id: TurnId,
    pub role: Role,
    pub content: String,
    /// Only ever set on model turns.
    pub classification: Option<Classification>,
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: TurnId::new(),
            role: Role::User,
            content: content.into(),
            classification: None,
            timestamp: Utc::now(),
        }
    }

    pub fn model(content: impl Into<String>, classification: Option<Classification>) -> Self {
        Self {
            id: TurnId::new(),
            role: Role::Model,
            content: content.into(),
            classification,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightStatus {
    Pending,
    Agreed,
    Disagreed,
}

/// A recurring behavioral pattern detected across turns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightRecord {
    pub id: InsightId,
    pub pattern: String,
    pub causes: Vec<String>,
    pub shape: String,
    pub contradictions: String,
    pub future_prediction: String,
    pub confidence: f32, // 0.0 - 1.0
    pub evidence: Vec<String>,
    pub status: InsightStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OriginStatus {
    Pending,
    Confirmed,
    Rejected,
}

/// Causal inference linking a pattern to a formative experience.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OriginEntry {
    pub id: OriginId,
    pub inference: String,
    pub experiences: Vec<String>,
    pub reasoning: String,
    pub confidence: f32, // 0.0 - 1.0
    pub status: OriginStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShockLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HypothesisStatus {
    Pending,
    ConfirmedPrimary,
    ConfirmedCompeting,
    RejectedAll,
}

impl HypothesisStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, HypothesisStatus::Pending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HypothesisStatus::Pending => "pending",
            HypothesisStatus::ConfirmedPrimary => "confirmed_primary",
            HypothesisStatus::ConfirmedCompeting => "confirmed_competing",
            HypothesisStatus::RejectedAll => "rejected_all",
        }
    }
}

/// The three terminal outcomes a user can pick for a hypothesis.
/// Keeps `Pending` out of the resolution API entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    ConfirmedPrimary,
    ConfirmedCompeting,
    RejectedAll,
}

impl Resolution {
    pub fn is_confirmation(&self) -> bool {
        !matches!(self, Resolution::RejectedAll)
    }
}

impl From<Resolution> for HypothesisStatus {
    fn from(r: Resolution) -> Self {
        match r {
            Resolution::ConfirmedPrimary => HypothesisStatus::ConfirmedPrimary,
            Resolution::ConfirmedCompeting => HypothesisStatus::ConfirmedCompeting,
            Resolution::RejectedAll => HypothesisStatus::RejectedAll,
        }
    }
}

/// A pair of competing off-topic claims about the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeculativeHypothesis {
    pub id: HypothesisId,
    pub primary_hypothesis: String,
    pub competing_hypothesis: String,
    pub grounding_signals: Vec<String>,
    pub mechanism_explanation: String,
    pub shock_level: ShockLevel,
    pub status: HypothesisStatus,
    /// Present only after a confirmed resolution and a successful recalibration.
    pub adjustment_plan: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl SpeculativeHypothesis {
    /// The side the user confirmed, if any.
    pub fn confirmed_text(&self) -> Option<&str> {
        match self.status {
            HypothesisStatus::ConfirmedPrimary => Some(&self.primary_hypothesis),
            HypothesisStatus::ConfirmedCompeting => Some(&self.competing_hypothesis),
            _ => None,
        }
    }
}

/// Batch output of profile synthesis. Has no id and never enters the entity store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileTheory {
    pub theory: String,
    pub competing: String,
    pub logic: String,
    pub shock_evidence: Vec<String>,
}
