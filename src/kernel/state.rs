use crate::memory::store::EntityStore;
use crate::memory::types::{
    Classification, HypothesisId, HypothesisStatus, InsightId, InsightRecord, InsightStatus,
    OriginEntry, OriginId, OriginStatus, Role, SpeculativeHypothesis, Turn,
};

/// Strict state delta. This is the ONLY way session state mutates.
#[derive(Debug, Clone)]
pub enum StateDelta {
    TurnAppended(Turn),
    InsightMinted(InsightRecord),
    OriginMinted(OriginEntry),
    HypothesisMinted(SpeculativeHypothesis),
    InsightStatusChanged { id: InsightId, status: InsightStatus },
    OriginStatusChanged { id: OriginId, status: OriginStatus },
    HypothesisResolved { id: HypothesisId, status: HypothesisStatus },
    AdjustmentAttached { id: HypothesisId, plan: String },
    TurnDispatched,
    TurnSettled,
    SessionStopped,
}

/// Explicit session context: the entity store plus the few flags the core gates on.
#[derive(Debug, Clone)]
pub struct SessionState {
    store: EntityStore,
    pub active: bool,
    /// At most one turn-processing call per session.
    pub turn_in_flight: bool,
    pub last_classification: Option<Classification>,
    /// Monotonic, bumped on every applied delta.
    pub version: u64,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            store: EntityStore::new(),
            active: true,
            turn_in_flight: false,
            last_classification: None,
            version: 0,
        }
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    /// Applies a delta. Returns false when the store refused it (duplicate or unknown id).
    pub fn reduce(&mut self, delta: StateDelta) -> bool {
        let applied = match delta {
            StateDelta::TurnAppended(turn) => {
                let classification = match turn.role {
                    Role::Model => turn.classification,
                    Role::User => None,
                };
                let applied = self.store.append_turn(turn);
                if applied && classification.is_some() {
                    self.last_classification = classification;
                }
                applied
            }
            StateDelta::InsightMinted(insight) => self.store.append_insight(insight),
            StateDelta::OriginMinted(origin) => self.store.append_origin(origin),
            StateDelta::HypothesisMinted(hypothesis) => self.store.append_hypothesis(hypothesis),
            StateDelta::InsightStatusChanged { id, status } => self.store.update_insight_status(id, status),
            StateDelta::OriginStatusChanged { id, status } => self.store.update_origin_status(id, status),
            StateDelta::HypothesisResolved { id, status } => self.store.update_hypothesis_status(id, status),
            StateDelta::AdjustmentAttached { id, plan } => self.store.attach_adjustment(id, plan),
            StateDelta::TurnDispatched => {
                self.turn_in_flight = true;
                true
            }
            StateDelta::TurnSettled => {
                self.turn_in_flight = false;
                true
            }
            StateDelta::SessionStopped => {
                self.active = false;
                true
            }
        };

        if applied {
            self.version += 1;
        }
        applied
    }
}
