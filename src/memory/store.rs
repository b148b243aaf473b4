use crate::memory::types::{
    HypothesisId, HypothesisStatus, InsightId, InsightRecord, InsightStatus, OriginEntry, OriginId,
    OriginStatus, SpeculativeHypothesis, Turn, TurnId,
};
use std::collections::VecDeque;
use std::fmt::Debug;
use tracing::warn;

/// Anything the store can hold: uniquely keyed within its own collection.
pub trait Record {
    type Id: PartialEq + Copy + Debug;

    fn id(&self) -> Self::Id;
}

/// A record whose status field may be replaced in place.
pub trait StatusRecord: Record {
    type Status: Copy + Debug;

    fn set_status(&mut self, status: Self::Status);
}

/// Where `append` puts new entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Chronological,
    NewestFirst,
}

/// An append-mostly collection. No deletion.
#[derive(Debug, Clone)]
pub struct Collection<R> {
    entries: VecDeque<R>,
    placement: Placement,
}

impl<R: Record> Collection<R> {
    pub fn new(placement: Placement) -> Self {
        Self {
            entries: VecDeque::new(),
            placement,
        }
    }

    /// Inserts per the collection's placement. Refuses a duplicate id.
    pub fn append(&mut self, record: R) -> bool {
        if self.contains(record.id()) {
            warn!("Refusing duplicate record id {:?}", record.id());
            return false;
        }
        match self.placement {
            Placement::Chronological => self.entries.push_back(record),
            Placement::NewestFirst => self.entries.push_front(record),
        }
        true
    }

    pub fn get(&self, id: R::Id) -> Option<&R> {
        self.entries.iter().find(|r| r.id() == id)
    }

    pub fn contains(&self, id: R::Id) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &R> + ExactSizeIterator {
        self.entries.iter()
    }

    /// Entry at display position `index`.
    pub fn nth(&self, index: usize) -> Option<&R> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn find_mut(&mut self, id: R::Id) -> Option<&mut R> {
        self.entries.iter_mut().find(|r| r.id() == id)
    }
}

impl<R: StatusRecord> Collection<R> {
    /// Replaces only the status field. Absent id is a no-op, not an error.
    pub fn update_status(&mut self, id: R::Id, status: R::Status) -> bool {
        match self.find_mut(id) {
            Some(record) => {
                record.set_status(status);
                true
            }
            None => false,
        }
    }
}

impl Record for Turn {
    type Id = TurnId;

    fn id(&self) -> TurnId {
        self.id
    }
}

impl Record for InsightRecord {
    type Id = InsightId;

    fn id(&self) -> InsightId {
        self.id
    }
}

impl StatusRecord for InsightRecord {
    type Status = InsightStatus;

    fn set_status(&mut self, status: InsightStatus) {
        self.status = status;
    }
}

impl Record for OriginEntry {
    type Id = OriginId;

    fn id(&self) -> OriginId {
        self.id
    }
}

impl StatusRecord for OriginEntry {
    type Status = OriginStatus;

    fn set_status(&mut self, status: OriginStatus) {
        self.status = status;
    }
}

impl Record for SpeculativeHypothesis {
    type Id = HypothesisId;

    fn id(&self) -> HypothesisId {
        self.id
    }
}

impl StatusRecord for SpeculativeHypothesis {
    type Status = HypothesisStatus;

    fn set_status(&mut self, status: HypothesisStatus) {
        self.status = status;
    }
}

/// Pending record counts per derived collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingCounts {
    pub insights: usize,
    pub origins: usize,
    pub hypotheses: usize,
}

/// Holds the four session collections.
/// Insertion and status mutation only; all policy lives in the callers.
#[derive(Debug, Clone)]
pub struct EntityStore {
    turns: Collection<Turn>,
    insights: Collection<InsightRecord>,
    origins: Collection<OriginEntry>,
    hypotheses: Collection<SpeculativeHypothesis>,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore {
    pub fn new() -> Self {
        Self {
            turns: Collection::new(Placement::Chronological),
            insights: Collection::new(Placement::NewestFirst),
            origins: Collection::new(Placement::NewestFirst),
            hypotheses: Collection::new(Placement::NewestFirst),
        }
    }

    pub fn turns(&self) -> &Collection<Turn> {
        &self.turns
    }

    pub fn insights(&self) -> &Collection<InsightRecord> {
        &self.insights
    }

    pub fn origins(&self) -> &Collection<OriginEntry> {
        &self.origins
    }

    pub fn hypotheses(&self) -> &Collection<SpeculativeHypothesis> {
        &self.hypotheses
    }

    pub fn append_turn(&mut self, turn: Turn) -> bool {
        self.turns.append(turn)
    }

    pub fn append_insight(&mut self, insight: InsightRecord) -> bool {
        self.insights.append(insight)
    }

    pub fn append_origin(&mut self, origin: OriginEntry) -> bool {
        self.origins.append(origin)
    }

    pub fn append_hypothesis(&mut self, hypothesis: SpeculativeHypothesis) -> bool {
        self.hypotheses.append(hypothesis)
    }

    pub fn update_insight_status(&mut self, id: InsightId, status: InsightStatus) -> bool {
        self.insights.update_status(id, status)
    }

    pub fn update_origin_status(&mut self, id: OriginId, status: OriginStatus) -> bool {
        self.origins.update_status(id, status)
    }

    pub fn update_hypothesis_status(&mut self, id: HypothesisId, status: HypothesisStatus) -> bool {
        self.hypotheses.update_status(id, status)
    }

    /// Sets `adjustment_plan` on an existing hypothesis. Absent id is a no-op.
    pub fn attach_adjustment(&mut self, id: HypothesisId, plan: String) -> bool {
        match self.hypotheses.find_mut(id) {
            Some(hypothesis) => {
                hypothesis.adjustment_plan = Some(plan);
                true
            }
            None => false,
        }
    }

    /// Hypotheses the user has confirmed, newest first.
    pub fn confirmed_hypotheses(&self) -> impl Iterator<Item = &SpeculativeHypothesis> {
        self.hypotheses.iter().filter(|h| h.confirmed_text().is_some())
    }

    pub fn pending_counts(&self) -> PendingCounts {
        PendingCounts {
            insights: self.insights.iter().filter(|i| i.status == InsightStatus::Pending).count(),
            origins: self.origins.iter().filter(|o| o.status == OriginStatus::Pending).count(),
            hypotheses: self
                .hypotheses
                .iter()
                .filter(|h| h.status == HypothesisStatus::Pending)
                .count(),
        }
    }
}
