//! Dialogue triggers: one-shot story events gated by gold/stage thresholds.
//!
//! RULES:
//!   - The catalog is scanned in authored order; every satisfied, unseen
//!     event in a pass fires, not just the first.
//!   - An id in the triggered set never fires again, even if its condition
//!     goes false and true again.
//!   - Only gold and stage changes cause an evaluation pass.

use crate::{
    error::{GameError, GameResult},
    event::GameEvent,
    progression::ProgressionState,
    types::{EventId, Gold, Stage},
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet, VecDeque};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueEvent {
    pub event_id: EventId,
    /// Minimum gold (inclusive). 0 or less means ignored.
    #[serde(default)]
    pub required_gold: Gold,
    /// Minimum stage (inclusive). 0 or less means ignored.
    #[serde(default)]
    pub required_stage: Stage,
    pub dialogue_texts: Vec<String>,
}

impl DialogueEvent {
    pub fn is_condition_met(&self, state: &ProgressionState) -> bool {
        if self.required_gold > 0 && state.gold() < self.required_gold {
            return false;
        }
        if self.required_stage > 0 && state.stage() < self.required_stage {
            return false;
        }
        true
    }

    pub fn validate(&self) -> GameResult<()> {
        if self.dialogue_texts.is_empty() {
            return Err(GameError::InvalidCatalog {
                reason: format!("event {} has no dialogue texts", self.event_id),
            });
        }
        Ok(())
    }
}

/// The authored, ordered list of dialogue events.
#[derive(Debug, Clone, Default)]
pub struct DialogueCatalog {
    events: Vec<DialogueEvent>,
}

impl DialogueCatalog {
    /// Build a catalog, dropping invalid entries and later duplicates of an id.
    pub fn new(events: Vec<DialogueEvent>) -> Self {
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(events.len());
        for event in events {
            if let Err(e) = event.validate() {
                log::warn!("dropping dialogue event: {e}");
                continue;
            }
            if !seen.insert(event.event_id) {
                log::warn!("dropping duplicate dialogue event id {}", event.event_id);
                continue;
            }
            kept.push(event);
        }
        Self { events: kept }
    }

    pub fn events(&self) -> &[DialogueEvent] {
        &self.events
    }

    pub fn get(&self, event_id: EventId) -> Option<&DialogueEvent> {
        self.events.iter().find(|e| e.event_id == event_id)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

pub struct DialogueTriggerEngine {
    catalog:   DialogueCatalog,
    triggered: BTreeSet<EventId>,
}

impl DialogueTriggerEngine {
    pub fn new(catalog: DialogueCatalog) -> Self {
        Self { catalog, triggered: BTreeSet::new() }
    }

    pub fn catalog(&self) -> &DialogueCatalog {
        &self.catalog
    }

    /// Whether a notification should cause an evaluation pass.
    pub fn reacts_to(event: &GameEvent) -> bool {
        matches!(event, GameEvent::GoldChanged { .. } | GameEvent::StageChanged { .. })
    }

    /// Lazily yield every newly satisfied event in catalog order.
    /// Events are marked triggered as they are yielded; dropping the
    /// iterator early leaves the rest of the catalog for the next pass.
    pub fn evaluate_all<'a>(&'a mut self, state: &'a ProgressionState) -> NewlyTriggered<'a> {
        NewlyTriggered {
            events:    self.catalog.events.iter(),
            triggered: &mut self.triggered,
            state,
        }
    }

    pub fn is_triggered(&self, event_id: EventId) -> bool {
        self.triggered.contains(&event_id)
    }

    pub fn export_triggered(&self) -> BTreeSet<EventId> {
        self.triggered.clone()
    }

    /// Replace (not merge) the triggered set.
    pub fn import_triggered(&mut self, ids: impl IntoIterator<Item = EventId>) {
        self.triggered = ids.into_iter().collect();
    }
}

pub struct NewlyTriggered<'a> {
    events:    std::slice::Iter<'a, DialogueEvent>,
    triggered: &'a mut BTreeSet<EventId>,
    state:     &'a ProgressionState,
}

impl<'a> Iterator for NewlyTriggered<'a> {
    type Item = &'a DialogueEvent;

    fn next(&mut self) -> Option<&'a DialogueEvent> {
        for event in self.events.by_ref() {
            if self.triggered.contains(&event.event_id) {
                continue;
            }
            if event.is_condition_met(self.state) {
                self.triggered.insert(event.event_id);
                log::info!(
                    "dialogue {} triggered (gold={}, stage={})",
                    event.event_id,
                    self.state.gold(),
                    self.state.stage()
                );
                return Some(event);
            }
        }
        None
    }
}

/// Pages through fired dialogue one line at a time.
/// Firings that arrive while a dialogue is open wait their turn.
#[derive(Debug, Default)]
pub struct DialoguePlayback {
    queue: VecDeque<(EventId, Vec<String>)>,
    index: usize,
}

impl DialoguePlayback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a dialogue. Returns false (and queues nothing) if it has no lines.
    pub fn show(&mut self, event_id: EventId, texts: Vec<String>) -> bool {
        if texts.is_empty() {
            log::warn!("dialogue {event_id} has no lines to show");
            return false;
        }
        self.queue.push_back((event_id, texts));
        true
    }

    pub fn is_open(&self) -> bool {
        !self.queue.is_empty()
    }

    pub fn current_event(&self) -> Option<EventId> {
        self.queue.front().map(|(id, _)| *id)
    }

    pub fn current(&self) -> Option<&str> {
        self.queue
            .front()
            .and_then(|(_, texts)| texts.get(self.index))
            .map(String::as_str)
    }

    /// Move to the next line. Past the last line the dialogue closes and
    /// the next queued one (if any) starts from its first line.
    pub fn advance(&mut self) -> Option<&str> {
        let Some((_, texts)) = self.queue.front() else {
            return None;
        };
        self.index += 1;
        if self.index >= texts.len() {
            self.queue.pop_front();
            self.index = 0;
        }
        self.current()
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }
}
