//! The game engine: single owner of every component.
//!
//! LIFECYCLE (fixed):
//!   1. `boot()` builds the state and the dialogue engine, then loads the
//!      save exactly once. Nothing else runs before the load completes.
//!   2. The caller subscribes its handlers, then calls `sync()` to deliver
//!      the post-load notifications (and any dialogue they fire).
//!   3. Commands and `advance()` run for the rest of the session. The
//!      autosave timer only starts counting at the first `advance()`.
//!   4. `shutdown()` performs one final synchronous save.
//!
//! DISPATCH: after every command the engine drains the state's queued
//! notifications in order, publishes each one, and runs a full dialogue
//! evaluation after each gold or stage change. Evaluation reads the state
//! as it stands after the whole command, so a revive checks thresholds
//! against the fully reset state (stage 1), not a half-reset one.
//!
//! ERRORS: a failed autosave is logged and play continues; the frame's
//! events are still returned. Only explicit `save()` and `shutdown()`
//! hand storage errors to the caller.

use crate::{
    bus::{ChangeBus, SubscriptionId},
    clock::{AutosaveTimer, IncomeTimer},
    command::PlayerCommand,
    config::GameConfig,
    dialogue::DialogueTriggerEngine,
    error::GameResult,
    event::{GameEvent, Topic},
    progression::{ProgressionState, UpgradeOutcome},
    snapshot::{LoadOutcome, SaveCodec, SaveSnapshot},
    store::SaveStorage,
    upgrade::{UpgradeKey, UpgradeTable},
};
use std::time::Duration;

pub struct GameEngine {
    state:        ProgressionState,
    dialogue:     DialogueTriggerEngine,
    bus:          ChangeBus,
    income:       IncomeTimer,
    autosave:     AutosaveTimer,
    storage:      Box<dyn SaveStorage>,
    load_outcome: LoadOutcome,
}

impl GameEngine {
    /// Build all components and load the save. Post-load notifications
    /// stay queued until the first `sync()` or command.
    pub fn boot(config: GameConfig, storage: Box<dyn SaveStorage>) -> Self {
        let mut state = ProgressionState::new();
        let mut dialogue = DialogueTriggerEngine::new(config.dialogue.clone());
        let load_outcome = SaveCodec::load(storage.as_ref(), &mut state, &mut dialogue);

        Self {
            state,
            dialogue,
            bus:      ChangeBus::new(),
            income:   IncomeTimer::new(),
            autosave: AutosaveTimer::new(config.save_interval()),
            storage,
            load_outcome,
        }
    }

    // ── Reads ──────────────────────────────────────────────────

    pub fn state(&self) -> &ProgressionState {
        &self.state
    }

    pub fn dialogue(&self) -> &DialogueTriggerEngine {
        &self.dialogue
    }

    pub fn storage(&self) -> &dyn SaveStorage {
        self.storage.as_ref()
    }

    pub fn load_outcome(&self) -> &LoadOutcome {
        &self.load_outcome
    }

    pub fn snapshot(&self) -> SaveSnapshot {
        SaveCodec::serialize(&self.state, &self.dialogue)
    }

    // ── Subscriptions ──────────────────────────────────────────

    pub fn subscribe(
        &mut self,
        topic: Topic,
        handler: impl FnMut(&GameEvent) + Send + 'static,
    ) -> SubscriptionId {
        self.bus.subscribe(topic, handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    // ── Commands ───────────────────────────────────────────────

    pub fn apply(&mut self, command: PlayerCommand) -> Vec<GameEvent> {
        match command {
            PlayerCommand::Click => self.click(),
            PlayerCommand::PurchaseUpgrade { table, key } => self.purchase_upgrade(table, key),
            PlayerCommand::ConfirmStageAdvance => self.confirm_stage_advance(),
            PlayerCommand::Revive => self.revive(),
        }
    }

    pub fn click(&mut self) -> Vec<GameEvent> {
        self.state.click();
        self.sync()
    }

    pub fn purchase_upgrade(&mut self, table: UpgradeTable, key: UpgradeKey) -> Vec<GameEvent> {
        let outcome = self.state.purchase_upgrade(table, key);
        let mut events = self.sync();
        if let UpgradeOutcome::StageAdvanceRequested { .. } = outcome {
            let request = GameEvent::StageAdvanceRequested { key };
            self.bus.publish(&request);
            events.push(request);
        }
        events
    }

    pub fn confirm_stage_advance(&mut self) -> Vec<GameEvent> {
        self.state.confirm_stage_advance();
        self.sync()
    }

    pub fn revive(&mut self) -> Vec<GameEvent> {
        self.state.revive();
        self.sync()
    }

    /// One frame: passive income for every whole second elapsed, then an
    /// autosave if the interval has passed. A failed autosave is logged,
    /// never returned; the next interval tries again.
    pub fn advance(&mut self, dt: Duration) -> Vec<GameEvent> {
        let seconds = self.income.advance(dt);
        self.state.accrue_passive(seconds);
        let mut events = self.sync();

        if self.autosave.advance(dt) {
            match self.save() {
                Ok(saved) => events.push(saved),
                Err(e) => log::error!("autosave to {} failed: {e}", self.storage.describe()),
            }
        }
        events
    }

    /// Write a snapshot now.
    pub fn save(&mut self) -> GameResult<GameEvent> {
        let bytes = SaveCodec::save(self.storage.as_mut(), &self.state, &self.dialogue)?;
        let saved = GameEvent::ProgressSaved { bytes };
        self.bus.publish(&saved);
        Ok(saved)
    }

    /// Final save. Hands the storage back so a later session can reuse it.
    pub fn shutdown(mut self) -> GameResult<Box<dyn SaveStorage>> {
        self.sync();
        self.save()?;
        log::info!("shutdown: final save to {}", self.storage.describe());
        Ok(self.storage)
    }

    /// Deliver every queued notification, evaluating dialogue after each
    /// gold or stage change. Returns everything published, in order.
    pub fn sync(&mut self) -> Vec<GameEvent> {
        let mut out = Vec::new();
        for change in self.state.drain_changes() {
            self.bus.publish(&change);
            let evaluate = DialogueTriggerEngine::reacts_to(&change);
            out.push(change);

            if evaluate {
                let fired: Vec<GameEvent> = self
                    .dialogue
                    .evaluate_all(&self.state)
                    .map(|event| GameEvent::DialogueTriggered {
                        event_id: event.event_id,
                        texts:    event.dialogue_texts.clone(),
                    })
                    .collect();
                for event in fired {
                    self.bus.publish(&event);
                    out.push(event);
                }
            }
        }
        out
    }
}
