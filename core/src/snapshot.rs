//! Snapshot serialization: progression + trigger history to/from JSON.
//!
//! LOAD ORDER (fixed, never reordered):
//!   1. Trigger history is imported into the dialogue engine.
//!   2. Economy fields are applied through the notifying setters.
//!   3. Upgrade tables present in the save replace the live ones.
//!   4. `initialize_defaults()` heals and rebroadcasts, in every branch.
//!
//! Because history lands first, the first evaluation pass after a load
//! sees the restored economy and the restored history together and never
//! re-fires an event the player has already seen.

use crate::{
    dialogue::DialogueTriggerEngine,
    error::GameResult,
    progression::{ProgressionState, STARTING_GOLD_PER_CLICK, STARTING_STAGE},
    store::SaveStorage,
    types::{EventId, Gold, Level, Stage},
    upgrade::{UpgradeKey, UpgradeLevels, UpgradeTable},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The persisted record. Field names are part of the save format.
/// Missing fields take fresh defaults; a missing or null table stays None
/// until it is healed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveSnapshot {
    #[serde(rename = "Gold")]
    pub gold: Gold,
    #[serde(rename = "GoldPerClick")]
    pub gold_per_click: Gold,
    #[serde(rename = "GoldPerSecond")]
    pub gold_per_second: Gold,
    #[serde(rename = "Stage")]
    pub stage: Stage,
    #[serde(rename = "ReviveCount")]
    pub revive_count: i64,
    #[serde(rename = "GPCUpgrades")]
    pub gpc_upgrades: Option<BTreeMap<UpgradeKey, Level>>,
    #[serde(rename = "GPSUpgrades")]
    pub gps_upgrades: Option<BTreeMap<UpgradeKey, Level>>,
    #[serde(rename = "ProcessUpgrades")]
    pub process_upgrades: Option<BTreeMap<UpgradeKey, Level>>,
    #[serde(rename = "TriggeredEventIds")]
    pub triggered_event_ids: Option<Vec<EventId>>,
}

impl Default for SaveSnapshot {
    fn default() -> Self {
        Self {
            gold:                0,
            gold_per_click:      STARTING_GOLD_PER_CLICK,
            gold_per_second:     0,
            stage:               STARTING_STAGE,
            revive_count:        0,
            gpc_upgrades:        None,
            gps_upgrades:        None,
            process_upgrades:    None,
            triggered_event_ids: None,
        }
    }
}

impl SaveSnapshot {
    /// Copy every field out of the live state. Tables are copied by value,
    /// so mutating the snapshot never touches the game.
    pub fn capture(state: &ProgressionState, dialogue: &DialogueTriggerEngine) -> Self {
        Self {
            gold:                state.gold(),
            gold_per_click:      state.gold_per_click(),
            gold_per_second:     state.gold_per_second(),
            stage:               state.stage(),
            revive_count:        state.revive_count(),
            gpc_upgrades:        Some(state.upgrades(UpgradeTable::Gpc).as_map().clone()),
            gps_upgrades:        Some(state.upgrades(UpgradeTable::Gps).as_map().clone()),
            process_upgrades:    Some(state.upgrades(UpgradeTable::Process).as_map().clone()),
            // BTreeSet iteration keeps the output stable between saves.
            triggered_event_ids: Some(dialogue.export_triggered().into_iter().collect()),
        }
    }

    pub fn to_json(&self) -> GameResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_slice(bytes: &[u8]) -> GameResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    fn table(&self, table: UpgradeTable) -> Option<&BTreeMap<UpgradeKey, Level>> {
        match table {
            UpgradeTable::Gpc     => self.gpc_upgrades.as_ref(),
            UpgradeTable::Gps     => self.gps_upgrades.as_ref(),
            UpgradeTable::Process => self.process_upgrades.as_ref(),
        }
    }
}

/// How a load ended. None of these is a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No save existed.
    FirstRun,
    /// The save was applied.
    Restored,
    /// The save could not be read or parsed and was discarded.
    Recovered { reason: String },
}

pub struct SaveCodec;

impl SaveCodec {
    pub fn serialize(state: &ProgressionState, dialogue: &DialogueTriggerEngine) -> SaveSnapshot {
        SaveSnapshot::capture(state, dialogue)
    }

    /// Decode raw storage contents. Never fails: absent or corrupt bytes
    /// come back as no snapshot plus the reason.
    pub fn deserialize(bytes: Option<&[u8]>) -> (Option<SaveSnapshot>, LoadOutcome) {
        let Some(bytes) = bytes else {
            return (None, LoadOutcome::FirstRun);
        };
        match SaveSnapshot::from_slice(bytes) {
            Ok(snapshot) => (Some(snapshot), LoadOutcome::Restored),
            Err(e) => (None, LoadOutcome::Recovered { reason: e.to_string() }),
        }
    }

    /// Serialize and write. Returns the number of bytes written.
    pub fn save(
        storage:  &mut dyn SaveStorage,
        state:    &ProgressionState,
        dialogue: &DialogueTriggerEngine,
    ) -> GameResult<usize> {
        let json = Self::serialize(state, dialogue).to_json()?;
        storage.write(json.as_bytes())?;
        log::debug!("saved {} bytes to {}", json.len(), storage.describe());
        Ok(json.len())
    }

    /// Read, decode and apply a save. Always leaves both components in a
    /// complete, consistent state.
    pub fn load(
        storage:  &dyn SaveStorage,
        state:    &mut ProgressionState,
        dialogue: &mut DialogueTriggerEngine,
    ) -> LoadOutcome {
        let (snapshot, outcome) = match storage.read() {
            Ok(bytes) => Self::deserialize(bytes.as_deref()),
            Err(e) => (None, LoadOutcome::Recovered { reason: e.to_string() }),
        };

        match (&outcome, snapshot) {
            (LoadOutcome::Restored, Some(snapshot)) => {
                Self::apply(snapshot, state, dialogue);
                log::info!("loaded save from {}", storage.describe());
            }
            (LoadOutcome::Recovered { reason }, _) => {
                log::warn!(
                    "discarding unreadable save at {}: {reason}; starting fresh",
                    storage.describe()
                );
                Self::reset(state, dialogue);
            }
            _ => {
                log::info!("no save at {}; starting fresh", storage.describe());
                Self::reset(state, dialogue);
            }
        }

        state.initialize_defaults();
        outcome
    }

    /// Steps 1 to 3 of the load order. The caller runs step 4.
    pub fn apply(
        snapshot: SaveSnapshot,
        state:    &mut ProgressionState,
        dialogue: &mut DialogueTriggerEngine,
    ) {
        if let Some(ids) = &snapshot.triggered_event_ids {
            dialogue.import_triggered(ids.iter().copied());
        }

        state.set_gold(snapshot.gold);
        state.set_gold_per_click(snapshot.gold_per_click);
        state.set_gold_per_second(snapshot.gold_per_second);
        state.set_stage(snapshot.stage);
        state.load_revive_count(snapshot.revive_count);

        for table in UpgradeTable::ALL {
            if let Some(levels) = snapshot.table(table) {
                state.restore_upgrades(table, UpgradeLevels::from_map(levels.clone()));
            }
        }
    }

    fn reset(state: &mut ProgressionState, dialogue: &mut DialogueTriggerEngine) {
        *state = ProgressionState::default();
        dialogue.import_triggered(std::iter::empty());
    }
}
