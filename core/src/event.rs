//! The event stream: everything the core tells the presentation layer.
//!
//! RULE: The core never holds a UI reference.
//! State changes and dialogue firings leave the core only as GameEvents,
//! delivered in emission order through the ChangeBus.

use crate::{
    types::{EventId, Gold, Stage},
    upgrade::UpgradeKey,
};
use serde::{Deserialize, Serialize};

/// Every event the core emits.
/// Variants are appended, never removed or reordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    // ── Progression notifications ─────────────────
    GoldChanged {
        gold: Gold,
    },
    GoldPerClickChanged {
        gold_per_click: Gold,
    },
    GoldPerSecondChanged {
        gold_per_second: Gold,
    },
    StageChanged {
        stage: Stage,
    },
    ReviveCountChanged {
        revive_count: i64,
    },

    // ── Story ─────────────────────────────────────
    DialogueTriggered {
        event_id: EventId,
        texts: Vec<String>,
    },

    // ── Process gate ──────────────────────────────
    /// The presentation layer should ask the player before
    /// sending `confirm_stage_advance`.
    StageAdvanceRequested {
        key: UpgradeKey,
    },

    // ── Persistence ───────────────────────────────
    ProgressSaved {
        bytes: usize,
    },
}

/// Subscription topics. One per GameEvent kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Gold,
    GoldPerClick,
    GoldPerSecond,
    Stage,
    ReviveCount,
    Dialogue,
    StageAdvance,
    Save,
}

impl GameEvent {
    pub fn topic(&self) -> Topic {
        match self {
            Self::GoldChanged { .. }           => Topic::Gold,
            Self::GoldPerClickChanged { .. }   => Topic::GoldPerClick,
            Self::GoldPerSecondChanged { .. }  => Topic::GoldPerSecond,
            Self::StageChanged { .. }          => Topic::Stage,
            Self::ReviveCountChanged { .. }    => Topic::ReviveCount,
            Self::DialogueTriggered { .. }     => Topic::Dialogue,
            Self::StageAdvanceRequested { .. } => Topic::StageAdvance,
            Self::ProgressSaved { .. }         => Topic::Save,
        }
    }
}

/// Extract a stable string name from a GameEvent variant.
/// Used by the runner's event log output.
pub fn event_type_name(event: &GameEvent) -> &'static str {
    match event {
        GameEvent::GoldChanged { .. }           => "gold_changed",
        GameEvent::GoldPerClickChanged { .. }   => "gold_per_click_changed",
        GameEvent::GoldPerSecondChanged { .. }  => "gold_per_second_changed",
        GameEvent::StageChanged { .. }          => "stage_changed",
        GameEvent::ReviveCountChanged { .. }    => "revive_count_changed",
        GameEvent::DialogueTriggered { .. }     => "dialogue_triggered",
        GameEvent::StageAdvanceRequested { .. } => "stage_advance_requested",
        GameEvent::ProgressSaved { .. }         => "progress_saved",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_type_tag() {
        let json = serde_json::to_string(&GameEvent::StageChanged { stage: 3 }).unwrap();
        assert_eq!(json, r#"{"type":"stage_changed","stage":3}"#);
    }
}
