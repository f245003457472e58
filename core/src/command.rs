use serde::{Deserialize, Serialize};
use crate::upgrade::{UpgradeKey, UpgradeTable};

/// All player-issued commands.
/// Variants are appended, never removed or reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum PlayerCommand {
    Click,
    PurchaseUpgrade {
        table: UpgradeTable,
        key:   UpgradeKey,
    },
    /// Sent only after the player said yes to the stage-advance prompt.
    ConfirmStageAdvance,
    Revive,
}
