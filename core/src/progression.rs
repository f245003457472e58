//! Progression state: the single owner of every mutable economy field.
//!
//! RULES:
//!   - Setters queue a notification only when the value actually changes.
//!   - Notifications are queued in emission order and drained by the owner
//!     (the GameEngine); this module never dispatches anything itself.
//!   - All arithmetic saturates at the i64 bounds. Gold is not clamped at 0.

use crate::{
    event::GameEvent,
    types::{Gold, Level, Stage},
    upgrade::{UpgradeKey, UpgradeLevels, UpgradeTable},
};

pub const STARTING_GOLD_PER_CLICK: Gold = 1;
pub const STARTING_STAGE: Stage = 1;

/// What a purchase did. `level` is the level after the purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeOutcome {
    GoldPerClickRaised { amount: Gold, level: Level },
    GoldPerSecondRaised { amount: Gold, level: Level },
    /// Process upgrades only ask for a stage advance; the stage moves
    /// when the player confirms.
    StageAdvanceRequested { level: Level },
}

#[derive(Debug, Clone)]
pub struct ProgressionState {
    gold:            Gold,
    gold_per_click:  Gold,
    gold_per_second: Gold,
    stage:           Stage,
    revive_count:    i64,
    gpc:             UpgradeLevels,
    gps:             UpgradeLevels,
    process:         UpgradeLevels,
    pending:         Vec<GameEvent>,
}

impl Default for ProgressionState {
    fn default() -> Self {
        Self {
            gold:            0,
            gold_per_click:  STARTING_GOLD_PER_CLICK,
            gold_per_second: 0,
            stage:           STARTING_STAGE,
            revive_count:    0,
            gpc:             UpgradeLevels::default(),
            gps:             UpgradeLevels::default(),
            process:         UpgradeLevels::default(),
            pending:         Vec::new(),
        }
    }
}

/// Equality over the economy only; queued notifications are ignored.
impl PartialEq for ProgressionState {
    fn eq(&self, other: &Self) -> bool {
        self.gold == other.gold
            && self.gold_per_click == other.gold_per_click
            && self.gold_per_second == other.gold_per_second
            && self.stage == other.stage
            && self.revive_count == other.revive_count
            && self.gpc == other.gpc
            && self.gps == other.gps
            && self.process == other.process
    }
}

impl ProgressionState {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Reads ──────────────────────────────────────────────────

    pub fn gold(&self) -> Gold { self.gold }
    pub fn gold_per_click(&self) -> Gold { self.gold_per_click }
    pub fn gold_per_second(&self) -> Gold { self.gold_per_second }
    pub fn stage(&self) -> Stage { self.stage }
    pub fn revive_count(&self) -> i64 { self.revive_count }

    pub fn upgrades(&self, table: UpgradeTable) -> &UpgradeLevels {
        match table {
            UpgradeTable::Gpc     => &self.gpc,
            UpgradeTable::Gps     => &self.gps,
            UpgradeTable::Process => &self.process,
        }
    }

    pub fn level(&self, table: UpgradeTable, key: UpgradeKey) -> Level {
        self.upgrades(table).level(key)
    }

    fn upgrades_mut(&mut self, table: UpgradeTable) -> &mut UpgradeLevels {
        match table {
            UpgradeTable::Gpc     => &mut self.gpc,
            UpgradeTable::Gps     => &mut self.gps,
            UpgradeTable::Process => &mut self.process,
        }
    }

    // ── Notifying setters ──────────────────────────────────────

    pub fn set_gold(&mut self, gold: Gold) {
        if self.gold != gold {
            self.gold = gold;
            self.pending.push(GameEvent::GoldChanged { gold });
        }
    }

    pub fn add_gold(&mut self, delta: Gold) {
        self.set_gold(self.gold.saturating_add(delta));
    }

    pub fn set_gold_per_click(&mut self, gold_per_click: Gold) {
        if self.gold_per_click != gold_per_click {
            self.gold_per_click = gold_per_click;
            self.pending.push(GameEvent::GoldPerClickChanged { gold_per_click });
        }
    }

    pub fn set_gold_per_second(&mut self, gold_per_second: Gold) {
        if self.gold_per_second != gold_per_second {
            self.gold_per_second = gold_per_second;
            self.pending.push(GameEvent::GoldPerSecondChanged { gold_per_second });
        }
    }

    pub fn set_stage(&mut self, stage: Stage) {
        if self.stage != stage {
            self.stage = stage;
            self.pending.push(GameEvent::StageChanged { stage });
        }
    }

    /// Set the revive counter directly. Only the save loader calls this;
    /// gameplay goes through `revive()`.
    pub fn load_revive_count(&mut self, revive_count: i64) {
        if self.revive_count != revive_count {
            self.revive_count = revive_count;
            self.pending.push(GameEvent::ReviveCountChanged { revive_count });
        }
    }

    /// Replace a whole upgrade table. Used by the save loader; the table
    /// may be partial until `initialize_defaults()` runs.
    pub fn restore_upgrades(&mut self, table: UpgradeTable, levels: UpgradeLevels) {
        *self.upgrades_mut(table) = levels;
    }

    // ── Gameplay ───────────────────────────────────────────────

    /// One manual click. Returns the gold credited.
    pub fn click(&mut self) -> Gold {
        let earned = self.gold_per_click;
        self.add_gold(earned);
        earned
    }

    /// Credit `seconds` whole seconds of passive income as one gold change.
    pub fn accrue_passive(&mut self, seconds: u64) {
        if seconds == 0 {
            return;
        }
        let seconds = Gold::try_from(seconds).unwrap_or(Gold::MAX);
        self.add_gold(self.gold_per_second.saturating_mul(seconds));
    }

    /// Buy one level of `key` in `table`. Upgrades are free.
    pub fn purchase_upgrade(&mut self, table: UpgradeTable, key: UpgradeKey) -> UpgradeOutcome {
        let amount = key.upgrade_amount(self.level(table, key));

        match table {
            UpgradeTable::Gpc => {
                self.set_gold_per_click(self.gold_per_click.saturating_add(amount));
            }
            UpgradeTable::Gps => {
                self.set_gold_per_second(self.gold_per_second.saturating_add(amount));
            }
            UpgradeTable::Process => {}
        }

        let level = self.upgrades_mut(table).increment(key).saturating_add(1);
        log::debug!("upgrade {table:?}/{key:?} -> level {level} (+{amount})");

        match table {
            UpgradeTable::Gpc     => UpgradeOutcome::GoldPerClickRaised { amount, level },
            UpgradeTable::Gps     => UpgradeOutcome::GoldPerSecondRaised { amount, level },
            UpgradeTable::Process => UpgradeOutcome::StageAdvanceRequested { level },
        }
    }

    /// The confirmation half of the Process gate.
    pub fn confirm_stage_advance(&mut self) {
        self.set_stage(self.stage.saturating_add(1));
    }

    /// Prestige: bump the lifetime counter, then wipe everything else.
    pub fn revive(&mut self) {
        self.load_revive_count(self.revive_count.saturating_add(1));
        self.reset_progress();
        log::info!("revived (revive_count={})", self.revive_count);
    }

    /// Return every field except `revive_count` to its starting value and
    /// broadcast the four primary notifications unconditionally.
    pub fn reset_progress(&mut self) {
        self.gold            = 0;
        self.gold_per_click  = STARTING_GOLD_PER_CLICK;
        self.gold_per_second = 0;
        self.stage           = STARTING_STAGE;
        self.gpc             = UpgradeLevels::default();
        self.gps             = UpgradeLevels::default();
        self.process         = UpgradeLevels::default();

        self.pending.push(GameEvent::GoldChanged { gold: self.gold });
        self.pending.push(GameEvent::GoldPerClickChanged { gold_per_click: self.gold_per_click });
        self.pending.push(GameEvent::GoldPerSecondChanged { gold_per_second: self.gold_per_second });
        self.pending.push(GameEvent::StageChanged { stage: self.stage });
    }

    /// Heal partial tables, then broadcast all five primary notifications
    /// once each so observers resynchronise even if nothing changed.
    pub fn initialize_defaults(&mut self) {
        for table in UpgradeTable::ALL {
            let healed = self.upgrades_mut(table).heal();
            if healed > 0 {
                log::debug!("healed {healed} missing {table:?} upgrade levels");
            }
        }

        self.pending.push(GameEvent::GoldChanged { gold: self.gold });
        self.pending.push(GameEvent::GoldPerClickChanged { gold_per_click: self.gold_per_click });
        self.pending.push(GameEvent::GoldPerSecondChanged { gold_per_second: self.gold_per_second });
        self.pending.push(GameEvent::StageChanged { stage: self.stage });
        self.pending.push(GameEvent::ReviveCountChanged { revive_count: self.revive_count });
    }

    // ── Notification queue ─────────────────────────────────────

    /// Take every queued notification, oldest first.
    pub fn drain_changes(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn has_pending_changes(&self) -> bool {
        !self.pending.is_empty()
    }
}
