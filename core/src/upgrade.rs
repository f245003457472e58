//! Upgrade tables: three five-tier level tables (GPC, GPS, Process).
//!
//! RULE: Every live table holds exactly the five keys A..E once
//! `ProgressionState::initialize_defaults()` has run. A table restored from
//! a save may be partial until then; reads of a missing key see level 1.

use crate::types::{Gold, Level};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The level every key starts at, and returns to on revive.
pub const BASE_LEVEL: Level = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UpgradeKey {
    A,
    B,
    C,
    D,
    E,
}

impl UpgradeKey {
    pub const ALL: [UpgradeKey; 5] = [
        UpgradeKey::A,
        UpgradeKey::B,
        UpgradeKey::C,
        UpgradeKey::D,
        UpgradeKey::E,
    ];

    /// Gold added per level when this tier is purchased.
    pub fn tier_multiplier(self) -> Gold {
        match self {
            Self::A => 10,
            Self::B => 20,
            Self::C => 30,
            Self::D => 40,
            Self::E => 50,
        }
    }

    /// Amount a purchase at `level` is worth.
    pub fn upgrade_amount(self, level: Level) -> Gold {
        level.saturating_mul(self.tier_multiplier())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeTable {
    /// Raises gold-per-click.
    Gpc,
    /// Raises gold-per-second.
    Gps,
    /// Requests a stage advance, applied only after confirmation.
    Process,
}

impl UpgradeTable {
    pub const ALL: [UpgradeTable; 3] = [UpgradeTable::Gpc, UpgradeTable::Gps, UpgradeTable::Process];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UpgradeLevels {
    levels: BTreeMap<UpgradeKey, Level>,
}

impl Default for UpgradeLevels {
    fn default() -> Self {
        Self {
            levels: UpgradeKey::ALL.iter().map(|k| (*k, BASE_LEVEL)).collect(),
        }
    }
}

impl UpgradeLevels {
    /// Copy a restored table as-is. Missing keys stay missing until `heal()`.
    pub fn from_map(levels: BTreeMap<UpgradeKey, Level>) -> Self {
        Self { levels }
    }

    pub fn level(&self, key: UpgradeKey) -> Level {
        self.levels.get(&key).copied().unwrap_or(BASE_LEVEL)
    }

    /// Bump `key` by one level. Returns the level before the bump.
    pub fn increment(&mut self, key: UpgradeKey) -> Level {
        let before = self.level(key);
        self.levels.insert(key, before.saturating_add(1));
        before
    }

    pub fn is_complete(&self) -> bool {
        UpgradeKey::ALL.iter().all(|k| self.levels.contains_key(k))
    }

    /// Insert every missing key at the base level. Returns how many were added.
    pub fn heal(&mut self) -> usize {
        let mut healed = 0;
        for key in UpgradeKey::ALL {
            if let std::collections::btree_map::Entry::Vacant(slot) = self.levels.entry(key) {
                slot.insert(BASE_LEVEL);
                healed += 1;
            }
        }
        healed
    }

    pub fn as_map(&self) -> &BTreeMap<UpgradeKey, Level> {
        &self.levels
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_multipliers_step_by_ten() {
        let got: Vec<Gold> = UpgradeKey::ALL.iter().map(|k| k.tier_multiplier()).collect();
        assert_eq!(got, vec![10, 20, 30, 40, 50]);
    }

    #[test]
    fn heal_fills_only_missing_keys() {
        let mut partial = UpgradeLevels::from_map([(UpgradeKey::B, 7)].into());
        assert!(!partial.is_complete());
        assert_eq!(partial.heal(), 4);
        assert!(partial.is_complete());
        assert_eq!(partial.level(UpgradeKey::B), 7);
        assert_eq!(partial.level(UpgradeKey::E), BASE_LEVEL);
    }

    #[test]
    fn amount_saturates_instead_of_wrapping() {
        assert_eq!(UpgradeKey::E.upgrade_amount(Level::MAX), Gold::MAX);
    }
}
