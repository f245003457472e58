//! Progression state tests: upgrade economy, revive, notifications.

use clicker_core::{
    event::GameEvent,
    progression::{ProgressionState, UpgradeOutcome},
    upgrade::{UpgradeKey, UpgradeTable},
};

fn gpc_events(events: &[GameEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, GameEvent::GoldPerClickChanged { .. }))
        .count()
}

/// Level 1 key A adds 10, then level 2 adds 20.
#[test]
fn gpc_upgrade_amount_scales_with_level() {
    let mut state = ProgressionState::new();
    assert_eq!(state.gold_per_click(), 1);

    let first = state.purchase_upgrade(UpgradeTable::Gpc, UpgradeKey::A);
    assert_eq!(first, UpgradeOutcome::GoldPerClickRaised { amount: 10, level: 2 });
    assert_eq!(state.gold_per_click(), 11);

    let second = state.purchase_upgrade(UpgradeTable::Gpc, UpgradeKey::A);
    assert_eq!(second, UpgradeOutcome::GoldPerClickRaised { amount: 20, level: 3 });
    assert_eq!(state.gold_per_click(), 31);
    assert_eq!(state.level(UpgradeTable::Gpc, UpgradeKey::A), 3);
}

/// Every tier follows level_before * multiplier, and levels strictly increase.
#[test]
fn upgrade_levels_are_monotonic_for_every_tier() {
    for key in UpgradeKey::ALL {
        let mut state = ProgressionState::new();
        let mut expected_gps = 0;
        for level_before in 1..=6 {
            state.purchase_upgrade(UpgradeTable::Gps, key);
            expected_gps += level_before * key.tier_multiplier();
            assert_eq!(
                state.level(UpgradeTable::Gps, key),
                level_before + 1,
                "level did not advance for {key:?}"
            );
            assert_eq!(state.gold_per_second(), expected_gps, "wrong GPS for {key:?}");
        }
        // Other keys untouched.
        for other in UpgradeKey::ALL.into_iter().filter(|k| *k != key) {
            assert_eq!(state.level(UpgradeTable::Gps, other), 1);
        }
    }
}

/// Process purchases bump the level but leave the stage to confirmation.
#[test]
fn process_upgrade_waits_for_confirmation() {
    let mut state = ProgressionState::new();
    let outcome = state.purchase_upgrade(UpgradeTable::Process, UpgradeKey::C);

    assert_eq!(outcome, UpgradeOutcome::StageAdvanceRequested { level: 2 });
    assert_eq!(state.stage(), 1);
    assert_eq!(state.gold_per_click(), 1);
    assert_eq!(state.gold_per_second(), 0);

    state.confirm_stage_advance();
    assert_eq!(state.stage(), 2);
}

/// Upgrades are free: gold is never deducted.
#[test]
fn upgrades_cost_nothing() {
    let mut state = ProgressionState::new();
    state.set_gold(5);
    state.purchase_upgrade(UpgradeTable::Gpc, UpgradeKey::E);
    state.purchase_upgrade(UpgradeTable::Gps, UpgradeKey::D);
    assert_eq!(state.gold(), 5);
}

#[test]
fn revive_resets_progress_but_keeps_counter() {
    let mut state = ProgressionState::new();
    state.set_gold(500);
    state.set_stage(7);
    state.load_revive_count(2);
    state.purchase_upgrade(UpgradeTable::Gpc, UpgradeKey::B);
    state.purchase_upgrade(UpgradeTable::Gps, UpgradeKey::C);
    state.purchase_upgrade(UpgradeTable::Process, UpgradeKey::D);
    state.drain_changes();

    state.revive();

    assert_eq!(state.gold(), 0);
    assert_eq!(state.gold_per_click(), 1);
    assert_eq!(state.gold_per_second(), 0);
    assert_eq!(state.stage(), 1);
    assert_eq!(state.revive_count(), 3);
    for table in UpgradeTable::ALL {
        for key in UpgradeKey::ALL {
            assert_eq!(state.level(table, key), 1, "{table:?}/{key:?} not reset");
        }
    }

    let events = state.drain_changes();
    assert_eq!(
        events,
        vec![
            GameEvent::ReviveCountChanged { revive_count: 3 },
            GameEvent::GoldChanged { gold: 0 },
            GameEvent::GoldPerClickChanged { gold_per_click: 1 },
            GameEvent::GoldPerSecondChanged { gold_per_second: 0 },
            GameEvent::StageChanged { stage: 1 },
        ]
    );
}

#[test]
fn no_op_writes_do_not_notify() {
    let mut state = ProgressionState::new();
    state.set_gold(0);
    state.add_gold(0);
    state.set_gold_per_click(1);
    state.set_gold_per_second(0);
    state.set_stage(1);
    state.load_revive_count(0);
    assert!(!state.has_pending_changes());

    state.set_gold_per_click(4);
    state.set_gold_per_click(4);
    assert_eq!(gpc_events(&state.drain_changes()), 1);
}

#[test]
fn click_credits_gold_per_click() {
    let mut state = ProgressionState::new();
    state.set_gold_per_click(7);
    assert_eq!(state.click(), 7);
    assert_eq!(state.click(), 7);
    assert_eq!(state.gold(), 14);
}

#[test]
fn passive_income_credits_all_seconds_at_once() {
    let mut state = ProgressionState::new();
    state.set_gold_per_second(3);
    state.drain_changes();
    state.accrue_passive(4);
    assert_eq!(state.gold(), 12);
    assert_eq!(state.drain_changes(), vec![GameEvent::GoldChanged { gold: 12 }]);

    state.accrue_passive(0);
    assert!(!state.has_pending_changes());

    state.accrue_passive(u64::MAX);
    assert_eq!(state.gold(), i64::MAX);
    assert_eq!(state.drain_changes().len(), 1);
}

/// Gold is not clamped at zero, and saturates at the i64 bounds.
#[test]
fn gold_saturates_instead_of_wrapping() {
    let mut state = ProgressionState::new();
    state.add_gold(-25);
    assert_eq!(state.gold(), -25);

    state.set_gold(i64::MAX - 1);
    state.add_gold(10);
    assert_eq!(state.gold(), i64::MAX);
}

#[test]
fn initialize_defaults_always_broadcasts_all_five() {
    let mut state = ProgressionState::new();
    state.initialize_defaults();
    let events = state.drain_changes();
    assert_eq!(events.len(), 5);
    assert!(matches!(events[4], GameEvent::ReviveCountChanged { revive_count: 0 }));
}
