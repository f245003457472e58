//! Autoplay: a seeded stand-in player for headless sessions.
//!
//! Each simulated second the policy clicks a few times, sometimes buys a
//! GPC/GPS upgrade, more rarely buys a Process upgrade and confirms the
//! stage advance, and revives once the stage cap is reached.
//! Same seed + same config + same length = same session.

use crate::{
    command::PlayerCommand,
    engine::GameEngine,
    event::GameEvent,
    progression::ProgressionState,
    rng::{SessionRng, StreamSlot},
    types::{EventId, Stage},
    upgrade::{UpgradeKey, UpgradeTable},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoplayConfig {
    pub max_clicks_per_second: u64,
    pub upgrade_chance:        f64,
    pub process_chance:        f64,
    pub revive_at_stage:       Stage,
    pub frames_per_second:     u32,
}

impl Default for AutoplayConfig {
    fn default() -> Self {
        Self {
            max_clicks_per_second: 5,
            upgrade_chance:        0.30,
            process_chance:        0.05,
            revive_at_stage:       5,
            frames_per_second:     10,
        }
    }
}

pub struct AutoplayPolicy {
    config:   AutoplayConfig,
    clicks:   SessionRng,
    upgrades: SessionRng,
}

impl AutoplayPolicy {
    pub fn new(seed: u64, config: AutoplayConfig) -> Self {
        Self {
            config,
            clicks:   StreamSlot::Clicks.stream(seed),
            upgrades: StreamSlot::Upgrades.stream(seed),
        }
    }

    /// Commands for one simulated second.
    pub fn plan_second(&mut self, state: &ProgressionState) -> Vec<PlayerCommand> {
        if state.stage() >= self.config.revive_at_stage {
            return vec![PlayerCommand::Revive];
        }

        let max_clicks = self.config.max_clicks_per_second.max(1);
        let clicks = 1 + self.clicks.next_u64_below(max_clicks);
        let mut plan = vec![PlayerCommand::Click; clicks as usize];

        if self.upgrades.chance(self.config.upgrade_chance) {
            let table = *self.upgrades.pick(&[UpgradeTable::Gpc, UpgradeTable::Gps]);
            let key = *self.upgrades.pick(&UpgradeKey::ALL);
            plan.push(PlayerCommand::PurchaseUpgrade { table, key });
        }
        if self.upgrades.chance(self.config.process_chance) {
            let key = *self.upgrades.pick(&UpgradeKey::ALL);
            plan.push(PlayerCommand::PurchaseUpgrade { table: UpgradeTable::Process, key });
            plan.push(PlayerCommand::ConfirmStageAdvance);
        }
        plan
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub seconds:        u64,
    pub commands:       u64,
    pub saves:          u64,
    pub revives:        u64,
    pub dialogue_fired: Vec<EventId>,
}

/// Drive `engine` for `seconds` simulated seconds.
pub fn run_session(
    engine:  &mut GameEngine,
    policy:  &mut AutoplayPolicy,
    seconds: u64,
) -> SessionSummary {
    let fps = policy.config.frames_per_second.max(1);
    let frame = Duration::from_secs(1) / fps;
    let mut summary = SessionSummary::default();

    for _ in 0..seconds {
        let mut events = Vec::new();
        for command in policy.plan_second(engine.state()) {
            if command == PlayerCommand::Revive {
                summary.revives += 1;
            }
            summary.commands += 1;
            events.extend(engine.apply(command));
        }
        for _ in 0..fps {
            events.extend(engine.advance(frame));
        }

        for event in &events {
            match event {
                GameEvent::DialogueTriggered { event_id, .. } => {
                    summary.dialogue_fired.push(*event_id)
                }
                GameEvent::ProgressSaved { .. } => summary.saves += 1,
                _ => {}
            }
        }
        summary.seconds += 1;
    }

    log::debug!(
        "autoplay: {} seconds, {} commands, {} saves, {} revives",
        summary.seconds, summary.commands, summary.saves, summary.revives
    );
    summary
}
