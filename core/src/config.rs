use crate::{
    dialogue::{DialogueCatalog, DialogueEvent},
    store::DEFAULT_SAVE_FILE,
    types::{EventId, Gold, Stage},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_SAVE_INTERVAL_SECS: f64 = 10.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GameFile {
    #[serde(default = "default_save_interval_secs")]
    save_interval_secs: f64,
    #[serde(default = "default_save_file")]
    save_file: String,
}

fn default_save_interval_secs() -> f64 {
    DEFAULT_SAVE_INTERVAL_SECS
}

fn default_save_file() -> String {
    DEFAULT_SAVE_FILE.to_string()
}

#[derive(Debug, Clone, Deserialize)]
struct DialogueCatalogFile {
    events: Vec<DialogueEvent>,
}

#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Seconds between autosaves.
    pub save_interval_secs: f64,
    /// Save file name, relative to the runner's save directory.
    pub save_file: String,
    pub dialogue: DialogueCatalog,
}

impl GameConfig {
    /// Load from the data/ directory.
    /// In tests, use GameConfig::default_test().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let game_path = format!("{data_dir}/game.json");
        let game_content = std::fs::read_to_string(&game_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {game_path}: {e}"))?;
        let game_file: GameFile = serde_json::from_str(&game_content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {game_path}: {e}"))?;

        let dialogue_path = format!("{data_dir}/dialogue/dialogue_events.json");
        let dialogue_content = std::fs::read_to_string(&dialogue_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {dialogue_path}: {e}"))?;
        let dialogue = parse_dialogue_catalog(&dialogue_content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {dialogue_path}: {e}"))?;

        log::debug!(
            "loaded config from {data_dir}: {} dialogue events, save every {}s",
            dialogue.len(),
            game_file.save_interval_secs
        );

        Ok(Self {
            save_interval_secs: game_file.save_interval_secs,
            save_file: game_file.save_file,
            dialogue,
        })
    }

    /// Save interval as a Duration. Negative or non-finite values fall
    /// back to the default.
    pub fn save_interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.save_interval_secs).unwrap_or_else(|_| {
            log::warn!(
                "invalid save interval {}; using {DEFAULT_SAVE_INTERVAL_SECS}s",
                self.save_interval_secs
            );
            Duration::from_secs_f64(DEFAULT_SAVE_INTERVAL_SECS)
        })
    }

    /// Config with hardcoded defaults for use in unit tests.
    pub fn default_test() -> Self {
        fn event(event_id: EventId, required_gold: Gold, required_stage: Stage, texts: &[&str]) -> DialogueEvent {
            DialogueEvent {
                event_id,
                required_gold,
                required_stage,
                dialogue_texts: texts.iter().map(|t| t.to_string()).collect(),
            }
        }

        Self {
            save_interval_secs: DEFAULT_SAVE_INTERVAL_SECS,
            save_file: DEFAULT_SAVE_FILE.to_string(),
            dialogue: DialogueCatalog::new(vec![
                event(1, 0, 0, &["Welcome.", "Click to earn gold."]),
                event(2, 100, 0, &["A hundred gold already?"]),
                event(3, 0, 2, &["The second stage opens."]),
                event(4, 1_000, 3, &["Rich and far along."]),
            ]),
        }
    }
}

/// Parse the dialogue catalog file format: `{"events": [...]}`.
pub fn parse_dialogue_catalog(json: &str) -> anyhow::Result<DialogueCatalog> {
    let file: DialogueCatalogFile = serde_json::from_str(json)?;
    Ok(DialogueCatalog::new(file.events))
}
