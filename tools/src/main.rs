//! clicker-runner: headless runner for the clicker progression core.
//!
//! Usage:
//!   clicker-runner --seed 12345 --seconds 600 --save saves/save_game.json
//!   clicker-runner --db saves.db --ipc-mode
//!   clicker-runner --fresh --seconds 60

use anyhow::Result;
use clicker_core::{
    autoplay::{run_session, AutoplayConfig, AutoplayPolicy},
    command::PlayerCommand,
    config::GameConfig,
    dialogue::DialoguePlayback,
    engine::GameEngine,
    event::{event_type_name, GameEvent},
    snapshot::SaveSnapshot,
    store::{FileStorage, SaveStorage, SqliteStorage},
};
use std::env;
use std::io::{self, BufRead, Write};
use std::time::Duration;

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Command { command: PlayerCommand },
    Advance { millis: u64 },
    NextLine,
    Save,
    Quit,
}

#[derive(serde::Serialize)]
struct UiState<'a> {
    snapshot:      SaveSnapshot,
    dialogue_line: Option<&'a str>,
    events:        Vec<&'static str>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let seconds = parse_arg(&args, "--seconds", 300u64);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let fresh = args.iter().any(|a| a == "--fresh");
    let data_dir = string_arg(&args, "--data-dir").unwrap_or("./data");

    let config = GameConfig::load(data_dir)?;
    let mut storage: Box<dyn SaveStorage> = match string_arg(&args, "--db") {
        Some(db) => Box::new(SqliteStorage::open(db, "default")?),
        None => {
            let path = string_arg(&args, "--save")
                .map(str::to_string)
                .unwrap_or_else(|| format!("./saves/{}", config.save_file));
            Box::new(FileStorage::new(path))
        }
    };
    if fresh {
        storage.clear()?;
    }

    if !ipc_mode {
        println!("clicker-runner");
        println!("  seed:      {seed}");
        println!("  seconds:   {seconds}");
        println!("  storage:   {}", storage.describe());
        println!("  data_dir:  {data_dir}");
        println!();
    }

    let mut engine = GameEngine::boot(config, storage);
    log::info!("boot: {:?}", engine.load_outcome());

    if ipc_mode {
        run_ipc_loop(&mut engine)?;
    } else {
        run_headless(&mut engine, seed, seconds);
    }

    engine.shutdown()?;
    Ok(())
}

fn run_headless(engine: &mut GameEngine, seed: u64, seconds: u64) {
    let mut playback = DialoguePlayback::new();
    show_dialogue(&mut playback, &engine.sync());

    let mut policy = AutoplayPolicy::new(seed, AutoplayConfig::default());
    let summary = run_session(engine, &mut policy, seconds);

    for event_id in &summary.dialogue_fired {
        if let Some(event) = engine.dialogue().catalog().get(*event_id) {
            playback.show(*event_id, event.dialogue_texts.clone());
        }
    }
    while let Some(line) = playback.current() {
        log::info!("dialogue {:?}: {line}", playback.current_event());
        playback.advance();
    }

    let state = engine.state();
    println!("=== SESSION SUMMARY ===");
    println!("  seconds run:     {}", summary.seconds);
    println!("  commands:        {}", summary.commands);
    println!("  autosaves:       {}", summary.saves);
    println!("  revives:         {}", summary.revives);
    println!("  dialogue fired:  {:?}", summary.dialogue_fired);
    println!();
    println!("=== FINAL STATE ===");
    println!("  gold:            {}", state.gold());
    println!("  gold/click:      {}", state.gold_per_click());
    println!("  gold/second:     {}", state.gold_per_second());
    println!("  stage:           {}", state.stage());
    println!("  revive count:    {}", state.revive_count());
}

fn run_ipc_loop(engine: &mut GameEngine) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();
    let mut playback = DialoguePlayback::new();

    let boot_events = engine.sync();
    show_dialogue(&mut playback, &boot_events);
    write_state(&mut stdout, engine, &playback, &boot_events)?;

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        let events = match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetState => Vec::new(),
            IpcCommand::Command { command } => engine.apply(command),
            IpcCommand::Advance { millis } => engine.advance(Duration::from_millis(millis)),
            IpcCommand::NextLine => {
                playback.advance();
                Vec::new()
            }
            IpcCommand::Save => match engine.save() {
                Ok(saved) => vec![saved],
                Err(e) => {
                    let err_json = serde_json::json!({ "error": e.to_string() });
                    writeln!(stdout, "{}", err_json)?;
                    stdout.flush()?;
                    continue;
                }
            },
        };
        show_dialogue(&mut playback, &events);
        write_state(&mut stdout, engine, &playback, &events)?;
    }
    Ok(())
}

fn show_dialogue(playback: &mut DialoguePlayback, events: &[GameEvent]) {
    for event in events {
        if let GameEvent::DialogueTriggered { event_id, texts } = event {
            playback.show(*event_id, texts.clone());
        }
    }
}

fn write_state(
    stdout:   &mut io::Stdout,
    engine:   &GameEngine,
    playback: &DialoguePlayback,
    events:   &[GameEvent],
) -> Result<()> {
    let state = UiState {
        snapshot:      engine.snapshot(),
        dialogue_line: playback.current(),
        events:        events.iter().map(event_type_name).collect(),
    };
    writeln!(stdout, "{}", serde_json::to_string(&state)?)?;
    stdout.flush()?;
    Ok(())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn string_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
