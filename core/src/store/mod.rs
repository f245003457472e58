//! Save storage: the opaque byte sink/source behind the save codec.
//!
//! RULE: Only the store touches the filesystem or the database.
//! The codec hands it finished bytes and gets bytes back; it never
//! interprets them.

use crate::error::GameResult;
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

mod sqlite;

pub use sqlite::SqliteStorage;

pub const DEFAULT_SAVE_FILE: &str = "save_game.json";

pub trait SaveStorage: Send {
    /// Human-readable location, for logs.
    fn describe(&self) -> String;

    /// The last written bytes, or None if nothing has been saved yet.
    fn read(&self) -> GameResult<Option<Vec<u8>>>;

    fn write(&mut self, bytes: &[u8]) -> GameResult<()>;

    /// Forget the save entirely. The next read is a first run.
    fn clear(&mut self) -> GameResult<()>;
}

// ── File ───────────────────────────────────────────────────────

/// A single JSON file, replaced atomically on every write.
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SaveStorage for FileStorage {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn read(&self) -> GameResult<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, bytes: &[u8]) -> GameResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        // Write to a temp file first, then rename over the old save.
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, bytes)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn clear(&mut self) -> GameResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ── Memory ─────────────────────────────────────────────────────

/// In-memory storage (used in tests).
#[derive(Debug, Default)]
pub struct MemoryStorage {
    bytes:  Option<Vec<u8>>,
    writes: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that already holds a save, as if from a previous session.
    pub fn with_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self { bytes: Some(bytes.into()), writes: 0 }
    }

    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl SaveStorage for MemoryStorage {
    fn describe(&self) -> String {
        "memory".to_string()
    }

    fn read(&self) -> GameResult<Option<Vec<u8>>> {
        Ok(self.bytes.clone())
    }

    fn write(&mut self, bytes: &[u8]) -> GameResult<()> {
        self.bytes = Some(bytes.to_vec());
        self.writes += 1;
        Ok(())
    }

    fn clear(&mut self) -> GameResult<()> {
        self.bytes = None;
        Ok(())
    }
}
