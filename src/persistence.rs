//! JSON save files under ~/.skijump/ and the best-score store.

use crate::constants::{SAVE_DIR_NAME, SCORES_FILE};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Get the ~/.skijump/ directory path, creating it if needed.
pub fn skijump_dir() -> io::Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            "Could not determine home directory",
        )
    })?;
    let dir = home_dir.join(SAVE_DIR_NAME);
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Get the full path for a save file in ~/.skijump/.
pub fn save_path(filename: &str) -> io::Result<PathBuf> {
    Ok(skijump_dir()?.join(filename))
}

/// Load a JSON file, returning `T::default()` if missing or invalid.
pub fn load_json_or_default<T: Default + serde::de::DeserializeOwned>(path: &Path) -> T {
    match fs::read_to_string(path) {
        Ok(json) => serde_json::from_str(&json).unwrap_or_default(),
        Err(_) => T::default(),
    }
}

/// Save a value as pretty-printed JSON.
pub fn save_json<T: serde::Serialize>(path: &Path, data: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(path, json)?;
    Ok(())
}

/// Where finished games report their totals.
///
/// The session only reads the best total at start and hands back each
/// finished total; storage is up to the implementation.
pub trait ScoreStore {
    fn best_total(&self) -> f64;

    /// Record a finished game. Returns true if it set a new best.
    fn submit_total(&mut self, total: f64, tier_label: &str) -> io::Result<bool>;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreRecord {
    pub best_total: f64,
    pub best_tier: Option<String>,
    /// RFC 3339 timestamp of the best game.
    pub best_at: Option<String>,
    pub games_played: u32,
}

impl ScoreRecord {
    fn submit(&mut self, total: f64, tier_label: &str) -> bool {
        self.games_played += 1;
        if total <= self.best_total {
            return false;
        }
        self.best_total = total;
        self.best_tier = Some(tier_label.to_string());
        self.best_at = Some(Utc::now().to_rfc3339());
        true
    }
}

/// Scores kept in `scores.json`, written after every finished game.
pub struct JsonScoreStore {
    path: PathBuf,
    record: ScoreRecord,
}

impl JsonScoreStore {
    /// Open ~/.skijump/scores.json. A missing or corrupt file starts fresh.
    pub fn open() -> io::Result<Self> {
        Ok(Self::at_path(save_path(SCORES_FILE)?))
    }

    pub fn at_path(path: PathBuf) -> Self {
        let record = load_json_or_default(&path);
        Self { path, record }
    }

    pub fn record(&self) -> &ScoreRecord {
        &self.record
    }
}

impl ScoreStore for JsonScoreStore {
    fn best_total(&self) -> f64 {
        self.record.best_total
    }

    fn submit_total(&mut self, total: f64, tier_label: &str) -> io::Result<bool> {
        let is_best = self.record.submit(total, tier_label);
        save_json(&self.path, &self.record)?;
        if is_best {
            log::info!("saved new best {:.1} to {}", total, self.path.display());
        }
        Ok(is_best)
    }
}

/// Store that never touches disk, for tests and the simulator.
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    pub record: ScoreRecord,
}

impl MemoryScoreStore {
    pub fn with_best(best_total: f64) -> Self {
        Self {
            record: ScoreRecord {
                best_total,
                ..Default::default()
            },
        }
    }
}

impl ScoreStore for MemoryScoreStore {
    fn best_total(&self) -> f64 {
        self.record.best_total
    }

    fn submit_total(&mut self, total: f64, tier_label: &str) -> io::Result<bool> {
        Ok(self.record.submit(total, tier_label))
    }
}
