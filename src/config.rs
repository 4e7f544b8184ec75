use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;

use crate::storage::{JsonFileStore, KeyValueStore, MemoryStore, SqliteStore};

const DATA_DIR: &str = "timglas_terminal";
const SQLITE_FILE: &str = "board.sqlite";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Sqlite,
    Json,
    Memory,
}

impl StorageKind {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "sqlite" | "db" => Some(StorageKind::Sqlite),
            "json" | "file" => Some(StorageKind::Json),
            "memory" | "mem" => Some(StorageKind::Memory),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub storage: StorageKind,
    pub data_dir: Option<PathBuf>,
    pub tick_rate: Duration,
    pub flow_duration: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageKind::Sqlite,
            data_dir: default_data_dir(),
            tick_rate: Duration::from_millis(100),
            flow_duration: Duration::from_millis(600),
        }
    }
}

impl Config {
    /// Read `TIMGLAS_*` variables. Call `dotenvy` first if `.env` files
    /// should be honoured.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let storage = lookup("TIMGLAS_STORAGE")
            .and_then(|val| StorageKind::parse(&val))
            .unwrap_or(defaults.storage);
        let data_dir = lookup("TIMGLAS_DATA_DIR")
            .filter(|val| !val.trim().is_empty())
            .map(PathBuf::from)
            .or(defaults.data_dir);
        let tick_ms = lookup("TIMGLAS_TICK_MS")
            .and_then(|val| val.trim().parse::<u64>().ok())
            .unwrap_or(100)
            .max(16);
        let flow_ms = lookup("TIMGLAS_FLOW_MS")
            .and_then(|val| val.trim().parse::<u64>().ok())
            .unwrap_or(600)
            .max(100);
        Self {
            storage,
            data_dir,
            tick_rate: Duration::from_millis(tick_ms),
            flow_duration: Duration::from_millis(flow_ms),
        }
    }

    /// Open the configured store. Without a data directory only the memory
    /// store is available.
    pub fn open_store(&self) -> Result<Box<dyn KeyValueStore>> {
        let Some(dir) = self.data_dir.as_ref() else {
            return Ok(Box::new(MemoryStore::new()));
        };
        let store: Box<dyn KeyValueStore> = match self.storage {
            StorageKind::Sqlite => Box::new(SqliteStore::open(&dir.join(SQLITE_FILE))?),
            StorageKind::Json => Box::new(JsonFileStore::open(dir)?),
            StorageKind::Memory => Box::new(MemoryStore::new()),
        };
        Ok(store)
    }
}

fn default_data_dir() -> Option<PathBuf> {
    // Prefer XDG data.
    if let Ok(base) = std::env::var("XDG_DATA_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(DATA_DIR));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".local")
            .join("share")
            .join(DATA_DIR),
    )
}
