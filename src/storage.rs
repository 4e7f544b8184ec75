use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};

/// Whole-value string storage addressed by key, the shape of browser local
/// storage. `revision` counts writes so callers can tell whether anything
/// was persisted.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;
    fn revision(&self) -> u64;
    fn describe(&self) -> String;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value)
    }

    fn revision(&self) -> u64 {
        (**self).revision()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    items: HashMap<String, String>,
    revision: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `value` under `key`, at revision 0.
    pub fn with_item(key: &str, value: &str) -> Self {
        let mut items = HashMap::new();
        items.insert(key.to_string(), value.to_string());
        Self { items, revision: 0 }
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        self.revision += 1;
        Ok(())
    }

    fn revision(&self) -> u64 {
        self.revision
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

/// One `<key>.json` file per key. Writes go through a temp file and a rename.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
    revision: u64,
}

impl JsonFileStore {
    pub fn open(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("create store dir {}", dir.display()))?;
        Ok(Self {
            dir: dir.to_path_buf(),
            revision: 0,
        })
    }

    fn item_path(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.item_path(key);
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).with_context(|| format!("read {}", path.display())),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.item_path(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).with_context(|| format!("write {}", tmp.display()))?;
        fs::rename(&tmp, &path).with_context(|| format!("swap {}", path.display()))?;
        self.revision += 1;
        Ok(())
    }

    fn revision(&self) -> u64 {
        self.revision
    }

    fn describe(&self) -> String {
        format!("json:{}", self.dir.display())
    }
}

/// Items in a single `kv` table of a SQLite file.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    path: Option<PathBuf>,
    revision: u64,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create store dir {}", parent.display()))?;
        }
        let conn =
            Connection::open(path).with_context(|| format!("open sqlite db {}", path.display()))?;
        init_schema(&conn)?;
        let revision = max_revision(&conn)?;
        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
            revision,
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory sqlite db")?;
        init_schema(&conn)?;
        Ok(Self {
            conn,
            path: None,
            revision: 0,
        })
    }
}

fn max_revision(conn: &Connection) -> Result<u64> {
    let rev = conn
        .query_row("SELECT COALESCE(MAX(revision), 0) FROM kv", [], |row| {
            row.get::<_, i64>(0)
        })
        .context("read sqlite revision")?;
    Ok(rev.max(0) as u64)
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS kv (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            revision INTEGER NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )
    .context("create sqlite schema")?;
    Ok(())
}

impl KeyValueStore for SqliteStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()
            .with_context(|| format!("read item {key}"))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        let next = max_revision(&self.conn)?.max(self.revision) + 1;
        let now = chrono::Utc::now().to_rfc3339();
        self.conn
            .execute(
                r#"
                INSERT INTO kv (key, value, revision, updated_at)
                VALUES (?1, ?2, ?3, ?4)
                ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    revision = excluded.revision,
                    updated_at = excluded.updated_at
                "#,
                params![key, value, next as i64, now],
            )
            .with_context(|| format!("write item {key}"))?;
        self.revision = next;
        Ok(())
    }

    fn revision(&self) -> u64 {
        self.revision
    }

    fn describe(&self) -> String {
        match &self.path {
            Some(path) => format!("sqlite:{}", path.display()),
            None => "sqlite::memory:".to_string(),
        }
    }
}
