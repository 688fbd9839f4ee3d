//! Persistent storage using SQLite (rusqlite)
//!
//! Holds the progress of the daily puzzle so a player can close the game and
//! pick it up later the same day. Only the row for the current day is ever
//! read back; older rows are purged on open.

use crate::game::board::Placement;
use crate::game::session::Progress;
use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};

/// Current schema version. Bump this when making schema changes.
/// Version history:
/// - v1: meta and progress tables
const SCHEMA_VERSION: u32 = 1;

const DB_FILE: &str = "gridlock.db";

/// Errors that can occur during storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// Database error from SQLite
    Database(rusqlite::Error),
    /// Could not determine data directory
    NoDataDirectory,
    /// Failed to create data directory
    CreateDirFailed(std::io::Error),
    /// Schema version mismatch (future version)
    FutureSchemaVersion { found: u32, supported: u32 },
    /// A saved snapshot could not be parsed
    CorruptSnapshot(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Database(e) => write!(f, "database error: {}", e),
            StorageError::NoDataDirectory => write!(f, "could not determine data directory"),
            StorageError::CreateDirFailed(e) => write!(f, "failed to create data directory: {}", e),
            StorageError::FutureSchemaVersion { found, supported } => {
                write!(
                    f,
                    "database schema version {} is newer than supported version {}",
                    found, supported
                )
            }
            StorageError::CorruptSnapshot(s) => write!(f, "corrupt saved board: '{}'", s),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<rusqlite::Error> for StorageError {
    fn from(e: rusqlite::Error) -> Self {
        StorageError::Database(e)
    }
}

/// Handle to the progress database.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Open or create the database in `data_dir`, or in the OS-standard
    /// data directory when none is given:
    /// - Linux: `$XDG_DATA_HOME/gridlock/` or `~/.local/share/gridlock/`
    /// - macOS: `~/Library/Application Support/gridlock/`
    pub fn open(data_dir: Option<&Path>) -> Result<Self, StorageError> {
        let data_dir = match data_dir {
            Some(dir) => dir.to_path_buf(),
            None => Self::data_dir()?,
        };
        std::fs::create_dir_all(&data_dir).map_err(StorageError::CreateDirFailed)?;
        Self::open_at(&data_dir.join(DB_FILE))
    }

    /// Open or create the database file at `path`.
    pub fn open_at(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        let storage = Storage { conn };
        storage.initialize_schema()?;
        log::debug!("opened progress database at {}", path.display());
        Ok(storage)
    }

    /// Open an in-memory database (for testing).
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let storage = Storage { conn };
        storage.initialize_schema()?;
        Ok(storage)
    }

    /// Get the OS-standard data directory.
    pub fn data_dir() -> Result<PathBuf, StorageError> {
        ProjectDirs::from("", "", "gridlock")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or(StorageError::NoDataDirectory)
    }

    /// Record progress for puzzle `day`, replacing any earlier save.
    pub fn save_progress(&self, day: u32, progress: &Progress) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO progress (day, round, snapshot, saved_at) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(day) DO UPDATE SET round = ?2, snapshot = ?3, saved_at = ?4",
            params![
                day,
                progress.round as i64,
                encode_snapshot(&progress.placements),
                now_millis()
            ],
        )?;
        log::debug!("saved day {} round {}", day, progress.round);
        Ok(())
    }

    /// Progress saved for puzzle `day`, if any.
    pub fn load_progress(&self, day: u32) -> Result<Option<Progress>, StorageError> {
        let row: Option<(i64, String)> = self
            .conn
            .query_row(
                "SELECT round, snapshot FROM progress WHERE day = ?1",
                params![day],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((round, snapshot)) = row else {
            return Ok(None);
        };
        let round = usize::try_from(round)
            .map_err(|_| StorageError::CorruptSnapshot(format!("round {}", round)))?;
        Ok(Some(Progress {
            round,
            placements: parse_snapshot(&snapshot)?,
        }))
    }

    /// Delete saves for puzzles before `day`. Returns the number removed.
    pub fn purge_before(&self, day: u32) -> Result<usize, StorageError> {
        let removed = self
            .conn
            .execute("DELETE FROM progress WHERE day < ?1", params![day])?;
        if removed > 0 {
            log::debug!("purged {} old saves", removed);
        }
        Ok(removed)
    }

    // Private helper methods

    fn initialize_schema(&self) -> Result<(), StorageError> {
        let current_version = self.get_schema_version()?;

        if current_version == 0 {
            self.create_schema_v1()?;
        } else if current_version > SCHEMA_VERSION {
            return Err(StorageError::FutureSchemaVersion {
                found: current_version,
                supported: SCHEMA_VERSION,
            });
        }

        Ok(())
    }

    fn get_schema_version(&self) -> Result<u32, StorageError> {
        let table_exists: bool = self.conn.query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='meta'",
            [],
            |row| row.get(0),
        )?;

        if !table_exists {
            return Ok(0);
        }

        let version: Option<u32> = self
            .conn
            .query_row("SELECT schema_version FROM meta LIMIT 1", [], |row| row.get(0))
            .optional()?;

        Ok(version.unwrap_or(0))
    }

    fn create_schema_v1(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS meta (
                schema_version INTEGER NOT NULL,
                created_at INTEGER NOT NULL
            );

            -- One row per puzzle day; snapshot holds tile:slot pairs
            CREATE TABLE IF NOT EXISTS progress (
                day INTEGER PRIMARY KEY,
                round INTEGER NOT NULL,
                snapshot TEXT NOT NULL,
                saved_at INTEGER NOT NULL
            );
            "#,
        )?;

        self.conn.execute(
            "INSERT INTO meta (schema_version, created_at) VALUES (?1, ?2)",
            params![SCHEMA_VERSION, now_millis()],
        )?;

        Ok(())
    }
}

fn now_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Serialize placements as `tile:slot` pairs joined by commas.
pub fn encode_snapshot(placements: &[Placement]) -> String {
    placements
        .iter()
        .map(|p| format!("{}:{}", p.tile, p.slot))
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse the output of [`encode_snapshot`].
pub fn parse_snapshot(text: &str) -> Result<Vec<Placement>, StorageError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }
    text.split(',')
        .map(|pair| -> Result<Placement, StorageError> {
            let corrupt = || StorageError::CorruptSnapshot(pair.to_string());
            let (tile, slot) = pair.split_once(':').ok_or_else(corrupt)?;
            Ok(Placement {
                tile: tile.trim().parse().map_err(|_| corrupt())?,
                slot: slot.trim().parse().map_err(|_| corrupt())?,
            })
        })
        .collect()
}
