//! SQLite implementation of the recording repository.

use std::path::Path;

use rusqlite::{params, Connection};

use crate::models::error::AudioVaultError;
use crate::models::recording::{NewRecording, Recording, RecordingPayload};
use crate::traits::repository::RecordingRepository;

/// Recording store backed by a single SQLite database.
///
/// Schema is created on open. One row per recording:
/// `(id, user_id, name, timestamp, duration, audio, encryption_key, audio_hash)`
/// where `audio` is the sealed ciphertext, `encryption_key` the base64 key,
/// and `audio_hash` the plaintext SHA-256 hex digest.
pub struct SqliteRecordingRepository {
    conn: Connection,
}

impl SqliteRecordingRepository {
    /// Open (or create) a file-backed database. Enables WAL mode.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, AudioVaultError> {
        let conn = Connection::open(path).map_err(map_sql)?;
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(map_sql)?;
        let repo = Self { conn };
        repo.init_schema()?;
        Ok(repo)
    }

    /// In-memory database, for tests and ephemeral use.
    pub fn open_in_memory() -> Result<Self, AudioVaultError> {
        let conn = Connection::open_in_memory().map_err(map_sql)?;
        let repo = Self { conn };
        repo.init_schema()?;
        Ok(repo)
    }

    fn init_schema(&self) -> Result<(), AudioVaultError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS recordings (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id INTEGER NOT NULL,
                    name TEXT NOT NULL,
                    timestamp TEXT NOT NULL,
                    duration INTEGER NOT NULL,
                    audio BLOB NOT NULL,
                    encryption_key TEXT NOT NULL,
                    audio_hash TEXT NOT NULL
                );
                CREATE INDEX IF NOT EXISTS recordings_owner_idx
                    ON recordings(user_id, timestamp);",
            )
            .map_err(map_sql)
    }
}

impl RecordingRepository for SqliteRecordingRepository {
    fn save(&self, recording: NewRecording) -> Result<i64, AudioVaultError> {
        self.conn
            .execute(
                "INSERT INTO recordings
                    (user_id, name, timestamp, duration, audio, encryption_key, audio_hash)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    recording.owner_id,
                    recording.name,
                    recording.timestamp,
                    recording.duration_secs,
                    recording.ciphertext,
                    recording.encoded_key,
                    recording.digest_hex,
                ],
            )
            .map_err(map_sql)?;
        Ok(self.conn.last_insert_rowid())
    }

    fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Recording>, AudioVaultError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, user_id, name, timestamp, duration
                 FROM recordings WHERE user_id = ?1
                 ORDER BY timestamp DESC, id DESC",
            )
            .map_err(map_sql)?;

        let rows = stmt
            .query_map(params![owner_id], |row| {
                Ok(Recording {
                    id: row.get(0)?,
                    owner_id: row.get(1)?,
                    name: row.get(2)?,
                    timestamp: row.get(3)?,
                    duration_secs: row.get(4)?,
                })
            })
            .map_err(map_sql)?;

        rows.collect::<Result<Vec<_>, _>>().map_err(map_sql)
    }

    fn load_payload(&self, id: i64) -> Result<RecordingPayload, AudioVaultError> {
        self.conn
            .query_row(
                "SELECT audio, encryption_key, audio_hash FROM recordings WHERE id = ?1",
                params![id],
                |row| {
                    Ok(RecordingPayload {
                        ciphertext: row.get(0)?,
                        encoded_key: row.get(1)?,
                        digest_hex: row.get(2)?,
                    })
                },
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => AudioVaultError::NotFound(id),
                other => map_sql(other),
            })
    }

    fn delete(&self, id: i64) -> Result<(), AudioVaultError> {
        let changed = self
            .conn
            .execute("DELETE FROM recordings WHERE id = ?1", params![id])
            .map_err(map_sql)?;
        if changed == 0 {
            return Err(AudioVaultError::NotFound(id));
        }
        Ok(())
    }
}

fn map_sql(e: rusqlite::Error) -> AudioVaultError {
    AudioVaultError::Repository(e.to_string())
}
