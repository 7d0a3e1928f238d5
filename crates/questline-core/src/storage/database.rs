//! SQLite-based persistence.
//!
//! Provides persistent storage for:
//! - The progression counters (via the key-value store, see
//!   [`super::progress`])
//! - A log of completed challenges
//! - Aggregated statistics (all-time and today)

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, DatabaseError};
use crate::progression::{ChallengeKind, ChallengeTemplate};

use super::data_dir;

/// One completed challenge, as logged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub id: i64,
    pub kind: String,
    pub description: String,
    pub amount: u32,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Stats {
    pub total_completions: u64,
    pub total_xp: u64,
    pub body_completions: u64,
    pub eye_completions: u64,
    pub today_completions: u64,
    pub today_xp: u64,
}

/// SQLite database holding the kv store and the completion log.
#[derive(Debug)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `data_dir()/questline.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the data directory is unavailable or the
    /// database cannot be opened or migrated.
    pub fn open() -> Result<Self, CoreError> {
        Ok(Self::open_at(&data_dir()?.join("questline.db"))?)
    }

    /// Open a database at an explicit path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &std::path::Path) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS completions (
                id           INTEGER PRIMARY KEY AUTOINCREMENT,
                kind         TEXT NOT NULL,
                description  TEXT NOT NULL DEFAULT '',
                amount       INTEGER NOT NULL,
                completed_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_completions_completed_at
                ON completions(completed_at);
            CREATE INDEX IF NOT EXISTS idx_completions_kind
                ON completions(kind);",
        )
        .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(())
    }

    /// Log a completed challenge.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn record_completion(
        &self,
        challenge: &ChallengeTemplate,
        completed_at: DateTime<Utc>,
    ) -> Result<i64, DatabaseError> {
        let kind_str = match challenge.kind {
            ChallengeKind::Body => "body",
            ChallengeKind::Eye => "eye",
        };
        self.conn.execute(
            "INSERT INTO completions (kind, description, amount, completed_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                kind_str,
                challenge.description,
                challenge.amount,
                completed_at.to_rfc3339(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// The most recent completions, newest first.
    pub fn recent_completions(&self, limit: u32) -> Result<Vec<CompletionRecord>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, kind, description, amount, completed_at
             FROM completions
             ORDER BY completed_at DESC, id DESC
             LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, u32>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (id, kind, description, amount, completed_at) = row?;
            let completed_at = DateTime::parse_from_rfc3339(&completed_at)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now());
            records.push(CompletionRecord {
                id,
                kind,
                description,
                amount,
                completed_at,
            });
        }
        Ok(records)
    }

    pub fn stats_all(&self) -> Result<Stats, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT kind, COUNT(*), COALESCE(SUM(amount), 0)
             FROM completions
             GROUP BY kind",
        )?;

        let mut stats = Stats::default();
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, u64>(1)?,
                row.get::<_, u64>(2)?,
            ))
        })?;

        for row in rows {
            let (kind, count, xp) = row?;
            stats.total_completions += count;
            stats.total_xp += xp;
            match kind.as_str() {
                "body" => stats.body_completions += count,
                "eye" => stats.eye_completions += count,
                _ => {}
            }
        }

        // Today's completions.
        let today = Utc::now().format("%Y-%m-%d").to_string();
        let mut stmt2 = self.conn.prepare(
            "SELECT COUNT(*), COALESCE(SUM(amount), 0)
             FROM completions
             WHERE completed_at >= ?1",
        )?;
        let row = stmt2.query_row(params![format!("{today}T00:00:00+00:00")], |row| {
            Ok((row.get::<_, u64>(0)?, row.get::<_, u64>(1)?))
        })?;
        stats.today_completions = row.0;
        stats.today_xp = row.1;

        Ok(stats)
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Delete a value from the kv store.
    pub fn kv_delete(&self, key: &str) -> Result<(), DatabaseError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(kind: ChallengeKind, amount: u32) -> ChallengeTemplate {
        ChallengeTemplate {
            kind,
            description: "test".into(),
            amount,
        }
    }

    #[test]
    fn record_and_aggregate() {
        let db = Database::open_memory().unwrap();
        let now = Utc::now();
        db.record_completion(&template(ChallengeKind::Body, 40), now)
            .unwrap();
        db.record_completion(&template(ChallengeKind::Eye, 30), now)
            .unwrap();

        let stats = db.stats_all().unwrap();
        assert_eq!(stats.total_completions, 2);
        assert_eq!(stats.total_xp, 70);
        assert_eq!(stats.body_completions, 1);
        assert_eq!(stats.eye_completions, 1);
        assert_eq!(stats.today_completions, 2);
    }

    #[test]
    fn recent_completions_newest_first() {
        let db = Database::open_memory().unwrap();
        let base = Utc::now();
        db.record_completion(&template(ChallengeKind::Body, 10), base)
            .unwrap();
        db.record_completion(
            &template(ChallengeKind::Eye, 20),
            base + chrono::Duration::minutes(1),
        )
        .unwrap();

        let records = db.recent_completions(10).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].amount, 20);
        assert_eq!(records[1].amount, 10);
    }

    #[test]
    fn open_failure_reports_the_path() {
        let err = Database::open_at(std::path::Path::new("/nonexistent/dir/questline.db"))
            .unwrap_err();
        match err {
            DatabaseError::OpenFailed { path, .. } => {
                assert!(path.ends_with("questline.db"));
            }
            other => panic!("Expected OpenFailed, got {other:?}"),
        }
    }

    #[test]
    fn file_backed_db_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("questline.db");
        {
            let db = Database::open_at(&path).unwrap();
            db.kv_set("level", "4").unwrap();
        }
        let db = Database::open_at(&path).unwrap();
        assert_eq!(db.kv_get("level").unwrap().as_deref(), Some("4"));
    }

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
        db.kv_set("test", "hello").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "hello");
        db.kv_delete("test").unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
    }
}
