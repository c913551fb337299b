use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use rusqlite_migration::{Migrations, M};

use crate::app::{Result, SkimmerError};
use crate::store::{RunMode, RunRecord, RunStore};

const RUN_COLUMNS: &str =
    "id, started_at, finished_at, mode, page_url, post_count, succeeded, error";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    fn run_migrations(&self) -> Result<()> {
        let migrations = Migrations::new(vec![M::up(include_str!(
            "../../migrations/001-initial/up.sql"
        ))]);

        let mut conn = self.conn()?;
        migrations
            .to_latest(&mut conn)
            .map_err(|_| SkimmerError::Database(rusqlite::Error::InvalidQuery))?;

        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| {
            SkimmerError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(1),
                Some(e.to_string()),
            ))
        })
    }

    fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| s.parse::<DateTime<Utc>>().ok())
    }

    fn row_to_run(row: &Row<'_>) -> rusqlite::Result<RunRecord> {
        let started_at: String = row.get(1)?;
        let finished_at: String = row.get(2)?;
        let mode: String = row.get(3)?;
        let post_count: i64 = row.get(5)?;

        Ok(RunRecord {
            id: row.get(0)?,
            started_at: Self::parse_datetime(&started_at).unwrap_or_default(),
            finished_at: Self::parse_datetime(&finished_at).unwrap_or_default(),
            mode: RunMode::parse(&mode).unwrap_or(RunMode::Range),
            page_url: row.get(4)?,
            post_count: post_count.max(0) as usize,
            succeeded: row.get(6)?,
            error: row.get(7)?,
        })
    }
}

impl RunStore for SqliteStore {
    fn record_run(&self, run: &RunRecord) -> Result<i64> {
        let conn = self.conn()?;

        conn.execute(
            "INSERT INTO runs (started_at, finished_at, mode, page_url, post_count, succeeded, error)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                run.started_at.to_rfc3339(),
                run.finished_at.to_rfc3339(),
                run.mode.as_str(),
                run.page_url,
                run.post_count as i64,
                run.succeeded,
                run.error,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    fn last_successful_run(&self) -> Result<Option<RunRecord>> {
        let conn = self.conn()?;

        let result = conn
            .query_row(
                &format!(
                    "SELECT {} FROM runs WHERE succeeded = 1 ORDER BY finished_at DESC, id DESC LIMIT 1",
                    RUN_COLUMNS
                ),
                [],
                Self::row_to_run,
            )
            .optional()?;

        Ok(result)
    }

    fn recent_runs(&self, limit: usize) -> Result<Vec<RunRecord>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM runs ORDER BY finished_at DESC, id DESC LIMIT ?1",
            RUN_COLUMNS
        ))?;

        let runs = stmt
            .query_map(params![limit as i64], Self::row_to_run)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(runs)
    }
}
