//! SQLite store for highlights, import jobs and digests.
//!
//! Creates the schema on open. Timestamps are stored as unix nanoseconds, which
//! covers 1677 to 2262 without losing precision. Tags are a JSON array.

use super::{
    DigestRepository, HighlightRepository, ImportJobRepository, Result, StorageError, conflict,
};
use crate::models::{
    DigestPreview, Highlight, HighlightSource, ImportJob, ImportStatus, ReviewState,
};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const HIGHLIGHT_COLUMNS: &str = "id, user_id, source_id, source_title, author, text, location, \
     captured_at, tags, ease_factor, interval_days, mastery_score, review_count, \
     last_reviewed_at, next_review_at";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (or creates) the database file and makes sure the tables exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;
        tracing::debug!(path = %path.as_ref().display(), "opened highlight database");
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS highlights (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            source_id TEXT NOT NULL,
            source_title TEXT NOT NULL,
            author TEXT,
            text TEXT NOT NULL,
            location TEXT,
            captured_at INTEGER NOT NULL,
            tags TEXT NOT NULL DEFAULT '[]',
            ease_factor REAL NOT NULL DEFAULT 2.5,
            interval_days INTEGER NOT NULL DEFAULT 1,
            mastery_score REAL NOT NULL DEFAULT 0,
            review_count INTEGER NOT NULL DEFAULT 0,
            last_reviewed_at INTEGER,
            next_review_at INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_highlights_user_due
            ON highlights (user_id, next_review_at);

        CREATE TABLE IF NOT EXISTS import_jobs (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            source TEXT NOT NULL,
            status TEXT NOT NULL,
            submitted_at INTEGER NOT NULL,
            processed_at INTEGER,
            failure_reason TEXT
        );

        CREATE TABLE IF NOT EXISTS digests (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            scheduled_for INTEGER NOT NULL,
            highlight_count INTEGER NOT NULL,
            recently_added_count INTEGER NOT NULL
        );",
    )?;
    Ok(())
}

fn to_timestamp(time: DateTime<Utc>) -> Result<i64> {
    time.timestamp_nanos_opt().ok_or(StorageError::InvalidTimestamp(time))
}

fn from_timestamp(nanos: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_nanos(nanos)
}

fn to_count(value: i64, column: &str) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| StorageError::InvalidValue(format!("{column} = {value} is out of range")))
}

/// Raw column values, converted into a `Highlight` outside the row callback.
struct HighlightRow {
    id: String,
    user_id: String,
    source_id: String,
    source_title: String,
    author: Option<String>,
    text: String,
    location: Option<String>,
    captured_at: i64,
    tags: String,
    ease_factor: f64,
    interval_days: i64,
    mastery_score: f64,
    review_count: i64,
    last_reviewed_at: Option<i64>,
    next_review_at: i64,
}

impl HighlightRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            source_id: row.get(2)?,
            source_title: row.get(3)?,
            author: row.get(4)?,
            text: row.get(5)?,
            location: row.get(6)?,
            captured_at: row.get(7)?,
            tags: row.get(8)?,
            ease_factor: row.get(9)?,
            interval_days: row.get(10)?,
            mastery_score: row.get(11)?,
            review_count: row.get(12)?,
            last_reviewed_at: row.get(13)?,
            next_review_at: row.get(14)?,
        })
    }

    fn into_highlight(self) -> Result<Highlight> {
        Ok(Highlight {
            id: self.id,
            user_id: self.user_id,
            source_id: self.source_id,
            source_title: self.source_title,
            author: self.author,
            text: self.text,
            location: self.location,
            captured_at: from_timestamp(self.captured_at),
            tags: serde_json::from_str(&self.tags)?,
            review: ReviewState {
                ease_factor: self.ease_factor,
                interval_days: to_count(self.interval_days, "interval_days")?,
                mastery_score: self.mastery_score,
                review_count: to_count(self.review_count, "review_count")?,
                last_reviewed_at: self.last_reviewed_at.map(from_timestamp),
                next_review_at: from_timestamp(self.next_review_at),
            },
        })
    }
}

impl HighlightRepository for SqliteStore {
    fn insert_highlights(&self, highlights: &[Highlight]) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO highlights ({HIGHLIGHT_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)"
            ))?;

            for highlight in highlights {
                let review = &highlight.review;
                stmt.execute(params![
                    highlight.id,
                    highlight.user_id,
                    highlight.source_id,
                    highlight.source_title,
                    highlight.author,
                    highlight.text,
                    highlight.location,
                    to_timestamp(highlight.captured_at)?,
                    serde_json::to_string(&highlight.tags)?,
                    review.ease_factor,
                    i64::from(review.interval_days),
                    review.mastery_score,
                    i64::from(review.review_count),
                    review.last_reviewed_at.map(to_timestamp).transpose()?,
                    to_timestamp(review.next_review_at)?,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn get_highlight(&self, id: &str) -> Result<Highlight> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                &format!("SELECT {HIGHLIGHT_COLUMNS} FROM highlights WHERE id = ?1"),
                params![id],
                HighlightRow::from_row,
            )
            .optional()?
            .ok_or_else(|| StorageError::NotFound(format!("highlight {id}")))?;
        row.into_highlight()
    }

    fn list_highlights(&self, user_id: &str) -> Result<Vec<Highlight>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {HIGHLIGHT_COLUMNS} FROM highlights
             WHERE user_id = ?1
             ORDER BY captured_at DESC, id ASC"
        ))?;

        let rows = stmt
            .query_map(params![user_id], HighlightRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter().map(HighlightRow::into_highlight).collect()
    }

    fn update_review_state(
        &self,
        id: &str,
        expected_review_count: u32,
        state: &ReviewState,
    ) -> Result<()> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE highlights
             SET ease_factor = ?1, interval_days = ?2, mastery_score = ?3, review_count = ?4,
                 last_reviewed_at = ?5, next_review_at = ?6
             WHERE id = ?7 AND review_count = ?8",
            params![
                state.ease_factor,
                i64::from(state.interval_days),
                state.mastery_score,
                i64::from(state.review_count),
                state.last_reviewed_at.map(to_timestamp).transpose()?,
                to_timestamp(state.next_review_at)?,
                id,
                i64::from(expected_review_count),
            ],
        )?;

        if changed == 1 {
            return Ok(());
        }

        let found: Option<i64> = conn
            .query_row(
                "SELECT review_count FROM highlights WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;

        match found {
            None => Err(StorageError::NotFound(format!("highlight {id}"))),
            Some(found) => Err(conflict(
                id,
                expected_review_count,
                to_count(found, "review_count")?,
            )),
        }
    }

    fn delete_highlight(&self, id: &str) -> Result<()> {
        let changed = self
            .conn()?
            .execute("DELETE FROM highlights WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(StorageError::NotFound(format!("highlight {id}")));
        }
        Ok(())
    }
}

impl ImportJobRepository for SqliteStore {
    fn create_job(&self, job: &ImportJob) -> Result<()> {
        self.conn()?.execute(
            "INSERT INTO import_jobs (id, user_id, source, status, submitted_at, processed_at, failure_reason)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                job.id,
                job.user_id,
                job.source.as_str(),
                job.status.as_str(),
                to_timestamp(job.submitted_at)?,
                job.processed_at.map(to_timestamp).transpose()?,
                job.failure_reason,
            ],
        )?;
        Ok(())
    }

    fn update_job_status(
        &self,
        id: &str,
        status: ImportStatus,
        processed_at: DateTime<Utc>,
        failure_reason: Option<&str>,
    ) -> Result<()> {
        let changed = self.conn()?.execute(
            "UPDATE import_jobs SET status = ?1, processed_at = ?2, failure_reason = ?3 WHERE id = ?4",
            params![status.as_str(), to_timestamp(processed_at)?, failure_reason, id],
        )?;
        if changed == 0 {
            return Err(StorageError::NotFound(format!("import job {id}")));
        }
        Ok(())
    }

    fn list_jobs(&self, user_id: &str) -> Result<Vec<ImportJob>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, source, status, submitted_at, processed_at, failure_reason
             FROM import_jobs
             WHERE user_id = ?1
             ORDER BY submitted_at DESC, id ASC",
        )?;

        let rows = stmt
            .query_map(params![user_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, i64>(4)?,
                    row.get::<_, Option<i64>>(5)?,
                    row.get::<_, Option<String>>(6)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(
                |(id, user_id, source, status, submitted_at, processed_at, failure_reason)|
                 -> Result<ImportJob> {
                    Ok(ImportJob {
                        id,
                        user_id,
                        source: HighlightSource::parse(&source).ok_or_else(|| {
                            StorageError::InvalidValue(format!("unknown source {source:?}"))
                        })?,
                        status: ImportStatus::parse(&status).ok_or_else(|| {
                            StorageError::InvalidValue(format!("unknown import status {status:?}"))
                        })?,
                        submitted_at: from_timestamp(submitted_at),
                        processed_at: processed_at.map(from_timestamp),
                        failure_reason,
                    })
                },
            )
            .collect()
    }
}

impl DigestRepository for SqliteStore {
    fn save_digest(&self, digest: &DigestPreview) -> Result<()> {
        self.conn()?.execute(
            "INSERT OR REPLACE INTO digests (id, user_id, scheduled_for, highlight_count, recently_added_count)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                digest.id,
                digest.user_id,
                to_timestamp(digest.scheduled_for)?,
                digest.highlight_count as i64,
                digest.recently_added_count as i64,
            ],
        )?;
        Ok(())
    }

    fn latest_digest(&self, user_id: &str) -> Result<Option<DigestPreview>> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                "SELECT id, user_id, scheduled_for, highlight_count, recently_added_count
                 FROM digests
                 WHERE user_id = ?1
                 ORDER BY scheduled_for DESC, id ASC
                 LIMIT 1",
                params![user_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, i64>(2)?,
                        row.get::<_, i64>(3)?,
                        row.get::<_, i64>(4)?,
                    ))
                },
            )
            .optional()?;

        row.map(
            |(id, user_id, scheduled_for, highlight_count, recently_added_count)|
             -> Result<DigestPreview> {
                let actions = DigestPreview::actions_for(&id);
                Ok(DigestPreview {
                    id,
                    user_id,
                    scheduled_for: from_timestamp(scheduled_for),
                    highlight_count: to_count(highlight_count, "highlight_count")? as usize,
                    recently_added_count: to_count(recently_added_count, "recently_added_count")?
                        as usize,
                    actions,
                })
            },
        )
        .transpose()
    }
}
