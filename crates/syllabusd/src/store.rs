//! Course document store.
//!
//! `SqliteCourseStore` keeps a single connection behind a mutex and runs every
//! statement on the blocking pool.

use crate::config::StoreLocation;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection};
use std::sync::Arc;
use syllabus_shared::{CourseRecord, Result, SyllabusError};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Document sink for generated scenarios.
#[async_trait]
pub trait CourseStore: Send + Sync {
    /// Insert a new record stamped with the current time; returns its id.
    async fn insert(&self, title: &str, scenario: &str, level: &str) -> Result<String>;

    /// Newest records first, at most `limit`.
    async fn list_recent(&self, limit: usize) -> Result<Vec<CourseRecord>>;

    /// Distinct titles, most recently used first. Empty on any failure.
    async fn list_titles(&self) -> Vec<String>;
}

pub struct SqliteCourseStore {
    conn: Arc<Mutex<Connection>>,
    location: StoreLocation,
}

impl SqliteCourseStore {
    /// Open or create the database at `location`
    pub async fn open(location: StoreLocation) -> anyhow::Result<Self> {
        use anyhow::Context;

        if let StoreLocation::File(path) = &location {
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .context("Failed to create database directory")?;
            }
            info!("Opening course database at: {}", path.display());
        } else {
            info!("Opening in-memory course database");
        }

        let loc = location.clone();
        let conn = tokio::task::spawn_blocking(move || -> anyhow::Result<Connection> {
            let conn = match &loc {
                StoreLocation::Memory => Connection::open_in_memory(),
                StoreLocation::File(path) => Connection::open(path),
            }
            .context("Failed to open SQLite database")?;

            if matches!(loc, StoreLocation::File(_)) {
                conn.pragma_update(None, "journal_mode", "WAL")
                    .context("Failed to enable WAL mode")?;
            }

            conn.execute(
                "CREATE TABLE IF NOT EXISTS courses (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    title TEXT NOT NULL,
                    level TEXT NOT NULL,
                    scenario TEXT NOT NULL,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                )",
                [],
            )
            .context("Failed to create courses table")?;

            conn.execute(
                "CREATE INDEX IF NOT EXISTS idx_courses_created ON courses(created_at)",
                [],
            )
            .context("Failed to create courses index")?;

            Ok(conn)
        })
        .await??;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            location,
        })
    }

    pub fn location(&self) -> &StoreLocation {
        &self.location
    }

    /// Insert with an explicit creation time (imports and tests).
    ///
    /// Timestamps are stored as fixed-width RFC 3339 so text order is time order.
    pub async fn insert_at(
        &self,
        title: &str,
        scenario: &str,
        level: &str,
        at: DateTime<Utc>,
    ) -> Result<String> {
        let conn = Arc::clone(&self.conn);
        let (title, scenario, level) = (title.to_string(), scenario.to_string(), level.to_string());

        let id = tokio::task::spawn_blocking(move || -> rusqlite::Result<i64> {
            let conn = conn.blocking_lock();
            conn.execute(
                "INSERT INTO courses (title, level, scenario, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)",
                params![title, level, scenario, at.to_rfc3339_opts(SecondsFormat::Micros, true)],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(|e| SyllabusError::StoreWrite(e.to_string()))?
        .map_err(|e| SyllabusError::StoreWrite(e.to_string()))?;

        debug!("Inserted course record {}", id);
        Ok(id.to_string())
    }

    async fn query_titles(&self) -> std::result::Result<Vec<String>, String> {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || -> rusqlite::Result<Vec<String>> {
            let conn = conn.blocking_lock();
            let mut stmt =
                conn.prepare("SELECT title FROM courses GROUP BY title ORDER BY MAX(id) DESC")?;
            let titles = stmt
                .query_map([], |row| row.get::<_, String>(0))?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(titles)
        })
        .await
        .map_err(|e| e.to_string())?
        .map_err(|e| e.to_string())
    }
}

fn parse_timestamp(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

#[async_trait]
impl CourseStore for SqliteCourseStore {
    async fn insert(&self, title: &str, scenario: &str, level: &str) -> Result<String> {
        self.insert_at(title, scenario, level, Utc::now()).await
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<CourseRecord>> {
        let conn = Arc::clone(&self.conn);
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        tokio::task::spawn_blocking(move || -> rusqlite::Result<Vec<CourseRecord>> {
            let conn = conn.blocking_lock();
            let mut stmt = conn.prepare(
                "SELECT id, title, level, scenario, created_at, updated_at
                 FROM courses
                 ORDER BY created_at DESC, id DESC
                 LIMIT ?1",
            )?;
            let rows = stmt.query_map(params![limit], |row| {
                let created: String = row.get(4)?;
                let updated: String = row.get(5)?;
                Ok(CourseRecord {
                    id: row.get::<_, i64>(0)?.to_string(),
                    title: row.get(1)?,
                    level: row.get(2)?,
                    scenario: row.get(3)?,
                    created_at: parse_timestamp(4, &created)?,
                    updated_at: parse_timestamp(5, &updated)?,
                })
            })?;
            let records = rows.collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(records)
        })
        .await
        .map_err(|e| SyllabusError::StoreRead(e.to_string()))?
        .map_err(|e| SyllabusError::StoreRead(e.to_string()))
    }

    async fn list_titles(&self) -> Vec<String> {
        match self.query_titles().await {
            Ok(titles) => titles,
            Err(e) => {
                warn!("Failed to list course titles: {}", e);
                Vec::new()
            }
        }
    }
}
