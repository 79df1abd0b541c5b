//! Test doubles shared by the daemon integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use syllabus_shared::rpc::BackendStatus;
use syllabus_shared::{CourseRecord, Result, SyllabusError};
use syllabusd::config::StoreLocation;
use syllabusd::github::FileSink;
use syllabusd::pipeline::{Pipeline, TextGenerator};
use syllabusd::store::{CourseStore, SqliteCourseStore};

/// Generator returning a canned scenario or a canned failure.
pub struct FakeGenerator {
    fail_with: Option<fn() -> SyllabusError>,
    delay: Option<Duration>,
    pub prompts: Mutex<Vec<String>>,
}

impl FakeGenerator {
    pub fn ok() -> Self {
        Self {
            fail_with: None,
            delay: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(err: fn() -> SyllabusError) -> Self {
        Self {
            fail_with: Some(err),
            ..Self::ok()
        }
    }

    /// Succeeds after sleeping for `delay`
    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::ok()
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn ensure_ready(&self) -> Result<()> {
        Ok(())
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.fail_with {
            Some(err) => Err(err()),
            None => Ok(format!("SCENARIO[{}]", prompt.lines().count())),
        }
    }

    async fn status(&self) -> BackendStatus {
        BackendStatus {
            url: "fake://".to_string(),
            reachable: true,
            model: "fake".to_string(),
            model_present: true,
        }
    }
}

/// File sink that records commits, optionally failing each one.
#[derive(Default)]
pub struct FakeFileSink {
    pub fail: bool,
    pub commits: Mutex<Vec<String>>,
}

#[async_trait]
impl FileSink for FakeFileSink {
    async fn commit(&self, title: &str, _scenario: &str) -> Result<Option<String>> {
        self.commits.lock().unwrap().push(title.to_string());
        if self.fail {
            Err(SyllabusError::RemoteCommit(format!("{} already exists", title)))
        } else {
            Ok(Some(format!("scenarios/{}.md", title)))
        }
    }

    fn is_configured(&self) -> bool {
        true
    }
}

/// Store whose writes and reads always fail.
#[derive(Default)]
pub struct BrokenStore {
    pub attempts: AtomicUsize,
}

#[async_trait]
impl CourseStore for BrokenStore {
    async fn insert(&self, _title: &str, _scenario: &str, _level: &str) -> Result<String> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(SyllabusError::StoreWrite("database is locked".to_string()))
    }

    async fn list_recent(&self, _limit: usize) -> Result<Vec<CourseRecord>> {
        Err(SyllabusError::StoreRead("database is locked".to_string()))
    }

    async fn list_titles(&self) -> Vec<String> {
        Vec::new()
    }
}

pub async fn memory_store() -> Arc<SqliteCourseStore> {
    Arc::new(SqliteCourseStore::open(StoreLocation::Memory).await.unwrap())
}

pub fn pipeline(
    generator: Arc<FakeGenerator>,
    store: Arc<dyn CourseStore>,
    files: Arc<dyn FileSink>,
) -> Pipeline {
    Pipeline::new(generator, store, files)
}
