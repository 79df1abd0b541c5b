//! Generation pipeline: render → generate → persist twice.

use crate::github::FileSink;
use crate::store::CourseStore;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use syllabus_shared::rpc::BackendStatus;
use syllabus_shared::template;
use syllabus_shared::{GenerationOutcome, GenerationRequest, Result};
use tracing::{error, info, warn};

/// Black-box text generation backend.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Make sure the backend is reachable and the model is loaded.
    async fn ensure_ready(&self) -> Result<()>;

    async fn generate(&self, prompt: &str) -> Result<String>;

    async fn status(&self) -> BackendStatus;
}

pub struct Pipeline {
    generator: Arc<dyn TextGenerator>,
    store: Arc<dyn CourseStore>,
    files: Arc<dyn FileSink>,
}

impl Pipeline {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        store: Arc<dyn CourseStore>,
        files: Arc<dyn FileSink>,
    ) -> Self {
        Self {
            generator,
            store,
            files,
        }
    }

    pub fn generator(&self) -> &Arc<dyn TextGenerator> {
        &self.generator
    }

    pub fn store(&self) -> &Arc<dyn CourseStore> {
        &self.store
    }

    pub fn files(&self) -> &Arc<dyn FileSink> {
        &self.files
    }

    /// Run one generation cycle.
    ///
    /// Errors only when no scenario was produced. Once generation succeeds
    /// both sinks are written independently and their results returned as-is.
    pub async fn run(&self, request: &GenerationRequest) -> Result<GenerationOutcome> {
        let started = Instant::now();
        let title = request.title();
        info!("Generating scenario for {:?} ({})", title, request.language);

        let prompt = template::render(request.language, &request.answers)?;

        if let Err(e) = self.generator.ensure_ready().await {
            error!("Backend not ready: {}", e);
            return Err(e);
        }
        let scenario = match self.generator.generate(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                error!("Generation failed for {:?}: {}", title, e);
                return Err(e);
            }
        };

        let (record, file) = tokio::join!(
            self.store.insert(title, &scenario, request.level()),
            self.files.commit(title, &scenario),
        );

        if let Err(e) = &record {
            warn!("Scenario for {:?} not saved to the course store: {}", title, e);
        }
        if let Err(e) = &file {
            warn!("Scenario for {:?} not committed: {}", title, e);
        }

        let elapsed = started.elapsed();
        info!("Scenario for {:?} generated in {:.1}s", title, elapsed.as_secs_f64());

        Ok(GenerationOutcome {
            scenario,
            record,
            file,
            elapsed,
        })
    }
}
