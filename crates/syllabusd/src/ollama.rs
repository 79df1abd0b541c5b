//! Ollama management - probe, start, pull models and generate text.

use crate::config::{GenerationConfig, OllamaConfig};
use crate::pipeline::TextGenerator;
use async_trait::async_trait;
use serde::Deserialize;
use std::process::Stdio;
use std::time::Duration;
use syllabus_shared::rpc::BackendStatus;
use syllabus_shared::{Result, SyllabusError};
use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

const PROBE_TIMEOUT: Duration = Duration::from_secs(2);
const TAGS_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagEntry>,
}

#[derive(Debug, Deserialize)]
struct TagEntry {
    name: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// A backend process started by the daemon.
///
/// Dropping the handle kills the process; [`BackendHandle::shutdown`] does
/// the same and waits for it to exit.
#[derive(Debug)]
pub struct BackendHandle {
    child: Child,
}

impl BackendHandle {
    pub fn pid(&self) -> Option<u32> {
        self.child.id()
    }

    pub async fn shutdown(mut self) {
        match self.child.kill().await {
            Ok(()) => info!("Stopped Ollama backend"),
            Err(e) => warn!("Failed to stop Ollama backend: {}", e),
        }
    }
}

/// Client for a local Ollama server.
pub struct OllamaGateway {
    client: reqwest::Client,
    config: OllamaConfig,
    generation: GenerationConfig,
    /// Set when this gateway spawned the backend itself
    backend: Mutex<Option<BackendHandle>>,
}

impl OllamaGateway {
    pub fn new(config: OllamaConfig, generation: GenerationConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| SyllabusError::BackendUnavailable(format!("http client: {}", e)))?;
        Ok(Self {
            client,
            config,
            generation,
            backend: Mutex::new(None),
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.url.trim_end_matches('/'), path)
    }

    /// Check if the Ollama API answers the tags probe
    pub async fn is_running(&self) -> bool {
        self.client
            .get(self.endpoint("/api/tags"))
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    /// Start `ollama serve` and wait the warm-up interval.
    async fn start_backend(&self) -> Result<BackendHandle> {
        info!("Starting Ollama backend with {} serve", self.config.bin);

        let child = Command::new(&self.config.bin)
            .arg("serve")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                SyllabusError::BackendUnavailable(format!(
                    "failed to spawn {} serve: {}",
                    self.config.bin, e
                ))
            })?;

        tokio::time::sleep(Duration::from_secs(self.generation.warmup_secs)).await;
        Ok(BackendHandle { child })
    }

    /// Names of the locally available models
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let response = self
            .client
            .get(self.endpoint("/api/tags"))
            .timeout(TAGS_TIMEOUT)
            .send()
            .await
            .map_err(|e| SyllabusError::ModelLoad(format!("listing models: {}", e)))?;

        if !response.status().is_success() {
            return Err(SyllabusError::ModelLoad(format!(
                "listing models: HTTP {}",
                response.status()
            )));
        }

        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|e| SyllabusError::ModelLoad(format!("parsing model list: {}", e)))?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    /// Run `ollama pull` and block until it finishes
    async fn pull_model(&self) -> Result<()> {
        let model = &self.config.model;
        info!("Pulling model: {}", model);

        let output = Command::new(&self.config.bin)
            .args(["pull", model])
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| SyllabusError::ModelLoad(format!("failed to run {} pull: {}", self.config.bin, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SyllabusError::ModelLoad(format!(
                "pull {} exited with {}: {}",
                model,
                output.status,
                stderr.trim()
            )));
        }

        info!("Model {} pulled successfully", model);
        Ok(())
    }

    /// Take ownership of the spawned backend, if any.
    pub async fn take_backend(&self) -> Option<BackendHandle> {
        self.backend.lock().await.take()
    }

    /// Stop a backend this gateway started. Externally managed backends are left alone.
    pub async fn shutdown(&self) {
        if let Some(handle) = self.take_backend().await {
            handle.shutdown().await;
        }
    }
}

/// `qwen3` matches `qwen3:latest`; tagged names must match exactly.
fn model_matches(available: &str, wanted: &str) -> bool {
    if available == wanted {
        return true;
    }
    !wanted.contains(':') && available == format!("{}:latest", wanted)
}

#[async_trait]
impl TextGenerator for OllamaGateway {
    async fn ensure_ready(&self) -> Result<()> {
        // Held for the whole check so concurrent callers never spawn twice.
        let mut backend = self.backend.lock().await;

        if !self.is_running().await {
            if !self.config.managed {
                return Err(SyllabusError::BackendUnavailable(format!(
                    "{} is not reachable",
                    self.config.url
                )));
            }

            let handle = self.start_backend().await?;
            if !self.is_running().await {
                error!("Ollama backend did not come up after warm-up");
                handle.shutdown().await;
                return Err(SyllabusError::BackendUnavailable(format!(
                    "{} still unreachable after starting {}",
                    self.config.url, self.config.bin
                )));
            }
            info!("Ollama backend started (pid {:?})", handle.pid());
            *backend = Some(handle);
        }

        let models = self.list_models().await?;
        if models.iter().any(|m| model_matches(m, &self.config.model)) {
            debug!("Model {} already available", self.config.model);
            return Ok(());
        }

        self.pull_model().await
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let timeout_secs = self.generation.timeout_secs;
        let body = serde_json::json!({
            "model": self.config.model,
            "prompt": prompt,
            "stream": false,
            "options": {
                "temperature": self.generation.temperature,
                "top_p": self.generation.top_p,
                "top_k": self.generation.top_k,
            }
        });

        debug!("Sending {} byte prompt to {}", prompt.len(), self.config.model);

        let response = self
            .client
            .post(self.endpoint("/api/generate"))
            .timeout(Duration::from_secs(timeout_secs))
            .json(&body)
            .send()
            .await
            .map_err(|e| classify(e, timeout_secs))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(SyllabusError::Generation(format!(
                "Ollama request failed: {} {}",
                status,
                detail.trim()
            )));
        }

        let parsed: GenerateResponse = response.json().await.map_err(|e| classify(e, timeout_secs))?;
        Ok(parsed.response)
    }

    async fn status(&self) -> BackendStatus {
        let reachable = self.is_running().await;
        let model_present = if reachable {
            self.list_models()
                .await
                .map(|models| models.iter().any(|m| model_matches(m, &self.config.model)))
                .unwrap_or(false)
        } else {
            false
        };

        BackendStatus {
            url: self.config.url.clone(),
            reachable,
            model: self.config.model.clone(),
            model_present,
        }
    }
}

fn classify(e: reqwest::Error, timeout_secs: u64) -> SyllabusError {
    if e.is_timeout() {
        SyllabusError::GenerationTimeout(timeout_secs)
    } else {
        SyllabusError::Generation(e.to_string())
    }
}
