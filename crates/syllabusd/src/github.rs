//! GitHub file sink.
//!
//! Commits each scenario as a new Markdown file through the contents API.
//! Files are only ever created: the request carries no blob `sha`, so GitHub
//! rejects a path that already exists instead of overwriting it.

use crate::config::GitHubConfig;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::time::Duration;
use syllabus_shared::slug::scenario_path;
use syllabus_shared::{Result, SyllabusError};
use tracing::{debug, info, warn};

const COMMIT_TIMEOUT: Duration = Duration::from_secs(30);

/// Remote file sink for generated scenarios.
#[async_trait]
pub trait FileSink: Send + Sync {
    /// Commit `scenario` as a new file; `Ok(None)` when the sink is disabled.
    async fn commit(&self, title: &str, scenario: &str) -> Result<Option<String>>;

    fn is_configured(&self) -> bool;
}

#[derive(Debug, Serialize)]
struct CreateFileRequest<'a> {
    message: String,
    content: String,
    branch: &'a str,
}

pub struct GitHubFileSink {
    client: reqwest::Client,
    config: Option<GitHubConfig>,
    user_agent: String,
}

impl GitHubFileSink {
    pub fn new(config: Option<GitHubConfig>) -> Self {
        if let Some(cfg) = &config {
            info!("Scenario files will be committed to {}@{}", cfg.full_name(), cfg.branch);
        } else {
            info!("GitHub persistence disabled (no token/repository configured)");
        }
        Self {
            client: reqwest::Client::new(),
            config,
            user_agent: format!("syllabusd/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Sink that never writes anything
    pub fn disabled() -> Self {
        Self::new(None)
    }

    /// Commit using an explicit date for the file name.
    pub async fn commit_on(
        &self,
        title: &str,
        scenario: &str,
        date: NaiveDate,
    ) -> Result<Option<String>> {
        let Some(cfg) = &self.config else {
            return Ok(None);
        };

        let path = scenario_path(title, date);
        let url = format!(
            "{}/repos/{}/{}/contents/{}",
            cfg.api_url.trim_end_matches('/'),
            cfg.owner,
            cfg.repo,
            path
        );
        let body = CreateFileRequest {
            message: format!("Add scenario for {}", title),
            content: BASE64.encode(scenario.as_bytes()),
            branch: &cfg.branch,
        };

        debug!("PUT {}", url);
        let response = self
            .client
            .put(&url)
            .bearer_auth(&cfg.token)
            .header("User-Agent", &self.user_agent)
            .header("Accept", "application/vnd.github+json")
            .timeout(COMMIT_TIMEOUT)
            .json(&body)
            .send()
            .await
            .map_err(|e| SyllabusError::RemoteCommit(format!("{}: {}", path, e)))?;

        let status = response.status();
        if status.is_success() {
            info!("Committed {} to {}", path, cfg.full_name());
            return Ok(Some(path));
        }

        let detail = response.text().await.unwrap_or_default();
        warn!("GitHub rejected {}: {} {}", path, status, detail.trim());

        if status == reqwest::StatusCode::UNPROCESSABLE_ENTITY
            || status == reqwest::StatusCode::CONFLICT
        {
            return Err(SyllabusError::RemoteCommit(format!(
                "{} already exists in {}",
                path,
                cfg.full_name()
            )));
        }

        Err(SyllabusError::RemoteCommit(format!(
            "{}: GitHub API returned {}",
            path, status
        )))
    }
}

#[async_trait]
impl FileSink for GitHubFileSink {
    async fn commit(&self, title: &str, scenario: &str) -> Result<Option<String>> {
        self.commit_on(title, scenario, Local::now().date_naive()).await
    }

    fn is_configured(&self) -> bool {
        self.config.is_some()
    }
}
