//! HTTP client for communicating with syllabusd.

use anyhow::{anyhow, Context, Result};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use syllabus_shared::rpc::{
    ApiResult, ErrorBody, GenerateResponse, HealthResponse, ScenariosResponse,
    SessionMessageRequest, SessionTurnResponse, StartSessionRequest, TitlesResponse,
};
use syllabus_shared::{CourseRecord, Language};

/// Generation can take minutes on a cold backend
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Client for the syllabusd HTTP API
pub struct SyllabusClient {
    http: reqwest::Client,
    base_url: String,
}

impl SyllabusClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("building HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn connect_error(&self, e: reqwest::Error) -> anyhow::Error {
        anyhow!(
            "Cannot reach syllabusd at {}: {}\n\n\
             Start the daemon with `syllabusd` or pass --url.",
            self.base_url,
            e
        )
    }

    /// Decode a query-route body, which is either the payload or `{error}`.
    async fn decode_api<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let result: ApiResult<T> = response.json().await.context("decoding response")?;
        result.into_result().map_err(|e| anyhow!(e))
    }

    /// Decode an intake-route body, which signals errors with a status code.
    async fn decode_status<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return response.json().await.context("decoding response");
        }
        match response.json::<ErrorBody>().await {
            Ok(body) => Err(anyhow!(body.error)),
            Err(_) => Err(anyhow!("syllabusd returned {}", status)),
        }
    }

    pub async fn generate(&self, title: &str, level: Option<&str>) -> Result<GenerateResponse> {
        let mut query = vec![("course_title", title)];
        if let Some(level) = level {
            query.push(("level", level));
        }
        let response = self
            .http
            .get(self.url("/generate"))
            .query(&query)
            .send()
            .await
            .map_err(|e| self.connect_error(e))?;
        Self::decode_api(response).await
    }

    pub async fn scenarios(&self, limit: usize) -> Result<Vec<CourseRecord>> {
        let response = self
            .http
            .get(self.url("/scenarios"))
            .query(&[("limit", limit)])
            .send()
            .await
            .map_err(|e| self.connect_error(e))?;
        let body: ScenariosResponse = Self::decode_api(response).await?;
        Ok(body.scenarios)
    }

    pub async fn titles(&self) -> Result<Vec<String>> {
        let response = self
            .http
            .get(self.url("/titles"))
            .send()
            .await
            .map_err(|e| self.connect_error(e))?;
        let body: TitlesResponse = Self::decode_api(response).await?;
        Ok(body.titles)
    }

    pub async fn health(&self) -> Result<HealthResponse> {
        let response = self
            .http
            .get(self.url("/v1/health"))
            .send()
            .await
            .map_err(|e| self.connect_error(e))?;
        Self::decode_status(response).await
    }

    pub async fn open_session(&self, language: Language) -> Result<SessionTurnResponse> {
        let response = self
            .http
            .post(self.url("/v1/intake/sessions"))
            .json(&StartSessionRequest { language })
            .send()
            .await
            .map_err(|e| self.connect_error(e))?;
        Self::decode_status(response).await
    }

    pub async fn send(&self, session_id: &str, text: &str) -> Result<SessionTurnResponse> {
        let response = self
            .http
            .post(self.url(&format!("/v1/intake/sessions/{}/messages", session_id)))
            .json(&SessionMessageRequest {
                text: text.to_string(),
            })
            .send()
            .await
            .map_err(|e| self.connect_error(e))?;
        Self::decode_status(response).await
    }

    /// Drop a session on the daemon. An already-gone session is not an error.
    pub async fn close_session(&self, session_id: &str) -> Result<()> {
        let response = self
            .http
            .delete(self.url(&format!("/v1/intake/sessions/{}", session_id)))
            .send()
            .await
            .map_err(|e| self.connect_error(e))?;
        match response.status() {
            s if s.is_success() || s == StatusCode::NOT_FOUND => Ok(()),
            s => Err(anyhow!("closing session failed: {}", s)),
        }
    }
}
