//! HTTP wire types shared by syllabusd and syllabusctl.

use crate::course::CourseRecord;
use crate::intake::HistoryEntry;
use crate::language::Language;
use serde::{Deserialize, Serialize};

/// Default number of records returned by `/scenarios`.
pub const DEFAULT_LIST_LIMIT: usize = 10;

/// Catch-all failure payload: `{"error": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Either the success payload or `{error}`; untagged on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiResult<T> {
    Err(ErrorBody),
    Ok(T),
}

impl<T> ApiResult<T> {
    pub fn error(msg: impl Into<String>) -> Self {
        ApiResult::Err(ErrorBody::new(msg))
    }

    pub fn into_result(self) -> Result<T, String> {
        match self {
            ApiResult::Ok(value) => Ok(value),
            ApiResult::Err(body) => Err(body.error),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateQuery {
    pub course_title: String,
    pub level: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerateResponse {
    pub scenario: String,
    pub record_id: Option<String>,
    pub file_path: Option<String>,
    /// Persistence writes that failed after a successful generation
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenariosQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenariosResponse {
    pub scenarios: Vec<CourseRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitlesResponse {
    pub titles: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BackendStatus {
    pub url: String,
    pub reachable: bool,
    pub model: String,
    pub model_present: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub backend: BackendStatus,
    pub file_host_configured: bool,
    pub active_sessions: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StartSessionRequest {
    #[serde(default)]
    pub language: Language,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionMessageRequest {
    pub text: String,
}

/// Reply to a session start or a user turn.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionTurnResponse {
    pub session_id: String,
    pub step: u8,
    pub messages: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub language: Language,
    pub step: u8,
    pub history: Vec<HistoryEntry>,
}
