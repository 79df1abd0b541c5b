//! Error types for Syllabus.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyllabusError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Generation backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Failed to load model: {0}")]
    ModelLoad(String),

    #[error("Generation timed out after {0}s")]
    GenerationTimeout(u64),

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("Course store write failed: {0}")]
    StoreWrite(String),

    #[error("Course store read failed: {0}")]
    StoreRead(String),

    #[error("Remote commit failed: {0}")]
    RemoteCommit(String),

    #[error("Missing template variable: {0}")]
    MissingVariable(String),

    #[error("Intake session not found: {0}")]
    SessionNotFound(String),
}

impl SyllabusError {
    /// Stable numeric code, shared with the HTTP error payloads.
    pub fn code(&self) -> i32 {
        match self {
            SyllabusError::Config(_) => -32010,
            SyllabusError::BackendUnavailable(_) => -32020,
            SyllabusError::ModelLoad(_) => -32021,
            SyllabusError::GenerationTimeout(_) => -32022,
            SyllabusError::Generation(_) => -32023,
            SyllabusError::StoreWrite(_) => -32030,
            SyllabusError::StoreRead(_) => -32031,
            SyllabusError::RemoteCommit(_) => -32040,
            SyllabusError::MissingVariable(_) => -32602,
            SyllabusError::SessionNotFound(_) => -32004,
        }
    }

    /// True for failures on the generation path (backend, model, inference).
    pub fn is_generation_failure(&self) -> bool {
        matches!(
            self,
            SyllabusError::BackendUnavailable(_)
                | SyllabusError::ModelLoad(_)
                | SyllabusError::GenerationTimeout(_)
                | SyllabusError::Generation(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SyllabusError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct() {
        let errors = [
            SyllabusError::Config(String::new()),
            SyllabusError::BackendUnavailable(String::new()),
            SyllabusError::ModelLoad(String::new()),
            SyllabusError::GenerationTimeout(60),
            SyllabusError::Generation(String::new()),
            SyllabusError::StoreWrite(String::new()),
            SyllabusError::StoreRead(String::new()),
            SyllabusError::RemoteCommit(String::new()),
            SyllabusError::MissingVariable(String::new()),
            SyllabusError::SessionNotFound(String::new()),
        ];
        let mut codes: Vec<i32> = errors.iter().map(|e| e.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_generation_failure_classification() {
        assert!(SyllabusError::GenerationTimeout(60).is_generation_failure());
        assert!(SyllabusError::ModelLoad("pull".into()).is_generation_failure());
        assert!(!SyllabusError::StoreWrite("disk".into()).is_generation_failure());
        assert!(!SyllabusError::RemoteCommit("422".into()).is_generation_failure());
    }

    #[test]
    fn test_display() {
        let err = SyllabusError::MissingVariable("audience".to_string());
        assert_eq!(err.to_string(), "Missing template variable: audience");
    }
}
