//! Values passed between the intake flow, the generation pipeline and its callers.

use crate::course::resolve_level;
use crate::error::Result;
use crate::language::{Language, QuestionKey};
use std::collections::BTreeMap;
use std::time::Duration;

/// The six questionnaire answers plus the template language to render with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub language: Language,
    pub answers: BTreeMap<QuestionKey, String>,
}

impl GenerationRequest {
    pub fn new(language: Language, answers: BTreeMap<QuestionKey, String>) -> Self {
        Self { language, answers }
    }

    /// Request built from only a title and a level.
    ///
    /// The remaining variables get neutral defaults so the full template can
    /// still be rendered.
    pub fn from_title(language: Language, title: &str, level: Option<&str>) -> Self {
        let level = resolve_level(level);
        let mut answers = BTreeMap::new();
        answers.insert(QuestionKey::Title, title.to_string());
        answers.insert(
            QuestionKey::Description,
            format!("A course titled \"{}\" at {} level.", title, level),
        );
        answers.insert(QuestionKey::Level, level);
        answers.insert(QuestionKey::Audience, "general learners".to_string());
        answers.insert(QuestionKey::Duration, "4 weeks".to_string());
        answers.insert(QuestionKey::Language, language.label().to_string());
        Self { language, answers }
    }

    pub fn answer(&self, key: QuestionKey) -> Option<&str> {
        self.answers.get(&key).map(String::as_str)
    }

    pub fn title(&self) -> &str {
        self.answer(QuestionKey::Title).unwrap_or_default()
    }

    pub fn level(&self) -> &str {
        self.answer(QuestionKey::Level).unwrap_or_default()
    }
}

/// Result of one generation cycle.
///
/// Generation itself succeeded; the two persistence results are kept apart so
/// callers can see a partial save.
#[derive(Debug)]
pub struct GenerationOutcome {
    pub scenario: String,
    /// Document-store record id
    pub record: Result<String>,
    /// Remote file path, `None` when the file host is not configured
    pub file: Result<Option<String>>,
    pub elapsed: Duration,
}

impl GenerationOutcome {
    pub fn record_id(&self) -> Option<&str> {
        self.record.as_ref().ok().map(String::as_str)
    }

    pub fn file_path(&self) -> Option<&str> {
        self.file.as_ref().ok().and_then(|p| p.as_deref())
    }

    /// Messages for every persistence write that failed.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if let Err(e) = &self.record {
            warnings.push(e.to_string());
        }
        if let Err(e) = &self.file {
            warnings.push(e.to_string());
        }
        warnings
    }

    pub fn fully_persisted(&self) -> bool {
        self.record.is_ok() && self.file.is_ok()
    }
}
