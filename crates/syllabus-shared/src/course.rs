//! Persisted course records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Level used when a caller does not specify one.
pub const DEFAULT_LEVEL: &str = "intermediate";

/// A generated course scenario as stored in the document store.
///
/// Records are immutable once inserted; there is no update path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CourseRecord {
    /// Store-assigned identifier
    pub id: String,
    pub title: String,
    #[serde(default = "default_level")]
    pub level: String,
    /// The generated document body
    pub scenario: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_level() -> String {
    DEFAULT_LEVEL.to_string()
}

/// Normalize a caller-supplied level, falling back to the default when blank.
pub fn resolve_level(level: Option<&str>) -> String {
    match level.map(str::trim) {
        Some(l) if !l.is_empty() => l.to_string(),
        _ => default_level(),
    }
}
