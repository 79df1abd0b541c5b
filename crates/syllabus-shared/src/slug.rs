//! Filesystem-safe naming for persisted scenario files.

use chrono::NaiveDate;

/// Directory in the remote repository that receives scenario files.
pub const SCENARIO_DIR: &str = "scenarios";

/// Replace every character outside `[A-Za-z0-9_-]` with `_`.
///
/// Non-ASCII letters are replaced too, one `_` per character.
pub fn slug(title: &str) -> String {
    title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Remote path for a scenario: `scenarios/<slug>_<YYYYMMDD>.md`.
pub fn scenario_path(title: &str, date: NaiveDate) -> String {
    format!("{}/{}_{}.md", SCENARIO_DIR, slug(title), date.format("%Y%m%d"))
}
