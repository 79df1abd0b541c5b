//! Shared types and logic for Syllabus components.
//!
//! Everything here is pure: no network, no storage. The daemon and the
//! control client both depend on it for wire types and the intake flow.

pub mod course;
pub mod error;
pub mod generation;
pub mod intake;
pub mod language;
pub mod reflection;
pub mod rpc;
pub mod slug;
pub mod template;

pub use course::{CourseRecord, DEFAULT_LEVEL};
pub use error::{Result, SyllabusError};
pub use generation::{GenerationOutcome, GenerationRequest};
pub use intake::{IntakeSession, Turn};
pub use language::{Language, QuestionKey};

/// Version shown in health responses and client banners
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
