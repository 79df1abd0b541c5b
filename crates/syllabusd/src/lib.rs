//! Syllabus daemon library - exposes modules for testing.

pub mod config;
pub mod github;
pub mod intake_host;
pub mod ollama;
pub mod pipeline;
pub mod routes;
pub mod server;
pub mod store;
