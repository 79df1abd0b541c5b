//! Configuration management for syllabusd.
//!
//! Connection settings come from the environment (a `.env` file is honored).
//! Generation tuning can additionally be loaded from a TOML file named by
//! `SYLLABUS_CONFIG`; absent keys take the defaults below.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use syllabus_shared::{Result, SyllabusError};
use tracing::{info, warn};

pub const ENV_LISTEN: &str = "SYLLABUS_LISTEN";
pub const ENV_DB_URI: &str = "SYLLABUS_DB_URI";
pub const ENV_DB_NAME: &str = "SYLLABUS_DB_NAME";
pub const ENV_CONFIG: &str = "SYLLABUS_CONFIG";
pub const ENV_FILE: &str = "SYLLABUS_ENV_FILE";
pub const ENV_GITHUB_TOKEN: &str = "GITHUB_TOKEN";
pub const ENV_GITHUB_REPO: &str = "GITHUB_REPO";
pub const ENV_GITHUB_BRANCH: &str = "GITHUB_BRANCH";
pub const ENV_GITHUB_API_URL: &str = "GITHUB_API_URL";
pub const ENV_OLLAMA_URL: &str = "OLLAMA_URL";
pub const ENV_MODEL: &str = "SYLLABUS_MODEL";
pub const ENV_OLLAMA_MANAGED: &str = "SYLLABUS_OLLAMA_MANAGED";
pub const ENV_OLLAMA_BIN: &str = "SYLLABUS_OLLAMA_BIN";

pub const DEFAULT_LISTEN: &str = "127.0.0.1:7870";
pub const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";
pub const DEFAULT_MODEL: &str = "qwen3:0.6b";
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_BRANCH: &str = "main";

/// In-memory database marker for `SYLLABUS_DB_URI`
pub const MEMORY_URI: &str = ":memory:";

/// Load `.env` values into the process environment.
///
/// Variables that are already set win. `SYLLABUS_ENV_FILE` names an explicit
/// file; otherwise `.env` is searched from the working directory upwards and
/// its absence is not an error.
pub fn load_env_file() -> Result<Option<PathBuf>> {
    if let Some(path) = std::env::var_os(ENV_FILE) {
        return load_env_file_from(Path::new(&path)).map(Some);
    }
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(SyllabusError::Config(format!("invalid .env file: {}", e))),
    }
}

pub fn load_env_file_from(path: &Path) -> Result<PathBuf> {
    dotenvy::from_path(path)
        .map_err(|e| SyllabusError::Config(format!("cannot load {}: {}", path.display(), e)))?;
    Ok(path.to_path_buf())
}

/// Sampling and timing parameters for the generation backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_top_p")]
    pub top_p: f32,

    #[serde(default = "default_top_k")]
    pub top_k: u32,

    /// Upper bound for one generate call
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Wait after spawning the backend before probing it again
    #[serde(default = "default_warmup")]
    pub warmup_secs: u64,
}

fn default_temperature() -> f32 {
    0.7
}

fn default_top_p() -> f32 {
    0.9
}

fn default_top_k() -> u32 {
    40
}

fn default_timeout() -> u64 {
    60
}

fn default_warmup() -> u64 {
    5
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            top_p: default_top_p(),
            top_k: default_top_k(),
            timeout_secs: default_timeout(),
            warmup_secs: default_warmup(),
        }
    }
}

impl GenerationConfig {
    /// Load tuning from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            SyllabusError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content)
            .map_err(|e| SyllabusError::Config(format!("invalid {}: {}", path.display(), e)))
    }
}

/// Where the course database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    Memory,
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Data directory, or `:memory:`
    pub uri: String,
    pub name: String,
}

impl StoreConfig {
    pub fn location(&self) -> StoreLocation {
        if self.uri == MEMORY_URI {
            StoreLocation::Memory
        } else {
            StoreLocation::File(Path::new(&self.uri).join(format!("{}.db", self.name)))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubConfig {
    pub token: String,
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub api_url: String,
}

impl GitHubConfig {
    /// `owner/name`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OllamaConfig {
    pub url: String,
    pub model: String,
    /// Spawn `ollama serve` when the backend is down
    pub managed: bool,
    pub bin: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_OLLAMA_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            managed: true,
            bin: "ollama".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listen: String,
    pub store: StoreConfig,
    /// `None` disables file-host persistence
    pub github: Option<GitHubConfig>,
    pub ollama: OllamaConfig,
    pub generation: GenerationConfig,
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let uri = get(ENV_DB_URI)
            .ok_or_else(|| SyllabusError::Config(format!("{} is not set", ENV_DB_URI)))?;
        let name = get(ENV_DB_NAME)
            .ok_or_else(|| SyllabusError::Config(format!("{} is not set", ENV_DB_NAME)))?;

        let github = match (get(ENV_GITHUB_TOKEN), get(ENV_GITHUB_REPO)) {
            (Some(token), Some(full_name)) => {
                let (owner, repo) = parse_repo(&full_name)?;
                Some(GitHubConfig {
                    token,
                    owner,
                    repo,
                    branch: get(ENV_GITHUB_BRANCH).unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
                    api_url: get(ENV_GITHUB_API_URL)
                        .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string()),
                })
            }
            (Some(_), None) | (None, Some(_)) => {
                warn!(
                    "Only one of {} / {} is set, file persistence disabled",
                    ENV_GITHUB_TOKEN, ENV_GITHUB_REPO
                );
                None
            }
            (None, None) => None,
        };

        let managed = match get(ENV_OLLAMA_MANAGED).as_deref() {
            None => true,
            Some(v) => parse_bool(v).ok_or_else(|| {
                SyllabusError::Config(format!("{} must be true or false, got {}", ENV_OLLAMA_MANAGED, v))
            })?,
        };

        let defaults = OllamaConfig::default();
        let ollama = OllamaConfig {
            url: get(ENV_OLLAMA_URL).unwrap_or(defaults.url),
            model: get(ENV_MODEL).unwrap_or(defaults.model),
            managed,
            bin: get(ENV_OLLAMA_BIN).unwrap_or(defaults.bin),
        };

        let generation = match get(ENV_CONFIG) {
            Some(path) => {
                info!("Loading generation settings from {}", path);
                GenerationConfig::load(Path::new(&path))?
            }
            None => GenerationConfig::default(),
        };

        Ok(Self {
            listen: get(ENV_LISTEN).unwrap_or_else(|| DEFAULT_LISTEN.to_string()),
            store: StoreConfig { uri, name },
            github,
            ollama,
            generation,
        })
    }
}

fn parse_repo(full_name: &str) -> Result<(String, String)> {
    match full_name.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => Err(SyllabusError::Config(format!(
            "{} must be in owner/name form, got {}",
            ENV_GITHUB_REPO, full_name
        ))),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
