//! Configuration loading from TOML files

use std::path::PathBuf;

use anyhow::{Context, Result};
use prospector_github::CollectConfig;
use serde::Deserialize;

/// Global configuration for prospector
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
    pub github: GithubConfig,
    pub collect: CollectSettings,
    pub http: HttpSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("pull_requests.csv"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    pub endpoint: String,
    #[serde(deserialize_with = "deserialize_env_var")]
    pub token: Option<String>,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.github.com/graphql".to_string(),
            token: std::env::var("GITHUB_TOKEN").ok(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CollectSettings {
    pub search_query: String,
    pub max_repos: usize,
    pub repo_page_size: u32,
    pub pr_page_size: u32,
    pub max_pr_pages: usize,
    pub min_pull_requests: i64,
    pub min_reviews: i64,
    pub min_resolution_secs: u64,
    pub workers: usize,
    pub throttle_ms: u64,
}

impl Default for CollectSettings {
    // Mirror the pipeline defaults so the file and the library never drift
    fn default() -> Self {
        let c = CollectConfig::default();
        Self {
            search_query: c.search_query,
            max_repos: c.max_repos,
            repo_page_size: c.repo_page_size,
            pr_page_size: c.pr_page_size,
            max_pr_pages: c.max_pr_pages,
            min_pull_requests: c.min_pull_requests,
            min_reviews: c.filter.min_reviews,
            min_resolution_secs: c.filter.min_resolution.as_secs(),
            workers: c.workers,
            throttle_ms: c.throttle.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub max_retries: u32,
    pub backoff_base: f64,
    pub backoff_cap_secs: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        let policy = prospector_core::RetryPolicy::default();
        Self {
            max_retries: policy.max_retries,
            backoff_base: policy.base,
            backoff_cap_secs: policy.cap.as_secs(),
        }
    }
}

/// Deserialize a string that may be an environment reference like ${VAR}
fn deserialize_env_var<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|s| expand_env_var(&s)))
}

/// Expand ${VAR} to the environment variable's value
fn expand_env_var(s: &str) -> Option<String> {
    if let Some(var_name) = s.strip_prefix("${").and_then(|s| s.strip_suffix('}')) {
        std::env::var(var_name).ok()
    } else {
        Some(s.to_string())
    }
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./prospector.toml (current directory)
    /// 2. ~/.config/prospector/config.toml
    ///
    /// If no config file is found, returns the defaults.
    pub fn load() -> Result<Self> {
        let local_config = PathBuf::from("prospector.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = directories::ProjectDirs::from("", "", "prospector") {
            let user_config = config_dir.config_dir().join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}
