use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use anyhow::{Context, Result};

/// Server configuration, assembled from defaults, an optional config file
/// (`CONFIG_PATH`) and the process environment, in that order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    /// Rotated log files kept on disk, one per day.
    #[serde(default = "default_log_max_files")]
    pub log_max_files: usize,
    /// Comma-separated CORS allow-list. Unset means any origin.
    #[serde(default)]
    pub allowed_origins: Option<String>,
    #[serde(default = "default_node_env")]
    pub node_env: String,
    #[serde(default = "default_stats_file")]
    pub stats_file: String,
    #[serde(default = "default_public_dir")]
    pub public_dir: String,
    #[serde(default = "default_translate_api_url")]
    pub translate_api_url: String,
    #[serde(default = "default_translate_timeout_secs")]
    pub translate_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_log_max_files() -> usize {
    14
}

fn default_node_env() -> String {
    "development".to_string()
}

fn default_stats_file() -> String {
    "stats.json".to_string()
}

fn default_public_dir() -> String {
    "public".to_string()
}

fn default_translate_api_url() -> String {
    "https://translate.googleapis.com/translate_a/single".to_string()
}

fn default_translate_timeout_secs() -> u64 {
    10
}

impl Config {
    /// Load configuration for the running process.
    ///
    /// A `.env` file in the working directory is applied first, then the
    /// file named by `CONFIG_PATH` (if any), then the environment.
    pub fn load() -> Result<Self> {
        // Missing .env is the normal case outside local development.
        let _ = dotenv::dotenv();

        let config_path = std::env::var("CONFIG_PATH").ok();
        Self::load_from(config_path.as_deref(), config::Environment::default())
    }

    /// Build a configuration from an explicit file path and environment source.
    pub fn load_from(path: Option<&str>, env: config::Environment) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            // Format is picked from the extension (.yaml, .json, .toml)
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        let settings = builder
            .add_source(env.try_parsing(true))
            .build()
            .context("Failed to assemble configuration")?;

        let config: Config = settings
            .try_deserialize()
            .context("Invalid configuration")?;
        Ok(config)
    }

    /// Whether diagnostic `details` may be exposed in error responses.
    pub fn is_development(&self) -> bool {
        self.node_env.eq_ignore_ascii_case("development")
    }

    pub fn allowed_origins(&self) -> Option<Vec<String>> {
        let raw = self.allowed_origins.as_deref()?;
        let origins: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect();

        if origins.is_empty() || origins.iter().any(|o| o == "*") {
            None
        } else {
            Some(origins)
        }
    }

    pub fn stats_path(&self) -> PathBuf {
        PathBuf::from(&self.stats_file)
    }

    pub fn public_path(&self) -> PathBuf {
        PathBuf::from(&self.public_dir)
    }

    pub fn translate_timeout(&self) -> Duration {
        Duration::from_secs(self.translate_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_dir: default_log_dir(),
            log_max_files: default_log_max_files(),
            allowed_origins: None,
            node_env: default_node_env(),
            stats_file: default_stats_file(),
            public_dir: default_public_dir(),
            translate_api_url: default_translate_api_url(),
            translate_timeout_secs: default_translate_timeout_secs(),
        }
    }
}
