use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cli::Cli;
use crate::error::ConfigError;

pub const ENV_SERVER: &str = "MCQUIZ_SERVER";
pub const ENV_USER: &str = "MCQUIZ_USER";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server_url: String,
    pub request_timeout_secs: u64,
    /// Generation runs an LLM per chunk on the server, so it gets its own budget.
    pub generate_timeout_secs: u64,
    pub user_id: Option<String>,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8000".to_string(),
            request_timeout_secs: 30,
            generate_timeout_secs: 300,
            user_id: None,
            log_filter: "mcquiz=info".to_string(),
        }
    }
}

impl Config {
    /// Defaults, then the config file, then environment, then CLI flags.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        config.apply_env(|key| std::env::var(key).ok());
        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded config file");
        Self::from_yaml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_SERVER).filter(|v| !v.is_empty()) {
            self.server_url = url;
        }
        if let Some(user) = lookup(ENV_USER).filter(|v| !v.is_empty()) {
            self.user_id = Some(user);
        }
    }

    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(url) = &cli.server {
            self.server_url = url.clone();
        }
        if let Some(user) = &cli.user {
            self.user_id = Some(user.clone());
        }
        if let Some(secs) = cli.timeout {
            self.request_timeout_secs = secs;
        }
    }

    fn validate(&mut self) -> Result<(), ConfigError> {
        let trimmed = self.server_url.trim().trim_end_matches('/').to_string();
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(ConfigError::ServerUrl(self.server_url.clone()));
        }
        self.server_url = trimmed;
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn generate_timeout(&self) -> Duration {
        Duration::from_secs(self.generate_timeout_secs)
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "mcquiz")
}

pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|d| d.config_dir().join("config.yaml"))
}

pub fn default_log_path() -> PathBuf {
    project_dirs()
        .map(|d| d.data_local_dir().join("mcquiz.log"))
        .unwrap_or_else(|| std::env::temp_dir().join("mcquiz.log"))
}
