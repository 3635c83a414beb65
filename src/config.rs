//! Application-level configuration loading.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::state::scoreboard::DEFAULT_EDITING_ROWS;

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "SCOREBOARD_CONFIG_PATH";
const DEFAULT_MAX_CONFLICT_RETRIES: u32 = 5;
const DEFAULT_SSE_CAPACITY: usize = 16;

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    editing_rows: usize,
    max_conflict_retries: u32,
    sse_capacity: usize,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        editing_rows = app_config.editing_rows,
                        max_conflict_retries = app_config.max_conflict_retries,
                        "loaded scoreboard config"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Minimum number of rows handed to the editing form.
    pub fn editing_rows(&self) -> usize {
        self.editing_rows
    }

    /// How many times a conflicting transaction is retried before giving up.
    pub fn max_conflict_retries(&self) -> u32 {
        self.max_conflict_retries
    }

    /// Buffer size of the public SSE broadcast channel.
    pub fn sse_capacity(&self) -> usize {
        self.sse_capacity
    }

    /// Override the conflict retry budget.
    pub fn with_max_conflict_retries(mut self, retries: u32) -> Self {
        self.max_conflict_retries = retries;
        self
    }

    /// Override the editing form row count.
    pub fn with_editing_rows(mut self, rows: usize) -> Self {
        self.editing_rows = rows;
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            editing_rows: DEFAULT_EDITING_ROWS,
            max_conflict_retries: DEFAULT_MAX_CONFLICT_RETRIES,
            sse_capacity: DEFAULT_SSE_CAPACITY,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(default)]
    editing_rows: Option<usize>,
    #[serde(default)]
    max_conflict_retries: Option<u32>,
    #[serde(default)]
    sse_capacity: Option<usize>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = AppConfig::default();
        Self {
            editing_rows: value.editing_rows.unwrap_or(defaults.editing_rows),
            max_conflict_retries: value
                .max_conflict_retries
                .unwrap_or(defaults.max_conflict_retries),
            // A zero-capacity broadcast channel panics on creation.
            sse_capacity: value
                .sse_capacity
                .filter(|capacity| *capacity > 0)
                .unwrap_or(defaults.sse_capacity),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
