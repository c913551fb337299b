//! Configuration management for Skimmer.
//!
//! Configuration is read from `~/.config/skimmer/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

use crate::domain::TargetConfig;
use crate::engine::RetryPolicy;
use crate::output::OutputConfig;
use crate::parser::ParserConfig;
use crate::timeline::BrowserConfig;
use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub target: TargetConfig,
    pub browser: BrowserConfig,
    pub engine: RetryPolicy,
    pub parser: ParserConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// If the config file exists but is invalid, returns an error.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the default config file path: `~/.config/skimmer/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("skimmer").join("config.toml"))
    }

    /// Create a default config file with comments.
    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# Skimmer Configuration
#
# Durations ending in _ms are milliseconds, _secs are seconds.

[target]
# Account searched by `skimmer extract` when no URL or --user is given
# default_user = "alice"

[browser]
# Run browser in headless mode (no visible window)
headless = true

# Profile directory to reuse a logged-in session
# user_data_dir = "/home/me/.local/share/skimmer/chrome_profile"

# Explicit browser binary
# chrome_executable = "/usr/bin/chromium"

window_width = 1920
window_height = 1080

# Browser request timeout in seconds
timeout_secs = 30

# How long to wait for the first post to render
ready_timeout_secs = 10

[engine]
# Single-post mode: scans before giving up, and the pause between them
lookup_attempts = 5
lookup_interval_ms = 1000

# Range mode: pause after each scroll for new posts to render
settle_delay_ms = 2000

# Range mode: stop after this many scrolls that did not grow the page
max_stale_scrolls = 5

# Range mode: stop after this many consecutive posts older than the start date
max_consecutive_old = 3

[parser]
post_selector = "article"
time_selector = "time"
text_selector = "div[data-testid=\"tweetText\"]"

# Capture group 1 must be the post id
permalink_pattern = '/status/(\d+)'

# Texts that mark a pinned post (pinned posts never end a collection)
pinned_markers = ["Pinned", "固定"]

[output]
source_tag = "【X】"

# Render times with a fixed offset instead of the system zone
# utc_offset = "+09:00"

# Append to the output file instead of replacing it
append = true
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
