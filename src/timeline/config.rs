use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the controlled browser
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Whether to run the browser in headless mode (default: true)
    pub headless: bool,

    /// Browser profile directory; reuse one that is logged in to see protected timelines
    pub user_data_dir: Option<PathBuf>,

    /// Explicit Chrome/Chromium binary, otherwise found on PATH
    pub chrome_executable: Option<PathBuf>,

    /// User agent string to use
    pub user_agent: Option<String>,

    /// Viewport width in pixels (default: 1920)
    pub window_width: u32,

    /// Viewport height in pixels (default: 1080)
    pub window_height: u32,

    /// Browser request timeout in seconds (default: 30)
    pub timeout_secs: u64,

    /// How long to wait for the first post to render, in seconds (default: 10)
    pub ready_timeout_secs: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            user_data_dir: None,
            chrome_executable: None,
            user_agent: Some(
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                    .to_string(),
            ),
            window_width: 1920,
            window_height: 1080,
            timeout_secs: 30,
            ready_timeout_secs: 10,
        }
    }
}

impl BrowserConfig {
    /// Get the request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get the first-post wait as a Duration
    pub fn ready_timeout(&self) -> Duration {
        Duration::from_secs(self.ready_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = BrowserConfig::default();
        assert!(config.headless);
        assert!(config.user_data_dir.is_none());
        assert!(config.chrome_executable.is_none());
        assert!(config.user_agent.is_some());
        assert_eq!(config.window_width, 1920);
        assert_eq!(config.window_height, 1080);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.ready_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_profile_dir_from_toml() {
        let config: BrowserConfig =
            toml::from_str("headless = false\nuser_data_dir = \"/tmp/profile\"").unwrap();
        assert!(!config.headless);
        assert_eq!(config.user_data_dir, Some(PathBuf::from("/tmp/profile")));
        assert_eq!(config.ready_timeout_secs, 10);
    }
}
