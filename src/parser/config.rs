use serde::{Deserialize, Serialize};

/// Markers used to find posts and their parts in the rendered page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// CSS selector matching one post element (default: "article")
    pub post_selector: String,

    /// CSS selector for the time indicator inside a post (default: "time")
    pub time_selector: String,

    /// CSS selector for the post's text container
    pub text_selector: String,

    /// Regex matched against link targets; capture group 1 is the post id
    pub permalink_pattern: String,

    /// Locale-specific texts that mark a pinned post
    pub pinned_markers: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            post_selector: "article".to_string(),
            time_selector: "time".to_string(),
            text_selector: "div[data-testid=\"tweetText\"]".to_string(),
            permalink_pattern: r"/status/(\d+)".to_string(),
            pinned_markers: vec!["Pinned".to_string(), "固定".to_string()],
        }
    }
}
