use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One post as reconstructed from the rendered timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    /// Permalink id, or `raw_date` + first 10 chars of `text` when the post has no permalink
    pub id: String,
    pub date: DateTime<Utc>,
    /// The datetime attribute exactly as it appeared on the page
    pub raw_date: String,
    pub text: String,
}

impl PostRecord {
    pub fn new(
        id: impl Into<String>,
        date: DateTime<Utc>,
        raw_date: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            date,
            raw_date: raw_date.into(),
            text: text.into(),
        }
    }

    /// Build the fallback id used when no permalink is present.
    pub fn fallback_id(raw_date: &str, text: &str) -> String {
        let prefix: String = text.chars().take(10).collect();
        format!("{}{}", raw_date, prefix)
    }

    pub fn is_within(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.date >= start && self.date <= end
    }
}
