pub mod sqlite;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::app::Result;

pub use sqlite::SqliteStore;

/// Which engine mode a run used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    Single,
    Range,
}

impl RunMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Range => "range",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "single" => Some(Self::Single),
            "range" => Some(Self::Range),
            _ => None,
        }
    }
}

/// Bookkeeping for one finished extraction run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub id: i64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub mode: RunMode,
    pub page_url: Option<String>,
    pub post_count: usize,
    pub succeeded: bool,
    pub error: Option<String>,
}

impl RunRecord {
    pub fn succeeded(
        mode: RunMode,
        page_url: Option<String>,
        started_at: DateTime<Utc>,
        post_count: usize,
    ) -> Self {
        Self {
            id: 0,
            started_at,
            finished_at: Utc::now(),
            mode,
            page_url,
            post_count,
            succeeded: true,
            error: None,
        }
    }

    pub fn failed(
        mode: RunMode,
        page_url: Option<String>,
        started_at: DateTime<Utc>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            started_at,
            finished_at: Utc::now(),
            mode,
            page_url,
            post_count: 0,
            succeeded: false,
            error: Some(error.into()),
        }
    }
}

pub trait RunStore {
    fn record_run(&self, run: &RunRecord) -> Result<i64>;
    /// Most recently finished successful run, used as the resume point
    fn last_successful_run(&self) -> Result<Option<RunRecord>>;
    fn recent_runs(&self, limit: usize) -> Result<Vec<RunRecord>>;
}
