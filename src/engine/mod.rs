//! The extraction engine.
//!
//! A run scans the posts a [`Timeline`] has rendered, parses each one, and
//! either looks for a single post by id or walks the timeline collecting
//! every post inside a [`DateWindow`]:
//!
//! ```text
//! scan → parse → dedup/filter → (scroll → settle → scan)* → sort → format
//! ```
//!
//! Progress and the terminal outcome are reported through an [`EventSink`].
//! Only one run per engine may be active at a time.

mod collect;
mod events;
mod format;
mod guard;
mod lookup;
mod policy;

pub use collect::{CollectionState, Observation, StopReason};
pub use events::{EngineEvent, EventSink};
pub use format::{RowFormatter, SOURCE_TAG};
pub use guard::{RunGuard, RunPermit};
pub use policy::RetryPolicy;

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};
use url::Url;

use crate::app::{Result, SkimmerError};
use crate::domain::{DateWindow, PostRecord};
use crate::parser::{HtmlAdapter, ParserConfig, PostNode, PostParser};
use crate::timeline::Timeline;

/// What a run should do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionRequest {
    /// Find the post with this id among the rendered posts
    Single { target_id: String },
    /// Collect every post dated inside the window
    Range(DateWindow),
}

impl ExtractionRequest {
    /// Pick the mode from the page address: a permalink page means a single
    /// post, anything else a range collection.
    pub fn for_page(url: &str, window: DateWindow, parser: &PostParser) -> Self {
        match parser.permalink_id(url) {
            Some(target_id) => Self::Single { target_id },
            None => Self::Range(window),
        }
    }
}

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct Report {
    /// Formatted rows, newline-joined
    pub data: String,
    pub count: usize,
    /// Accepted records in output order
    pub records: Vec<PostRecord>,
    pub executed_at: DateTime<Utc>,
    /// Why a range collection stopped; `None` for single-post runs
    pub stop: Option<StopReason>,
}

/// Answer to a liveness probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineStatus {
    pub running: bool,
}

/// Everything an engine needs besides its timeline
#[derive(Debug, Clone, Default)]
pub struct EngineOptions {
    pub parser: ParserConfig,
    pub policy: RetryPolicy,
    pub formatter: RowFormatter,
}

/// Compiled selectors and patterns plus run settings, ready to drive any timeline.
///
/// Building these first lets a caller reject a bad configuration before it
/// opens a browser.
#[derive(Debug)]
pub struct EngineParts {
    adapter: HtmlAdapter,
    parser: PostParser,
    policy: RetryPolicy,
    formatter: RowFormatter,
}

impl EngineParts {
    pub fn new(options: EngineOptions) -> Result<Self> {
        Ok(Self {
            adapter: HtmlAdapter::new(&options.parser)?,
            parser: PostParser::new(&options.parser)?,
            policy: options.policy,
            formatter: options.formatter,
        })
    }
}

pub struct Engine<T: Timeline> {
    timeline: T,
    adapter: HtmlAdapter,
    parser: PostParser,
    policy: RetryPolicy,
    formatter: RowFormatter,
    guard: RunGuard,
}

impl<T: Timeline> Engine<T> {
    pub fn new(timeline: T, options: EngineOptions) -> Result<Self> {
        Ok(Self::with_parts(timeline, EngineParts::new(options)?))
    }

    pub fn with_parts(timeline: T, parts: EngineParts) -> Self {
        Self {
            timeline,
            adapter: parts.adapter,
            parser: parts.parser,
            policy: parts.policy,
            formatter: parts.formatter,
            guard: RunGuard::new(),
        }
    }

    pub fn timeline(&self) -> &T {
        &self.timeline
    }

    pub fn parser(&self) -> &PostParser {
        &self.parser
    }

    pub fn into_timeline(self) -> T {
        self.timeline
    }

    /// Check that the page answers and report whether a run is active.
    pub async fn ping(&self) -> Result<EngineStatus> {
        self.timeline.probe().await?;
        Ok(EngineStatus {
            running: self.guard.is_running(),
        })
    }

    /// Build the request for the page the timeline currently shows.
    pub async fn request_for_page(&self, window: DateWindow) -> Result<ExtractionRequest> {
        let url = self.timeline.page_url().await?.unwrap_or_default();
        Ok(ExtractionRequest::for_page(&url, window, &self.parser))
    }

    /// Execute one run.
    ///
    /// Exactly one terminal event is sent for every call, including calls
    /// rejected because another run is active.
    pub async fn run(&self, request: ExtractionRequest, events: &EventSink) -> Result<Report> {
        let Some(_permit) = self.guard.try_acquire() else {
            warn!("Extraction requested while another run is active");
            events.failed(SkimmerError::AlreadyRunning.to_string());
            return Err(SkimmerError::AlreadyRunning);
        };

        let executed_at = Utc::now();
        let label = self.formatter.execution_label(executed_at);

        let outcome = match &request {
            ExtractionRequest::Single { target_id } => {
                info!("Looking up post {}", target_id);
                self.lookup(target_id, events)
                    .await
                    .map(|record| (vec![record], None))
            }
            ExtractionRequest::Range(window) => {
                let end = window.end_or(executed_at);
                info!("Collecting posts from {} to {}", window.start, end);
                self.collect_range(window.start, end, events)
                    .await
                    .map(|(records, stop)| (records, Some(stop)))
            }
        };

        match outcome {
            Ok((records, stop)) => {
                let data = self.formatter.format_all(&records, &label);
                let count = records.len();
                info!("Extraction complete: {} posts", count);
                events.complete(data.clone(), count);
                Ok(Report {
                    data,
                    count,
                    records,
                    executed_at,
                    stop,
                })
            }
            Err(e) => {
                error!("Extraction failed: {}", e);
                events.failed(e.to_string());
                Err(e)
            }
        }
    }

    async fn base_url(&self) -> Result<Option<Url>> {
        Ok(self
            .timeline
            .page_url()
            .await?
            .and_then(|u| Url::parse(&u).ok()))
    }

    /// Posts rendered right now, in document order.
    async fn scan(&self, base: Option<&Url>) -> Result<Vec<PostNode>> {
        let html = self.timeline.snapshot().await?;
        Ok(self.adapter.extract(&html, base))
    }
}
