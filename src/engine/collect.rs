use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use tokio::time::sleep;
use tracing::{debug, info};

use crate::app::Result;
use crate::domain::PostRecord;
use crate::engine::{Engine, EventSink};
use crate::timeline::Timeline;

/// Why a range collection ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Enough consecutive posts older than the window were seen
    PassedWindow,
    /// The page stopped growing after repeated scrolls
    NoGrowth,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PassedWindow => write!(f, "reached posts older than the start date"),
            Self::NoGrowth => write!(f, "reached end of page or loading stalled"),
        }
    }
}

/// What happened to one parsed post
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    Accepted,
    Duplicate,
    /// Older than the window and counted toward stopping
    Old,
    /// Older than the window but pinned, so not counted
    PinnedOld,
    /// Newer than the window
    Newer,
}

/// Per-run bookkeeping for a range collection
#[derive(Debug, Default)]
pub struct CollectionState {
    seen: HashSet<String>,
    accepted: Vec<PostRecord>,
    consecutive_old: u32,
    stale_scrolls: u32,
}

impl CollectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify a post. `pinned` is only consulted for posts older than `start`.
    pub fn observe(
        &mut self,
        record: PostRecord,
        pinned: impl FnOnce() -> bool,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Observation {
        if !self.seen.insert(record.id.clone()) {
            return Observation::Duplicate;
        }

        if record.is_within(start, end) {
            self.accepted.push(record);
            self.consecutive_old = 0;
            Observation::Accepted
        } else if record.date < start {
            if pinned() {
                Observation::PinnedOld
            } else {
                self.consecutive_old += 1;
                Observation::Old
            }
        } else {
            Observation::Newer
        }
    }

    /// Record the page height before and after a scroll; returns the
    /// current run of scrolls without growth.
    pub fn record_scroll(&mut self, before: i64, after: i64) -> u32 {
        if after == before {
            self.stale_scrolls += 1;
        } else {
            self.stale_scrolls = 0;
        }
        self.stale_scrolls
    }

    pub fn consecutive_old(&self) -> u32 {
        self.consecutive_old
    }

    pub fn accepted_count(&self) -> usize {
        self.accepted.len()
    }

    pub fn scanned_count(&self) -> usize {
        self.seen.len()
    }

    /// Accepted records, oldest first.
    pub fn into_sorted(self) -> Vec<PostRecord> {
        let mut records = self.accepted;
        records.sort_by_key(|r| r.date);
        records
    }
}

impl<T: Timeline> Engine<T> {
    pub(super) async fn collect_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        events: &EventSink,
    ) -> Result<(Vec<PostRecord>, StopReason)> {
        let base = self.base_url().await?;
        let mut state = CollectionState::new();

        events.progress("Starting scrape...");

        let stop = loop {
            let posts = self.scan(base.as_ref()).await?;
            for node in &posts {
                let Some(record) = self.parser.parse(node) else {
                    continue;
                };
                state.observe(record, || self.parser.is_pinned(node), start, end);
            }

            debug!(
                "Scan pass: {} rendered, {} accepted, {} scanned, {} consecutive old",
                posts.len(),
                state.accepted_count(),
                state.scanned_count(),
                state.consecutive_old()
            );
            events.progress(format!(
                "Collected {} posts... (Scanned {})",
                state.accepted_count(),
                state.scanned_count()
            ));

            if state.consecutive_old() >= self.policy.max_consecutive_old {
                break StopReason::PassedWindow;
            }

            let before = self.timeline.scroll_height().await?;
            self.timeline.scroll_to_bottom().await?;
            sleep(self.policy.settle_delay()).await;
            let after = self.timeline.scroll_height().await?;

            let stale = state.record_scroll(before, after);
            debug!("Scrolled: height {} -> {} ({} stale)", before, after, stale);
            if stale >= self.policy.max_stale_scrolls {
                break StopReason::NoGrowth;
            }
        };

        info!("Stopped collecting: {}", stop);
        Ok((state.into_sorted(), stop))
    }
}
