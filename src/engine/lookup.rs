use tokio::time::sleep;
use tracing::debug;

use crate::app::{Result, SkimmerError};
use crate::domain::PostRecord;
use crate::engine::{Engine, EventSink};
use crate::timeline::Timeline;

impl<T: Timeline> Engine<T> {
    /// Poll the rendered posts until one with `target_id` shows up.
    pub(super) async fn lookup(&self, target_id: &str, events: &EventSink) -> Result<PostRecord> {
        events.progress("Extracting single post...");
        let base = self.base_url().await?;
        let attempts = self.policy.lookup_attempts;

        for attempt in 1..=attempts {
            let posts = self.scan(base.as_ref()).await?;
            let found = posts
                .iter()
                .filter_map(|node| self.parser.parse(node))
                .find(|record| record.id == target_id);

            if let Some(record) = found {
                debug!("Found post {} on attempt {}", target_id, attempt);
                return Ok(record);
            }

            debug!("Post {} not rendered yet (attempt {}/{})", target_id, attempt, attempts);
            if attempt < attempts {
                sleep(self.policy.lookup_interval()).await;
            }
        }

        Err(SkimmerError::TargetNotFound(target_id.to_string()))
    }
}
