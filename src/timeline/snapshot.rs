use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::app::{Result, SkimmerError};
use crate::timeline::Timeline;

/// One state of a page: its markup and its scrollable height.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub html: String,
    pub height: i64,
}

impl Frame {
    pub fn new(html: impl Into<String>, height: i64) -> Self {
        Self {
            html: html.into(),
            height,
        }
    }
}

/// In-memory timeline that moves to its next frame on every scroll and
/// stays on the last one once reached.
#[derive(Debug)]
pub struct StaticTimeline {
    frames: Vec<Frame>,
    url: Option<String>,
    position: AtomicUsize,
    scrolls: AtomicUsize,
}

impl StaticTimeline {
    pub fn new(frames: Vec<Frame>, url: Option<String>) -> Result<Self> {
        if frames.is_empty() {
            return Err(SkimmerError::Other("A static timeline needs at least one frame".into()));
        }
        Ok(Self {
            frames,
            url,
            position: AtomicUsize::new(0),
            scrolls: AtomicUsize::new(0),
        })
    }

    /// A single saved page that never grows.
    pub fn from_html(html: impl Into<String>, url: Option<String>) -> Self {
        Self {
            frames: vec![Frame::new(html, 0)],
            url,
            position: AtomicUsize::new(0),
            scrolls: AtomicUsize::new(0),
        }
    }

    /// Number of scroll requests received so far.
    pub fn scroll_count(&self) -> usize {
        self.scrolls.load(Ordering::SeqCst)
    }

    fn current(&self) -> &Frame {
        let idx = self.position.load(Ordering::SeqCst).min(self.frames.len() - 1);
        &self.frames[idx]
    }
}

#[async_trait]
impl Timeline for StaticTimeline {
    async fn snapshot(&self) -> Result<String> {
        Ok(self.current().html.clone())
    }

    async fn page_url(&self) -> Result<Option<String>> {
        Ok(self.url.clone())
    }

    async fn scroll_height(&self) -> Result<i64> {
        Ok(self.current().height)
    }

    async fn scroll_to_bottom(&self) -> Result<()> {
        self.scrolls.fetch_add(1, Ordering::SeqCst);
        let last = self.frames.len() - 1;
        let _ = self
            .position
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |p| Some((p + 1).min(last)));
        Ok(())
    }

    async fn probe(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_frames_advance_on_scroll() {
        let timeline = StaticTimeline::new(
            vec![Frame::new("<p>1</p>", 100), Frame::new("<p>2</p>", 200)],
            Some("https://x.com/alice".into()),
        )
        .unwrap();

        assert_eq!(timeline.snapshot().await.unwrap(), "<p>1</p>");
        assert_eq!(timeline.scroll_height().await.unwrap(), 100);

        timeline.scroll_to_bottom().await.unwrap();
        assert_eq!(timeline.snapshot().await.unwrap(), "<p>2</p>");
        assert_eq!(timeline.scroll_height().await.unwrap(), 200);

        timeline.scroll_to_bottom().await.unwrap();
        assert_eq!(timeline.snapshot().await.unwrap(), "<p>2</p>");
        assert_eq!(timeline.scroll_count(), 2);
    }

    #[tokio::test]
    async fn test_from_html_never_grows() {
        let timeline = StaticTimeline::from_html("<article></article>", None);
        let before = timeline.scroll_height().await.unwrap();
        timeline.scroll_to_bottom().await.unwrap();
        assert_eq!(timeline.scroll_height().await.unwrap(), before);
        assert_eq!(timeline.page_url().await.unwrap(), None);
    }

    #[test]
    fn test_empty_frames_rejected() {
        assert!(StaticTimeline::new(vec![], None).is_err());
    }
}
