//! The page seam: everything the engine needs from a rendered timeline.
//!
//! ```text
//! Engine ──snapshot/scroll──▶ Timeline ◀── ChromeTimeline (live browser)
//!                                      ◀── StaticTimeline (saved HTML, tests)
//! ```

mod chrome;
mod config;
mod snapshot;

pub use chrome::ChromeTimeline;
pub use config::BrowserConfig;
pub use snapshot::{Frame, StaticTimeline};

use async_trait::async_trait;

use crate::app::Result;

/// A rendered, scrollable page of posts.
///
/// Implementations only read the page and scroll it; they never change its content.
#[async_trait]
pub trait Timeline: Send + Sync {
    /// HTML of everything currently rendered.
    async fn snapshot(&self) -> Result<String>;

    /// Address of the page, used to resolve relative links.
    async fn page_url(&self) -> Result<Option<String>>;

    /// Current scrollable height of the page.
    async fn scroll_height(&self) -> Result<i64>;

    /// Ask the page to scroll to its bottom so more content loads.
    async fn scroll_to_bottom(&self) -> Result<()>;

    /// Cheap liveness check.
    async fn probe(&self) -> Result<()>;
}
