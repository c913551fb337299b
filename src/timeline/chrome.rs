use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig as LaunchConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use crate::app::{Result, SkimmerError};
use crate::timeline::config::BrowserConfig;
use crate::timeline::Timeline;

const READY_POLL_MS: u64 = 250;

const SCROLL_HEIGHT_SCRIPT: &str = "document.body ? document.body.scrollHeight : 0";
const SCROLL_SCRIPT: &str = "window.scrollTo(0, document.body.scrollHeight)";

/// Timeline backed by a tab in a Chrome instance driven through chromiumoxide
pub struct ChromeTimeline {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
}

impl ChromeTimeline {
    /// Launch a browser, open `url` and wait until a post matching
    /// `post_selector` has rendered.
    pub async fn open(config: &BrowserConfig, url: &str, post_selector: &str) -> Result<Self> {
        let mut builder = LaunchConfig::builder()
            .arg("--no-sandbox")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-blink-features=AutomationControlled")
            .window_size(config.window_width, config.window_height)
            .request_timeout(config.timeout());

        if !config.headless {
            builder = builder.with_head();
        }
        if let Some(ref dir) = config.user_data_dir {
            builder = builder.user_data_dir(dir);
        }
        if let Some(ref exe) = config.chrome_executable {
            builder = builder.chrome_executable(exe);
        }

        let launch_config = builder
            .build()
            .map_err(|e| SkimmerError::Browser(format!("Failed to build browser config: {}", e)))?;

        let (browser, mut handler) = Browser::launch(launch_config).await.map_err(|e| {
            SkimmerError::Browser(format!(
                "Failed to launch browser: {}. Is Chrome or Chromium installed and in PATH?",
                e
            ))
        })?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler event error: {}", e);
                }
            }
        });

        info!("Navigating to {}", url);
        let page = browser
            .new_page(url)
            .await
            .map_err(|e| SkimmerError::Browser(format!("Failed to create page: {}", e)))?;

        if let Some(ref ua) = config.user_agent {
            page.set_user_agent(ua)
                .await
                .map_err(|e| SkimmerError::Browser(format!("Failed to set user agent: {}", e)))?;
        }

        page.wait_for_navigation()
            .await
            .map_err(|e| SkimmerError::Browser(format!("Navigation failed: {}", e)))?;

        let timeline = Self {
            browser,
            page,
            handler,
        };
        timeline.wait_for_posts(post_selector, config).await?;
        Ok(timeline)
    }

    async fn wait_for_posts(&self, post_selector: &str, config: &BrowserConfig) -> Result<()> {
        let selector = serde_json::to_string(post_selector)
            .map_err(|e| SkimmerError::Other(format!("Failed to encode selector: {}", e)))?;
        let script = format!("document.querySelector({}) !== null", selector);
        let deadline = Instant::now() + config.ready_timeout();

        loop {
            if self.evaluate::<bool>(&script).await.unwrap_or(false) {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(SkimmerError::NoPosts(format!(
                    "nothing matched '{}' within {}s; the page may need a logged-in browser profile (browser.user_data_dir)",
                    post_selector, config.ready_timeout_secs
                )));
            }
            sleep(std::time::Duration::from_millis(READY_POLL_MS)).await;
        }
    }

    async fn evaluate<T: serde::de::DeserializeOwned>(&self, script: &str) -> Result<T> {
        self.page
            .evaluate(script)
            .await
            .map_err(|e| SkimmerError::Browser(format!("Script execution failed: {}", e)))?
            .into_value()
            .map_err(|e| SkimmerError::Browser(format!("Failed to parse result: {:?}", e)))
    }

    /// Close the browser and stop its event handler.
    pub async fn close(mut self) -> Result<()> {
        if let Err(e) = self.browser.close().await {
            warn!("Failed to close browser cleanly: {}", e);
        }
        let _ = self.browser.wait().await;
        self.handler.abort();
        Ok(())
    }
}

#[async_trait]
impl Timeline for ChromeTimeline {
    async fn snapshot(&self) -> Result<String> {
        self.page
            .content()
            .await
            .map_err(|e| SkimmerError::Browser(format!("Failed to read page content: {}", e)))
    }

    async fn page_url(&self) -> Result<Option<String>> {
        self.page
            .url()
            .await
            .map_err(|e| SkimmerError::Browser(format!("Failed to read page URL: {}", e)))
    }

    async fn scroll_height(&self) -> Result<i64> {
        self.evaluate(SCROLL_HEIGHT_SCRIPT).await
    }

    async fn scroll_to_bottom(&self) -> Result<()> {
        self.page
            .evaluate(SCROLL_SCRIPT)
            .await
            .map_err(|e| SkimmerError::Browser(format!("Scroll failed: {}", e)))?;
        Ok(())
    }

    async fn probe(&self) -> Result<()> {
        let alive: i64 = self.evaluate("1 + 1").await?;
        if alive == 2 {
            Ok(())
        } else {
            Err(SkimmerError::Browser("Page did not respond to probe".into()))
        }
    }
}
