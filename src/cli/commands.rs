use std::path::Path;

use chrono::Utc;
use tracing::warn;
use url::Url;

use crate::app::{AppContext, Result};
use crate::cli::RangeArgs;
use crate::domain::Target;
use crate::engine::{Engine, EngineEvent, EngineParts, EventSink, ExtractionRequest, Report};
use crate::output::ReportWriter;
use crate::store::{RunMode, RunRecord, RunStore};
use crate::timeline::{ChromeTimeline, StaticTimeline, Timeline};

pub struct ExtractOptions<'a> {
    pub url: Option<&'a str>,
    pub user: Option<&'a str>,
    pub range: &'a RangeArgs,
    pub resume: bool,
    pub output: Option<&'a Path>,
    pub append: bool,
    pub headed: bool,
}

pub async fn extract(ctx: &AppContext, opts: ExtractOptions<'_>) -> Result<()> {
    let target = Target::resolve(opts.url, opts.user, &ctx.config.target)?;
    let zone = ctx.config.output.zone()?;
    let mut window = opts.range.window(Utc::now(), &zone)?;

    if opts.resume {
        match ctx.store.last_successful_run()? {
            Some(run) => {
                eprintln!(
                    "Resuming from {}",
                    zone.format(run.finished_at, "%Y-%m-%d %H:%M:%S")
                );
                window = window.with_start(run.finished_at);
            }
            None => eprintln!("No previous run found, using the selected range"),
        }
    }

    let page_url = target.page_url(&window, &zone)?;
    let parts = EngineParts::new(ctx.engine_options()?)?;

    let mut browser = ctx.config.browser.clone();
    if opts.headed {
        browser.headless = false;
    }

    let post_selector = &ctx.config.parser.post_selector;
    let timeline = ChromeTimeline::open(&browser, &page_url, post_selector).await?;
    let engine = Engine::with_parts(timeline, parts);

    let started_at = Utc::now();
    let (mode, outcome) = match engine.request_for_page(window).await {
        Ok(request) => (run_mode(&request), run_with_progress(&engine, request).await),
        Err(e) => (RunMode::Range, Err(e)),
    };

    let run = match &outcome {
        Ok(report) => {
            RunRecord::succeeded(mode, Some(page_url.clone()), started_at, report.count)
        }
        Err(e) => RunRecord::failed(mode, Some(page_url.clone()), started_at, e.to_string()),
    };
    if let Err(e) = ctx.store.record_run(&run) {
        warn!("Failed to record run: {}", e);
    }

    engine.into_timeline().close().await?;
    let report = outcome?;

    if !report.data.is_empty() {
        println!("{}", report.data);
    }

    if let Some(path) = opts.output {
        let written = ReportWriter::write(path, &report, opts.append)?;
        eprintln!("Saved {} rows to {}", written, path.display());
    }

    Ok(())
}

pub async fn parse_saved(
    ctx: &AppContext,
    path: &Path,
    base_url: Option<&str>,
    range: &RangeArgs,
) -> Result<()> {
    let html = std::fs::read_to_string(path)?;
    let zone = ctx.config.output.zone()?;
    let window = range.window(Utc::now(), &zone)?;

    let mut options = ctx.engine_options()?;
    // A saved page never loads more content, so there is nothing to wait for.
    options.policy.lookup_interval_ms = 0;
    options.policy.settle_delay_ms = 0;

    let timeline = StaticTimeline::from_html(html, base_url.map(String::from));
    let engine = Engine::new(timeline, options)?;
    let request = engine.request_for_page(window).await?;

    let report = run_with_progress(&engine, request).await?;
    if !report.data.is_empty() {
        println!("{}", report.data);
    }

    Ok(())
}

pub async fn ping(ctx: &AppContext, url: &str) -> Result<()> {
    Url::parse(url)?;
    let parts = EngineParts::new(ctx.engine_options()?)?;

    let post_selector = &ctx.config.parser.post_selector;
    let timeline = ChromeTimeline::open(&ctx.config.browser, url, post_selector).await?;
    let engine = Engine::with_parts(timeline, parts);

    let status = engine.ping().await;
    engine.into_timeline().close().await?;

    let status = status?;
    if status.running {
        println!("OK (run in progress)");
    } else {
        println!("OK");
    }
    Ok(())
}

pub fn history(ctx: &AppContext, limit: usize) -> Result<()> {
    let zone = ctx.config.output.zone()?;
    let runs = ctx.store.recent_runs(limit)?;

    if runs.is_empty() {
        println!("No runs");
        return Ok(());
    }

    for run in runs {
        let when = zone.format(run.finished_at, "%Y-%m-%d %H:%M");
        let url = run.page_url.as_deref().unwrap_or("-");
        if run.succeeded {
            println!("{} {:<6} {:>4} posts  {}", when, run.mode.as_str(), run.post_count, url);
        } else {
            println!(
                "{} {:<6} failed      {} ({})",
                when,
                run.mode.as_str(),
                url,
                run.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn run_mode(request: &ExtractionRequest) -> RunMode {
    match request {
        ExtractionRequest::Single { .. } => RunMode::Single,
        ExtractionRequest::Range(_) => RunMode::Range,
    }
}

/// Run the engine while relaying its events to stderr.
async fn run_with_progress<T: Timeline>(
    engine: &Engine<T>,
    request: ExtractionRequest,
) -> Result<Report> {
    let (sink, mut rx) = EventSink::channel();

    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                EngineEvent::Progress(message) => eprintln!("{}", message),
                EngineEvent::Complete { count, .. } => {
                    eprintln!("Completed! Found {} posts.", count)
                }
                EngineEvent::Failed(message) => eprintln!("Error: {}", message),
            }
        }
    });

    let result = engine.run(request, &sink).await;
    drop(sink);
    let _ = printer.await;

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::domain::RangePreset;

    #[tokio::test]
    async fn test_parse_saved_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.html");
        std::fs::write(
            &path,
            r#"<article><a href="/a/status/1"><time datetime="2024-05-01T10:00:00Z">x</time></a><div data-testid="tweetText">hi</div></article>"#,
        )
        .unwrap();

        let ctx = AppContext::in_memory(Config::default()).unwrap();
        let range = RangeArgs {
            range: RangePreset::Custom,
            start: Some("2024-01-01T00:00:00Z".into()),
            end: None,
        };
        parse_saved(&ctx, &path, Some("https://x.com/a"), &range).await.unwrap();
        // Offline parsing never records a run
        assert!(ctx.store.recent_runs(1).unwrap().is_empty());
    }

    #[test]
    fn test_history_empty() {
        let ctx = AppContext::in_memory(Config::default()).unwrap();
        history(&ctx, 5).unwrap();
    }
}
