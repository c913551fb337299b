//! # Skimmer
//!
//! Collects posts from a rendered social timeline into a tab-separated report.
//!
//! ## Architecture
//!
//! ```text
//! Timeline (browser page) → HtmlAdapter → PostParser → Engine → RowFormatter → report
//! ```
//!
//! - [`timeline`]: the page seam, with a chromiumoxide-backed implementation
//! - [`parser`]: turns one rendered post into a [`PostRecord`](domain::PostRecord)
//! - [`engine`]: single-post lookup and range collection with its stop heuristics
//! - [`store`]: SQLite bookkeeping of past runs, used to resume
//!
//! ## Quick Start
//!
//! ```bash
//! # Everything posted today on a profile
//! skimmer extract https://x.com/alice
//!
//! # Last week, appended to a file
//! skimmer extract https://x.com/alice --range last-week -o posts.tsv
//!
//! # An account's posts from last week, found through live search
//! skimmer extract --user alice --range last-week
//!
//! # Continue where the last run stopped
//! skimmer extract https://x.com/alice --resume
//!
//! # A single post
//! skimmer extract https://x.com/alice/status/1785000000000000000
//! ```
//!
//! ## Report format
//!
//! One line per post, tab-separated, oldest first:
//!
//! ```text
//! 21:45	【X】	05/01 09:07	post text with [links](https://t.co/xyz)
//! ```

/// Application context and error handling.
pub mod app;

/// Command-line interface using clap.
///
/// - `extract <url>` - Extract posts from a live page
/// - `parse <file>` - Extract posts from a saved page
/// - `ping <url>` - Liveness probe
/// - `history` - Past runs
pub mod cli;

/// Configuration management.
///
/// Loads from `~/.config/skimmer/config.toml`.
pub mod config;

/// Core domain models.
///
/// - [`PostRecord`](domain::PostRecord): one parsed post
/// - [`DateWindow`](domain::DateWindow): inclusive collection bounds and presets
/// - [`DisplayZone`](domain::DisplayZone): zone used for rendering and calendar math
pub mod domain;

/// The extraction engine.
pub mod engine;

/// Report formatting settings and file output.
pub mod output;

/// Post parsing from rendered markup.
pub mod parser;

/// SQLite persistence of run bookkeeping.
///
/// - [`RunStore`](store::RunStore): Trait defining storage operations
/// - [`SqliteStore`](store::SqliteStore): SQLite implementation
pub mod store;

/// Rendered pages the engine reads from.
///
/// - [`Timeline`](timeline::Timeline): Async trait for page access
/// - [`ChromeTimeline`](timeline::ChromeTimeline): headless Chrome via chromiumoxide
/// - [`StaticTimeline`](timeline::StaticTimeline): saved or scripted markup
pub mod timeline;
