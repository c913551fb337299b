pub mod commands;

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};

use crate::app::Result;
use crate::domain::{DateWindow, DisplayZone, RangePreset};

#[derive(Parser)]
#[command(name = "skimmer")]
#[command(
    about = "Collect posts from a rendered timeline into a tab-separated report",
    long_about = None
)]
pub struct Cli {
    /// Log scan passes and scroll decisions
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file to use instead of ~/.config/skimmer/config.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open a timeline or post page and extract posts
    Extract {
        /// Profile timeline URL, or a post permalink for single-post mode
        url: Option<String>,

        /// Search this account's posts for the selected range instead of opening a URL
        #[arg(short, long, conflicts_with = "url")]
        user: Option<String>,

        #[command(flatten)]
        range: RangeArgs,

        /// Start from the end of the last successful run
        #[arg(long)]
        resume: bool,

        /// Also write the report to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Replace the output file instead of appending
        #[arg(long)]
        no_append: bool,

        /// Show the browser window
        #[arg(long)]
        headed: bool,
    },
    /// Run the extraction over a saved HTML page
    Parse {
        /// Path to the saved page
        path: PathBuf,

        /// URL the page was saved from, for resolving links and picking the mode
        #[arg(long)]
        base_url: Option<String>,

        #[command(flatten)]
        range: RangeArgs,
    },
    /// Check that a page loads and the engine responds
    Ping {
        /// Page to open
        url: String,
    },
    /// List recent runs
    History {
        /// Number of runs to show
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
}

#[derive(Args, Debug, Clone)]
pub struct RangeArgs {
    /// Date range preset
    #[arg(short, long, value_enum, default_value_t = RangePreset::Today)]
    pub range: RangePreset,

    /// Start date (YYYY-MM-DD, YYYY-MM-DDTHH:MM or RFC 3339); implies a custom range
    #[arg(long)]
    pub start: Option<String>,

    /// End date; a bare date covers that whole day. Defaults to now
    #[arg(long)]
    pub end: Option<String>,
}

impl RangeArgs {
    pub fn window(&self, now: DateTime<Utc>, zone: &DisplayZone) -> Result<DateWindow> {
        let preset = if self.start.is_some() {
            RangePreset::Custom
        } else {
            self.range
        };
        DateWindow::from_preset(preset, now, zone, self.start.as_deref(), self.end.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_cli_parses_extract() {
        let cli = Cli::try_parse_from([
            "skimmer",
            "extract",
            "https://x.com/alice",
            "--range",
            "last-week",
            "-o",
            "posts.tsv",
        ])
        .unwrap();

        match cli.command {
            Commands::Extract { url, range, output, resume, .. } => {
                assert_eq!(url.as_deref(), Some("https://x.com/alice"));
                assert_eq!(range.range, RangePreset::LastWeek);
                assert_eq!(output, Some(PathBuf::from("posts.tsv")));
                assert!(!resume);
            }
            _ => panic!("expected extract"),
        }
    }

    #[test]
    fn test_cli_parses_user_target() {
        let cli = Cli::try_parse_from(["skimmer", "extract", "--user", "alice"]).unwrap();
        let Commands::Extract { url, user, .. } = cli.command else {
            panic!("expected extract");
        };
        assert_eq!(url, None);
        assert_eq!(user.as_deref(), Some("alice"));

        let both = ["skimmer", "extract", "https://x.com/bob", "--user", "alice"];
        assert!(Cli::try_parse_from(both).is_err());
    }

    #[test]
    fn test_start_implies_custom() {
        let args = RangeArgs {
            range: RangePreset::Today,
            start: Some("2024-01-01".into()),
            end: None,
        };
        let zone = DisplayZone::parse(Some("+00:00")).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let window = args.window(now, &zone).unwrap();
        assert_eq!(window.start, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(window.end, None);
    }

    #[test]
    fn test_custom_without_start_fails() {
        let args = ["skimmer", "parse", "page.html", "--range", "custom"];
        let cli = Cli::try_parse_from(args).unwrap();
        let Commands::Parse { range, .. } = cli.command else {
            panic!("expected parse");
        };
        let zone = DisplayZone::parse(Some("+00:00")).unwrap();
        assert!(range.window(Utc::now(), &zone).is_err());
    }
}
