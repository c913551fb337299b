use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use skimmer::app::AppContext;
use skimmer::cli::commands::{self, ExtractOptions};
use skimmer::cli::{Cli, Commands};
use skimmer::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; logs go to stderr so the report owns stdout
    let default_filter = if cli.verbose { "skimmer=debug" } else { "skimmer=warn" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .init();

    let config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let ctx = AppContext::new(config, None)?;

    match cli.command {
        Commands::Extract {
            url,
            user,
            range,
            resume,
            output,
            no_append,
            headed,
        } => {
            let append = ctx.config.output.append && !no_append;
            commands::extract(
                &ctx,
                ExtractOptions {
                    url: url.as_deref(),
                    user: user.as_deref(),
                    range: &range,
                    resume,
                    output: output.as_deref(),
                    append,
                    headed,
                },
            )
            .await?;
        }
        Commands::Parse {
            path,
            base_url,
            range,
        } => {
            commands::parse_saved(&ctx, &path, base_url.as_deref(), &range).await?;
        }
        Commands::Ping { url } => {
            commands::ping(&ctx, &url).await?;
        }
        Commands::History { limit } => {
            commands::history(&ctx, limit)?;
        }
    }

    Ok(())
}
