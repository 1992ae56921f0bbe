mod page;
mod run;

use std::path::PathBuf;

use brandsync_core::{AppConfig, DedupPolicy, EmptyPolicy, SortOrder};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "brandsync-cli")]
#[command(about = "Keeps a static brands page in sync with the source site")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract structured brand records and write them as JSON
    Sync {
        #[command(flatten)]
        run: RunArgs,
    },
    /// Capture the brand section's markup and styles as a standalone page
    Capture {
        #[command(flatten)]
        run: RunArgs,

        /// Where to write the standalone HTML page
        #[arg(long)]
        html_output: Option<PathBuf>,
    },
}

/// Per-run overrides shared by both modes.
#[derive(Debug, Args)]
struct RunArgs {
    /// Page to scrape instead of the configured source URL
    #[arg(long)]
    url: Option<String>,

    /// Read a saved HTML snapshot instead of fetching the page
    #[arg(long)]
    html_file: Option<PathBuf>,

    /// Where to write the JSON report
    #[arg(long)]
    output: Option<PathBuf>,

    /// Report an error instead of placeholder records when nothing is found
    #[arg(long)]
    no_fallback: bool,

    /// Keep records in selector order instead of sorting by name
    #[arg(long)]
    insertion_order: bool,

    /// Dedup key: `name` or `name_and_logo`
    #[arg(long)]
    dedup: Option<DedupPolicy>,
}

impl RunArgs {
    fn apply(&self, config: &mut AppConfig) -> anyhow::Result<()> {
        if let Some(url) = &self.url {
            let Some(origin) = brandsync_core::config::origin_of(url) else {
                anyhow::bail!("--url '{url}' is not an http(s) URL");
            };
            config.source_url.clone_from(url);
            config.origin = origin;
        }
        if let Some(output) = &self.output {
            config.output_path.clone_from(output);
        }
        if self.no_fallback {
            config.empty_policy = EmptyPolicy::Fail;
        }
        if self.insertion_order {
            config.sort_order = SortOrder::Insertion;
        }
        if let Some(dedup) = self.dedup {
            config.dedup_policy = dedup;
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = brandsync_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Commands::Sync { run: args } => {
            args.apply(&mut config)?;
            run::run_sync(&config, args.html_file.as_deref()).await
        }
        Commands::Capture {
            run: args,
            html_output,
        } => {
            args.apply(&mut config)?;
            if let Some(path) = html_output {
                config.html_output_path = path;
            }
            run::run_capture(&config, args.html_file.as_deref()).await
        }
    }
}

#[cfg(test)]
mod tests;
