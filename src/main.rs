use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use superfork::fork::{ForkError, RunOptions, Superfork};
use superfork::notice::ConsoleNotice;
use superfork::retry::CallRunner;
use superfork::{Config, GitHubClient};

#[derive(Parser)]
#[command(name = "superfork")]
#[command(about = "Bulk fork or sync GitHub repositories between accounts")]
#[command(version)]
#[command(after_help = "\
A valid GitHub credential is required: either an authenticated GitHub CLI \
(gh auth login) or a GITHUB_TOKEN environment variable.")]
struct Cli {
    /// Destination user or organization
    to: String,

    /// Source account(s) or owner/name repositories (one or more)
    #[arg(required = true)]
    source: Vec<String>,

    /// Don't sync when the destination repository already exists
    #[arg(long)]
    no_sync: bool,

    /// Include private repositories
    #[arg(long)]
    include_private: bool,

    /// Include repositories which were originally forked
    #[arg(long)]
    include_forks: bool,

    /// Include the .github repository if found
    #[arg(long)]
    include_dot_github: bool,

    /// Don't actually do anything, but check status of repositories
    #[arg(long)]
    dry_run: bool,

    /// Don't pause after successful mutating calls
    #[arg(long)]
    unpaced: bool,

    /// Branch to sync (defaults to the destination's default branch)
    #[arg(long)]
    branch: Option<String>,

    /// Configuration file path (defaults to XDG config location)
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose)?;
    info!("Starting superfork v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default()?,
    };

    let options = RunOptions {
        syncing: !cli.no_sync,
        dry_run: cli.dry_run,
        unpaced: cli.unpaced,
        branch: cli.branch.clone(),
        include_private: cli.include_private,
        include_forks: cli.include_forks,
        include_dot_github: cli.include_dot_github,
    };

    // Missing credentials abort here, before any remote call
    let client = GitHubClient::new(&config).await?;

    let notifier = Arc::new(ConsoleNotice);
    let runner = CallRunner::new(&config.calls, options.unpaced, notifier.clone());
    let superfork = Superfork::new(&client, runner, notifier.clone(), options);

    // Sources are processed one at a time; a failed item never aborts the
    // rest of the run.
    let mut failures = 0usize;
    for source in &cli.source {
        if source.contains('/') {
            match superfork.fork_or_sync(source, &cli.to).await {
                Ok(outcome) => {
                    let destination = outcome
                        .destination
                        .as_ref()
                        .map_or_else(|| "-".to_string(), |d| d.full_name());
                    println!("{}: {} -> {}", outcome.decision, outcome.source, destination);
                }
                Err(err) => {
                    failures += 1;
                    report_item_failure(source, &err);
                }
            }
        } else {
            match superfork.mirror_account(source, &cli.to).await {
                Ok(summary) => {
                    println!(
                        "{}: {} processed ({} forked, {} synced, {} existing, {} planned), {} skipped, {} failed",
                        source,
                        summary.processed,
                        summary.forked,
                        summary.synced,
                        summary.existing,
                        summary.planned,
                        summary.skipped,
                        summary.failed
                    );
                    failures += summary.failed;
                }
                Err(err) => {
                    failures += 1;
                    report_item_failure(source, &err);
                }
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} item(s) failed");
    }

    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    Ok(())
}

/// Log a per-item failure without aborting the run
fn report_item_failure(source: &str, err: &ForkError) {
    tracing::error!("{source}: {err}");
    eprintln!("❌ {source}: {err}");
}
