//! gitbot - multi-repository maintenance bot
//!
//! Clones every repository listed in a YAML config, runs the configured
//! change commands against each checkout, commits what they produce and, when
//! anything was committed, runs the post commands (push, open a pull request).
//!
//! Environment:
//!
//! - `GITBOT_LEAVE_TEMPDIRS`: when non-empty, scratch checkouts are kept
//! - `RUST_LOG`: log filter, overrides `--verbose`

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::Parser;
use tracing::{error, info, Level};

use gitbot_core::{Config, RepoWorkflow, RunOptions};

#[derive(Parser)]
#[command(name = "gitbot")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Apply scripted changes across many git repositories", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json: bool,

    /// Path to the gitbot YAML config
    config: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(1),
            };
        }
    };

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    gitbot_core::init_tracing(cli.json, level);

    match run(&cli.config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config_path: &Path) -> Result<()> {
    let config = Config::load(config_path)?;
    config.validate()?;

    let options = RunOptions::from_env(config_path);
    if options.leave_tempdirs {
        info!("leaving scratch workspaces in place");
    }

    let summary = RepoWorkflow::new(&config, options).run().await?;
    for outcome in summary.changed() {
        info!(
            repo = %outcome.repo,
            commits = outcome.commits,
            head = outcome.head.as_deref().unwrap_or("unknown"),
            "published"
        );
    }
    info!(
        repos = summary.repos.len(),
        changed = summary.changed().count(),
        "run complete"
    );
    Ok(())
}
