//! gitbot-shepherd - print a randomly chosen shepherd for a checkout
//!
//! Reads `<checkout>/launch/<checkout-name>.yml` and prints one of its
//! `shepherds`. Prints nothing when the repository has none.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::Level;

#[derive(Parser)]
#[command(name = "gitbot-shepherd")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Pick a random shepherd for a repository checkout", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Repository checkout (default: current directory)
    checkout: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    gitbot_core::init_tracing(false, level);

    let checkout = match cli.checkout {
        Some(path) => path
            .canonicalize()
            .with_context(|| format!("failed to resolve {}", path.display()))?,
        None => PathBuf::new(),
    };

    if let Some(shepherd) = gitbot_shepherd::get_shepherd(&checkout)? {
        println!("{shepherd}");
    }
    Ok(())
}
