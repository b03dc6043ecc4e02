//! Log setup for the gitbot binaries.
//!
//! Change commands have their stdout echoed to ours, and that stdout is also
//! what becomes the commit message. Keeping our own log lines on stderr leaves
//! stdout holding only command output, so it can be piped or captured intact.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the process-wide subscriber, writing to stderr.
///
/// `json` switches to one JSON object per line (`gitbot --json`). `level` is
/// the verbosity used unless `RUST_LOG` overrides it; the CLI passes `INFO`,
/// or `DEBUG` under `-v`. Later calls are no-ops.
pub fn init_tracing(json: bool, level: Level) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    let text = (!json).then(|| fmt::layer().with_target(false).with_writer(std::io::stderr));
    let json = json.then(|| {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(text)
        .with(json)
        .try_init();
}
