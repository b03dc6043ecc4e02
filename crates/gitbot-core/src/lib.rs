//! gitbot core library
//!
//! Loads a maintenance plan and applies it to a list of repositories: clone,
//! run change commands, commit what they produce, and publish through post
//! commands when something changed.

pub mod config;
pub mod engine;
pub mod error;
pub mod git;
pub mod paths;
pub mod runner;
pub mod telemetry;
pub mod workspace;

pub use config::{CommandSpec, Config};
pub use engine::{
    ChangeOutcome, RepoOutcome, RepoWorkflow, RunOptions, RunSummary, LEAVE_TEMPDIRS_ENV,
};
pub use error::{ConfigError, GitbotError, Result};
pub use paths::resolve_command_path;
pub use telemetry::init_tracing;
pub use workspace::{scratch_root, Workspaces};
