//! Error taxonomy for gitbot runs.
//!
//! Config errors stop a run before any repository is touched. Infrastructure
//! errors (clone, stage, commit, post command) stop a run mid-way. A change
//! command exiting non-zero is not an error at all; see
//! [`crate::engine::ChangeOutcome`].

use std::path::PathBuf;
use std::process::ExitStatus;

/// Errors produced while loading or validating a gitbot config.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to resolve config path {}: {source}", path.display())]
    Resolve {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("{0}")]
    Invalid(String),
}

/// Errors that abort a gitbot run.
#[derive(Debug, thiserror::Error)]
pub enum GitbotError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{repo}: failed to create workspace under {}: {source}", root.display())]
    Workspace {
        repo: String,
        root: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{repo}: failed to run {program}: {source}")]
    Spawn {
        repo: String,
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{repo}: error cloning: {status}")]
    Clone { repo: String, status: ExitStatus },

    #[error("{repo}: error adding: {status}")]
    Stage { repo: String, status: ExitStatus },

    #[error("{repo}: error committing: {status}")]
    Commit { repo: String, status: ExitStatus },

    #[error("{repo}: error running post command {program}: {status}")]
    PostCommand {
        repo: String,
        program: String,
        status: ExitStatus,
    },
}

impl GitbotError {
    /// The repository the error belongs to, if it happened inside a repo iteration.
    pub fn repo(&self) -> Option<&str> {
        match self {
            GitbotError::Workspace { repo, .. }
            | GitbotError::Spawn { repo, .. }
            | GitbotError::Clone { repo, .. }
            | GitbotError::Stage { repo, .. }
            | GitbotError::Commit { repo, .. }
            | GitbotError::PostCommand { repo, .. } => Some(repo),
            GitbotError::Config(_) => None,
        }
    }
}

/// Result type for gitbot operations.
pub type Result<T> = std::result::Result<T, GitbotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_displays_message_verbatim() {
        let err = ConfigError::Invalid("config must contain a non-empty 'repos' list".to_string());
        assert_eq!(
            err.to_string(),
            "config must contain a non-empty 'repos' list"
        );
    }

    #[test]
    fn test_config_error_is_transparent_in_gitbot_error() {
        let err = GitbotError::from(ConfigError::Invalid("command must specify 'path'".into()));
        assert_eq!(err.to_string(), "command must specify 'path'");
        assert!(err.repo().is_none());
    }

    #[test]
    fn test_spawn_error_names_repo_and_program() {
        let err = GitbotError::Spawn {
            repo: "git@example.com:org/a.git".to_string(),
            program: "git".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("git@example.com:org/a.git: "));
        assert!(msg.contains("failed to run git"));
        assert_eq!(err.repo(), Some("git@example.com:org/a.git"));
    }

    #[test]
    fn test_workspace_error_is_prefixed_with_repo() {
        let err = GitbotError::Workspace {
            repo: "file:///srv/repos/a".to_string(),
            root: PathBuf::from("/scratch/tmp"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err
            .to_string()
            .starts_with("file:///srv/repos/a: failed to create workspace under /scratch/tmp"));
        assert_eq!(err.repo(), Some("file:///srv/repos/a"));
    }

    #[test]
    fn test_read_error_names_path() {
        let err = ConfigError::Read {
            path: PathBuf::from("/etc/gitbot.yml"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("/etc/gitbot.yml"));
    }
}
