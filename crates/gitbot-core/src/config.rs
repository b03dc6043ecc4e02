//! Maintenance plan loaded from a gitbot YAML file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// An executable plus the fixed prefix of its arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(path: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            path: path.into(),
            args,
        }
    }

    /// Check the command is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.path.is_empty() {
            return Err(ConfigError::Invalid(
                "command must specify 'path'".to_string(),
            ));
        }
        Ok(())
    }
}

/// Top-level gitbot config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Repositories to clone, as URLs or local paths.
    #[serde(default)]
    pub repos: Vec<String>,

    /// Parent directory for scratch workspaces.
    #[serde(default)]
    pub base_path: Option<PathBuf>,

    /// Commands that mutate a checkout, run in order.
    #[serde(default)]
    pub change_cmds: Vec<CommandSpec>,

    /// Commands that publish committed changes, run in order.
    #[serde(default)]
    pub post_cmds: Vec<CommandSpec>,
}

impl Config {
    /// Read and parse a config file. Does not validate.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text)
    }

    /// Parse config text. Does not validate.
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Check the config describes a runnable plan.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.repos.is_empty() {
            return Err(ConfigError::Invalid(
                "config must contain a non-empty 'repos' list".to_string(),
            ));
        }
        for cmd in &self.change_cmds {
            cmd.validate()?;
        }
        if self.post_cmds.is_empty() {
            return Err(ConfigError::Invalid(
                "config must contain a non-empty 'post_cmds' list".to_string(),
            ));
        }
        for cmd in &self.post_cmds {
            cmd.validate()?;
        }
        Ok(())
    }

    /// `base_path`, treating an empty value as unset.
    pub fn base_path(&self) -> Option<&Path> {
        self.base_path
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
repos:
  - git@github.com:org/service-a.git
  - /srv/mirrors/service-b
base_path: /scratch
change_cmds:
  - path: ./bump-deps.sh
    args: ["--minor"]
  - path: /usr/local/bin/fmt-all
post_cmds:
  - path: git
    args: [push, origin, HEAD:refs/heads/gitbot]
"#;

    fn valid() -> Config {
        Config {
            repos: vec!["repo".to_string()],
            base_path: None,
            change_cmds: vec![CommandSpec::new("./change.sh", vec![])],
            post_cmds: vec![CommandSpec::new("git", vec!["push".to_string()])],
        }
    }

    fn invalid_message(cfg: &Config) -> String {
        match cfg.validate() {
            Err(ConfigError::Invalid(msg)) => msg,
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_full_config() {
        let cfg = Config::from_yaml(FULL).unwrap();
        assert_eq!(cfg.repos.len(), 2);
        assert_eq!(cfg.base_path(), Some(Path::new("/scratch")));
        assert_eq!(cfg.change_cmds[0].path, "./bump-deps.sh");
        assert_eq!(cfg.change_cmds[0].args, vec!["--minor".to_string()]);
        assert!(cfg.change_cmds[1].args.is_empty());
        assert_eq!(cfg.post_cmds[0].args.len(), 3);
        cfg.validate().unwrap();
    }

    #[test]
    fn test_missing_optional_keys_default() {
        let cfg = Config::from_yaml("repos: [a]\npost_cmds: [{path: git}]\n").unwrap();
        assert!(cfg.base_path().is_none());
        assert!(cfg.change_cmds.is_empty());
        cfg.validate().unwrap();
    }

    #[test]
    fn test_empty_base_path_is_unset() {
        let cfg = Config::from_yaml("base_path: \"\"\nrepos: [a]\n").unwrap();
        assert!(cfg.base_path().is_none());
    }

    #[test]
    fn test_malformed_yaml_is_parse_error() {
        let err = Config::from_yaml("repos: [a, b\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_wrong_shape_is_parse_error() {
        let err = Config::from_yaml("repos: {a: b}\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_empty_repos_rejected() {
        let cfg = Config {
            repos: vec![],
            ..valid()
        };
        assert_eq!(
            invalid_message(&cfg),
            "config must contain a non-empty 'repos' list"
        );
    }

    #[test]
    fn test_change_cmd_without_path_rejected() {
        let cfg = Config {
            change_cmds: vec![CommandSpec::new("", vec!["x".to_string()])],
            ..valid()
        };
        assert_eq!(invalid_message(&cfg), "command must specify 'path'");
    }

    #[test]
    fn test_empty_post_cmds_rejected() {
        let cfg = Config {
            post_cmds: vec![],
            ..valid()
        };
        assert_eq!(
            invalid_message(&cfg),
            "config must contain a non-empty 'post_cmds' list"
        );
    }

    #[test]
    fn test_post_cmd_without_path_rejected() {
        let cfg = Config {
            post_cmds: vec![CommandSpec::default()],
            ..valid()
        };
        assert_eq!(invalid_message(&cfg), "command must specify 'path'");
    }

    #[test]
    fn test_checks_run_in_order() {
        // Empty repos wins over every other problem.
        let cfg = Config {
            repos: vec![],
            change_cmds: vec![CommandSpec::default()],
            post_cmds: vec![],
            base_path: None,
        };
        assert_eq!(
            invalid_message(&cfg),
            "config must contain a non-empty 'repos' list"
        );

        // A bad change command is reported before missing post commands.
        let cfg = Config {
            change_cmds: vec![CommandSpec::default()],
            post_cmds: vec![],
            ..valid()
        };
        assert_eq!(invalid_message(&cfg), "command must specify 'path'");
    }

    #[test]
    fn test_load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gitbot.yml");
        std::fs::write(&path, FULL).unwrap();
        let cfg = Config::load(&path).unwrap();
        assert_eq!(cfg.repos[0], "git@github.com:org/service-a.git");
    }

    #[test]
    fn test_load_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("absent.yml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
