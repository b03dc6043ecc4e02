//! Per-repository workflow: clone, apply changes, commit, publish.
//!
//! Repositories are processed one at a time, in config order:
//!
//! 1. Create a scratch workspace and shallow-clone the repository into it.
//! 2. Run each change command with the workspace path appended to its args.
//!    A zero exit means "changed": the tree is staged and committed with the
//!    command's stdout as the message. A non-zero exit means "nothing to do"
//!    and the next change command runs.
//! 3. If at least one change command committed, run the post commands in the
//!    workspace. Otherwise move on.
//!
//! Clone, stage, commit and post command failures abort the whole run.
//! Workspaces are released once the run ends, whichever way it ends.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::{debug, info, info_span, warn, Instrument};

use crate::config::{CommandSpec, Config};
use crate::error::{ConfigError, GitbotError, Result};
use crate::git;
use crate::paths::resolve_command_path;
use crate::runner::{run_capturing, run_streaming};
use crate::workspace::{scratch_root, Workspaces};

/// Environment variable that keeps workspaces around after the run.
pub const LEAVE_TEMPDIRS_ENV: &str = "GITBOT_LEAVE_TEMPDIRS";

/// Run-time knobs that do not live in the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Location of the config file; relative command paths resolve against it.
    pub config_path: PathBuf,
    /// Keep workspaces instead of removing them when the run ends.
    pub leave_tempdirs: bool,
}

impl RunOptions {
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            leave_tempdirs: false,
        }
    }

    /// Options with `leave_tempdirs` taken from [`LEAVE_TEMPDIRS_ENV`].
    pub fn from_env(config_path: impl Into<PathBuf>) -> Self {
        let leave_tempdirs = std::env::var_os(LEAVE_TEMPDIRS_ENV).is_some_and(|v| !v.is_empty());
        Self {
            leave_tempdirs,
            ..Self::new(config_path)
        }
    }
}

/// What a single change command did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeOutcome {
    /// Exited zero; the tree was committed with this message.
    Committed {
        message: String,
        /// HEAD after the commit, when git could report it.
        sha: Option<String>,
    },
    /// Exited non-zero or could not be started.
    NoChange,
}

/// What happened to one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoOutcome {
    pub repo: String,
    /// Number of commits made by change commands.
    pub commits: usize,
    /// Whether post commands ran.
    pub posted: bool,
    /// SHA of the last commit made in the workspace, if any.
    pub head: Option<String>,
}

/// Outcome of a run that finished without a fatal error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub repos: Vec<RepoOutcome>,
}

impl RunSummary {
    /// Repositories that received at least one commit.
    pub fn changed(&self) -> impl Iterator<Item = &RepoOutcome> {
        self.repos.iter().filter(|r| r.commits > 0)
    }
}

/// Drives the maintenance plan over every configured repository.
pub struct RepoWorkflow<'a> {
    config: &'a Config,
    options: RunOptions,
}

impl<'a> RepoWorkflow<'a> {
    pub fn new(config: &'a Config, options: RunOptions) -> Self {
        Self { config, options }
    }

    /// Validate the config, process every repository, then release workspaces.
    ///
    /// Stops at the first fatal error; repositories after it are not attempted.
    /// A relative config path is anchored at the current directory before any
    /// repository is cloned, since commands run inside the workspaces.
    pub async fn run(&self) -> Result<RunSummary> {
        self.config.validate()?;

        let options = RunOptions {
            config_path: absolute_config_path(&self.options.config_path)?,
            ..self.options.clone()
        };
        let anchored = RepoWorkflow::new(self.config, options);

        let mut workspaces = Workspaces::new(
            scratch_root(self.config.base_path()),
            self.options.leave_tempdirs,
        );
        let result = anchored.process_all(&mut workspaces).await;
        workspaces.release();
        result
    }

    async fn process_all(&self, workspaces: &mut Workspaces) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        for repo in &self.config.repos {
            let span = info_span!("repo", repo = %repo);
            let outcome = self.process_repo(repo, workspaces).instrument(span).await?;
            summary.repos.push(outcome);
        }
        Ok(summary)
    }

    async fn process_repo(&self, repo: &str, workspaces: &mut Workspaces) -> Result<RepoOutcome> {
        let workspace = workspaces.create(repo)?;

        info!(dir = %workspace.display(), "cloning to workspace");
        let status = git::clone_shallow(repo, &workspace)
            .await
            .map_err(|source| spawn_error(repo, "git", source))?;
        if !status.success() {
            return Err(GitbotError::Clone {
                repo: repo.to_string(),
                status,
            });
        }

        info!("making changes");
        let mut commits = 0;
        let mut head = None;
        for cmd in &self.config.change_cmds {
            if let ChangeOutcome::Committed { sha, .. } = self.apply_change(repo, cmd, &workspace).await? {
                commits += 1;
                head = sha;
            }
        }

        if commits == 0 {
            info!("no change produced a commit; skipping post commands");
            return Ok(RepoOutcome {
                repo: repo.to_string(),
                commits,
                posted: false,
                head,
            });
        }

        info!("running post commands");
        for cmd in &self.config.post_cmds {
            self.run_post(repo, cmd, &workspace).await?;
        }

        Ok(RepoOutcome {
            repo: repo.to_string(),
            commits,
            posted: true,
            head,
        })
    }

    /// Run one change command and commit whatever it changed.
    async fn apply_change(
        &self,
        repo: &str,
        cmd: &CommandSpec,
        workspace: &Path,
    ) -> Result<ChangeOutcome> {
        let program = resolve_command_path(&self.options.config_path, &cmd.path);
        let mut args: Vec<&OsStr> = cmd.args.iter().map(OsStr::new).collect();
        args.push(workspace.as_os_str());

        debug!(program = %program.display(), "running change command");
        let output = match run_capturing(&program, args, workspace).await {
            Ok(output) if output.success() => output,
            Ok(output) => {
                warn!(program = %program.display(), status = %output.status, "change command failed");
                info!("no changes to make");
                return Ok(ChangeOutcome::NoChange);
            }
            Err(err) => {
                warn!(program = %program.display(), error = %err, "change command could not be started");
                info!("no changes to make");
                return Ok(ChangeOutcome::NoChange);
            }
        };

        info!("committing changes");
        let status = git::stage_all(workspace)
            .await
            .map_err(|source| spawn_error(repo, "git", source))?;
        if !status.success() {
            return Err(GitbotError::Stage {
                repo: repo.to_string(),
                status,
            });
        }

        let status = git::commit(workspace, &output.stdout)
            .await
            .map_err(|source| spawn_error(repo, "git", source))?;
        if !status.success() {
            return Err(GitbotError::Commit {
                repo: repo.to_string(),
                status,
            });
        }
        let sha = git::head_sha(workspace).await;
        debug!(sha = sha.as_deref().unwrap_or("unknown"), "committed");

        Ok(ChangeOutcome::Committed {
            message: output.stdout,
            sha,
        })
    }

    async fn run_post(&self, repo: &str, cmd: &CommandSpec, workspace: &Path) -> Result<()> {
        let program = resolve_command_path(&self.options.config_path, &cmd.path);
        debug!(program = %program.display(), "running post command");

        let status = run_streaming(&program, &cmd.args, workspace)
            .await
            .map_err(|source| spawn_error(repo, &program.display().to_string(), source))?;
        if !status.success() {
            return Err(GitbotError::PostCommand {
                repo: repo.to_string(),
                program: program.display().to_string(),
                status,
            });
        }
        Ok(())
    }
}

fn absolute_config_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(|source| ConfigError::Resolve {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(cwd.join(path))
}

fn spawn_error(repo: &str, program: &str, source: std::io::Error) -> GitbotError {
    GitbotError::Spawn {
        repo: repo.to_string(),
        program: program.to_string(),
        source,
    }
}
