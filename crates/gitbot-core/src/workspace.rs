//! Scratch workspaces for repository checkouts.
//!
//! Every repository gets its own directory. Directories are tracked for the
//! whole run and released together once the run ends, on success and on
//! fatal error alike.

use std::path::{Component, Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{GitbotError, Result};

/// Directory under which workspaces are created.
///
/// Without a base path this is the system temp dir. With one, the temp dir
/// path is re-rooted under it (`/scratch` + `/tmp` gives `/scratch/tmp`).
pub fn scratch_root(base_path: Option<&Path>) -> PathBuf {
    let tmp = std::env::temp_dir();
    match base_path {
        None => tmp,
        Some(base) => {
            let relative: PathBuf = tmp
                .components()
                .filter(|c| matches!(c, Component::Normal(_)))
                .collect();
            base.join(relative)
        }
    }
}

/// Run-scoped list of created workspaces.
#[derive(Debug)]
pub struct Workspaces {
    root: PathBuf,
    retain: bool,
    dirs: Vec<PathBuf>,
}

impl Workspaces {
    /// Track workspaces created under `root`. With `retain` set nothing is
    /// removed on release.
    pub fn new(root: impl Into<PathBuf>, retain: bool) -> Self {
        Self {
            root: root.into(),
            retain,
            dirs: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Workspaces created so far, in creation order.
    pub fn paths(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Create a fresh, uniquely named workspace for `repo` and register it
    /// for release.
    pub fn create(&mut self, repo: &str) -> Result<PathBuf> {
        let dir = self
            .root
            .join(format!("gitbot-{}", uuid::Uuid::new_v4().simple()));
        std::fs::create_dir_all(&self.root)
            .and_then(|_| std::fs::create_dir(&dir))
            .map_err(|source| GitbotError::Workspace {
                repo: repo.to_string(),
                root: self.root.clone(),
                source,
            })?;
        debug!(dir = %dir.display(), "created workspace");
        self.dirs.push(dir.clone());
        Ok(dir)
    }

    /// Remove every tracked workspace, most recent first.
    ///
    /// Removal failures are logged and skipped so one stuck directory does not
    /// keep the others around.
    pub fn release(mut self) {
        while let Some(dir) = self.dirs.pop() {
            if self.retain {
                info!(dir = %dir.display(), "leaving workspace");
                continue;
            }
            debug!(dir = %dir.display(), "removing workspace");
            if let Err(err) = std::fs::remove_dir_all(&dir) {
                if err.kind() != std::io::ErrorKind::NotFound {
                    warn!(dir = %dir.display(), error = %err, "failed to remove workspace");
                }
            }
        }
    }
}
