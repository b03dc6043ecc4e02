//! Git operations on a workspace checkout.
//!
//! Output from git is streamed to the terminal. Callers decide what a
//! non-zero exit means.

use std::ffi::OsStr;
use std::path::Path;
use std::process::ExitStatus;

use tokio::process::Command;

use crate::runner::run_streaming;

/// Shallow-clone `repo` into `dest`.
///
/// Runs `git clone --depth 1 <repo> <dest>` with `dest` as working directory.
pub async fn clone_shallow(repo: &str, dest: &Path) -> std::io::Result<ExitStatus> {
    let args = [
        OsStr::new("clone"),
        OsStr::new("--depth"),
        OsStr::new("1"),
        OsStr::new(repo),
        dest.as_os_str(),
    ];
    run_streaming("git", args, dest).await
}

/// Stage every modification in the work tree (`git add -A`).
pub async fn stage_all(workdir: &Path) -> std::io::Result<ExitStatus> {
    run_streaming("git", ["add", "-A"], workdir).await
}

/// Commit staged changes with `message`.
pub async fn commit(workdir: &Path, message: &str) -> std::io::Result<ExitStatus> {
    run_streaming("git", ["commit", "-m", message], workdir).await
}

/// HEAD commit SHA of the checkout at `workdir`, if it has one.
pub async fn head_sha(workdir: &Path) -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "HEAD"])
        .current_dir(workdir)
        .output()
        .await
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let sha = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!sha.is_empty()).then_some(sha)
}
