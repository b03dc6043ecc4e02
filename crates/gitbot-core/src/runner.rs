//! Subprocess execution for git and user-supplied commands.
//!
//! Every call waits for the child to exit. There are no timeouts: a command
//! that hangs blocks the run.

use std::ffi::OsStr;
use std::path::Path;
use std::process::{ExitStatus, Stdio};

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::process::{Child, Command};
use tracing::warn;

/// Exit status and captured stdout of a command.
#[derive(Debug, Clone)]
pub struct CapturedOutput {
    pub status: ExitStatus,
    /// Everything the command wrote to stdout (lossy UTF-8).
    pub stdout: String,
}

impl CapturedOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }
}

/// Run a command with stdout and stderr passed straight through.
pub async fn run_streaming<P, I, S>(program: P, args: I, cwd: &Path) -> std::io::Result<ExitStatus>
where
    P: AsRef<OsStr>,
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    Command::new(program)
        .args(args)
        .current_dir(cwd)
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
}

/// Run a command, teeing its stdout to ours while keeping a copy.
///
/// Stderr is passed straight through and not captured.
pub async fn run_capturing<P, I, S>(program: P, args: I, cwd: &Path) -> std::io::Result<CapturedOutput>
where
    P: AsRef<OsStr>,
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    run_teeing(program, args, cwd, tokio::io::stdout()).await
}

/// Like [`run_capturing`], echoing to `live` instead of our stdout.
///
/// The child always exits before this returns. If `live` stops accepting
/// writes the echo is dropped and capture carries on; if the pipe itself
/// fails the child is killed.
async fn run_teeing<P, I, S, W>(program: P, args: I, cwd: &Path, mut live: W) -> std::io::Result<CapturedOutput>
where
    P: AsRef<OsStr>,
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
    W: AsyncWrite + Unpin,
{
    let mut child = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()?;

    let captured = match child.stdout.take() {
        Some(pipe) => tee(pipe, &mut live).await,
        None => Err(std::io::Error::other("child stdout was not piped")),
    };
    let captured = match captured {
        Ok(captured) => captured,
        Err(err) => {
            kill(&mut child).await;
            return Err(err);
        }
    };

    let status = child.wait().await?;
    Ok(CapturedOutput {
        status,
        stdout: String::from_utf8_lossy(&captured).into_owned(),
    })
}

async fn tee<R, W>(mut pipe: R, live: &mut W) -> std::io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut echo = true;
    let mut captured = Vec::new();
    let mut chunk = [0u8; 8192];
    loop {
        let n = pipe.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        captured.extend_from_slice(&chunk[..n]);
        if echo {
            if let Err(err) = live.write_all(&chunk[..n]).await {
                warn!(error = %err, "stopped echoing command output");
                echo = false;
            }
        }
    }
    if echo {
        if let Err(err) = live.flush().await {
            warn!(error = %err, "failed to flush command output");
        }
    }
    Ok(captured)
}

async fn kill(child: &mut Child) {
    if let Err(err) = child.kill().await {
        warn!(error = %err, "failed to kill command");
    }
}
