//! Process execution for validated commands

use std::process::Stdio;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use thiserror::Error;
use tokio::process::Command;

/// Errors from the exec facility.
///
/// Captured stderr is surfaced verbatim; truncation is the caller's choice.
#[derive(Debug, Error)]
pub enum ExecError {
    /// The process ran and exited non-zero
    #[error("command exited with status {status}: {stderr}")]
    NonZeroExit { status: i32, stderr: String },

    /// The process could not be started at all
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Seam between the HTTP layer and the operating system. The gatekeeper
/// must have approved the invocation before this trait is reached; the
/// runner is trusted to not re-validate.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Spawn `program` with the given argument vector and capture stdout.
    /// Non-zero exit or spawn failure surfaces as [`ExecError`].
    async fn run(&self, program: &str, args: &[String]) -> Result<String, ExecError>;
}

/// Runner backed by tokio::process. Always spawns with an argument array;
/// no shell is ever involved.
#[derive(Debug, Default, Clone)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<String, ExecError> {
        tracing::debug!(program = %program, args = ?args, "spawning command");

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| ExecError::Spawn {
                program: program.to_string(),
                source,
            })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            let status = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            tracing::debug!(program = %program, status, "command exited non-zero");
            Err(ExecError::NonZeroExit { status, stderr })
        }
    }
}
