//! Sandboxed Snippet Execution
//!
//! Runs short code snippets through a configured interpreter with a hard
//! wall-clock ceiling. The child is killed when the ceiling elapses or the
//! future is dropped; output is captured in full, lossily decoded.

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::debug;

use crate::types::{CompanionError, Result};

/// Captured result of one snippet run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl RunOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Run `code` under `interpreter -c`, enforcing the wall-clock `ceiling`.
///
/// A run that exceeds the ceiling fails with [`CompanionError::Timeout`]; a
/// snippet that itself exits non-zero is not an error here, the exit code is
/// reported as-is. A terminating signal maps to exit code -1.
pub async fn run_snippet(interpreter: &str, code: &str, ceiling: Duration) -> Result<RunOutcome> {
    debug!(interpreter, ceiling_secs = ceiling.as_secs(), "Running snippet");

    let child = Command::new(interpreter)
        .arg("-c")
        .arg(code)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| {
            CompanionError::Execution(format!("Failed to start interpreter {interpreter}: {e}"))
        })?;

    let output = tokio::time::timeout(ceiling, child.wait_with_output())
        .await
        .map_err(|_| CompanionError::Timeout {
            operation: "code execution".to_string(),
            duration: ceiling,
        })?
        .map_err(|e| CompanionError::Execution(format!("Failed to collect output: {e}")))?;

    Ok(RunOutcome {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        exit_code: output.status.code().unwrap_or(-1),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn captures_stdout_and_exit_code() {
        let outcome = run_snippet("sh", "echo hello", Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(outcome.stdout.trim(), "hello");
        assert_eq!(outcome.exit_code, 0);
        assert!(outcome.success());
    }

    #[tokio::test]
    async fn nonzero_exit_is_reported_not_errored() {
        let outcome = run_snippet("sh", "echo oops >&2; exit 3", Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(outcome.exit_code, 3);
        assert_eq!(outcome.stderr.trim(), "oops");
        assert!(!outcome.success());
    }

    #[tokio::test]
    async fn missing_interpreter_is_execution_error() {
        let err = run_snippet("definitely-not-an-interpreter", "1", Duration::from_secs(5))
            .await
            .unwrap_err();

        assert!(matches!(err, CompanionError::Execution(_)));
    }

    #[tokio::test]
    async fn runaway_snippet_hits_the_ceiling() {
        let err = run_snippet("sh", "sleep 30", Duration::from_millis(100))
            .await
            .unwrap_err();

        match err {
            CompanionError::Timeout { operation, .. } => {
                assert_eq!(operation, "code execution");
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }
}
