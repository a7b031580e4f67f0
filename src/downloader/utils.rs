// Helpers for invoking the external tools

use std::process::Stdio;
use tokio::io::AsyncReadExt;
use tokio::process::Command as TokioCommand;
use tokio::time::{timeout, Duration as TokioDuration};

use crate::downloader::errors::DownloadError;

/// Run a command with a hard deadline, capturing stdout and stderr. The
/// child is killed when the deadline passes.
pub async fn run_output_with_timeout(
    program: &str,
    args: &[String],
    timeout_secs: u64,
) -> Result<std::process::Output, DownloadError> {
    let mut child = TokioCommand::new(program)
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| DownloadError::ExecutionError(format!("Failed to start {}: {}", program, e)))?;

    let mut stdout_pipe = child.stdout.take().ok_or_else(|| {
        DownloadError::ExecutionError(format!("Failed to capture stdout from {}", program))
    })?;
    let mut stderr_pipe = child.stderr.take().ok_or_else(|| {
        DownloadError::ExecutionError(format!("Failed to capture stderr from {}", program))
    })?;

    let stdout_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        stdout_pipe.read_to_end(&mut buf).await.map(|_| buf)
    });
    let stderr_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        stderr_pipe.read_to_end(&mut buf).await.map(|_| buf)
    });

    let waited = timeout(TokioDuration::from_secs(timeout_secs), child.wait()).await;
    match waited {
        Ok(status_res) => {
            let status = status_res.map_err(|e| {
                DownloadError::ExecutionError(format!("Failed to wait for {}: {}", program, e))
            })?;
            let stdout = stdout_task
                .await
                .map_err(|e| DownloadError::ExecutionError(format!("stdout task failed: {}", e)))?
                .map_err(|e| DownloadError::ExecutionError(format!("Failed to read stdout: {}", e)))?;
            let stderr = stderr_task
                .await
                .map_err(|e| DownloadError::ExecutionError(format!("stderr task failed: {}", e)))?
                .map_err(|e| DownloadError::ExecutionError(format!("Failed to read stderr: {}", e)))?;
            Ok(std::process::Output {
                status,
                stdout,
                stderr,
            })
        }
        Err(_) => {
            let _ = child.kill().await;
            stdout_task.abort();
            stderr_task.abort();
            Err(DownloadError::Timeout)
        }
    }
}

/// Run a command to completion with no deadline (the probe path).
pub async fn run_output(
    program: &str,
    args: &[String],
) -> Result<std::process::Output, DownloadError> {
    TokioCommand::new(program)
        .args(args)
        .output()
        .await
        .map_err(|e| DownloadError::ExecutionError(format!("Failed to run {}: {}", program, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_captures_stdout() {
        let output = run_output_with_timeout("echo", &["hello".to_string()], 5)
            .await
            .unwrap();
        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "hello");
    }

    #[tokio::test]
    async fn test_timeout_kills_child() {
        let err = run_output_with_timeout("sleep", &["30".to_string()], 1)
            .await
            .unwrap_err();
        assert!(matches!(err, DownloadError::Timeout));
    }

    #[tokio::test]
    async fn test_missing_binary_is_execution_error() {
        let err = run_output_with_timeout("definitely-not-a-binary", &[], 1)
            .await
            .unwrap_err();
        assert!(matches!(err, DownloadError::ExecutionError(_)));
    }
}
