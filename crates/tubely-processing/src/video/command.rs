use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;

use crate::error::MediaToolError;

/// Run a media tool to completion, capturing stdout and stderr.
///
/// The child is killed if it outlives `timeout` or if the calling future is dropped.
pub(crate) async fn run_tool(
    tool: &'static str,
    mut command: Command,
    timeout: Duration,
) -> Result<Output, MediaToolError> {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    match tokio::time::timeout(timeout, command.output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(source)) => Err(MediaToolError::Spawn { tool, source }),
        Err(_) => Err(MediaToolError::Timeout { tool, timeout }),
    }
}

/// Last few lines of a tool's stderr, enough to explain a failure.
pub(crate) fn stderr_tail(output: &Output) -> String {
    const MAX_LINES: usize = 20;
    let stderr = String::from_utf8_lossy(&output.stderr);
    let lines: Vec<&str> = stderr.trim().lines().collect();
    let start = lines.len().saturating_sub(MAX_LINES);
    lines[start..].join("\n")
}
