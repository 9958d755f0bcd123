//! External AI tool spawning with a deadline.

use std::env;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::error::ProviderError;

use super::Provider;

/// Default timeout for tool execution (5 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Environment variable to override the default timeout.
pub const TIMEOUT_ENV_VAR: &str = "GCM_TOOL_TIMEOUT";

/// Get the configured timeout duration.
///
/// Reads from GCM_TOOL_TIMEOUT if set, otherwise uses 300 seconds.
/// Logs a warning if the variable is set to something that is not a
/// positive number of seconds.
pub fn get_timeout() -> Duration {
    match env::var(TIMEOUT_ENV_VAR) {
        Ok(v) if !v.is_empty() => match v.parse::<u64>() {
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => {
                warn!(
                    "Invalid {} value '{}', using default {}s",
                    TIMEOUT_ENV_VAR, v, DEFAULT_TIMEOUT_SECS
                );
                Duration::from_secs(DEFAULT_TIMEOUT_SECS)
            }
        },
        _ => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
    }
}

/// Arguments and optional standard input for one tool run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub args: Vec<String>,
    pub stdin: Option<String>,
}

/// Run `program` and return its captured standard output.
///
/// The child is killed if the deadline passes. A non-zero exit surfaces
/// the captured standard error.
pub async fn run_tool(
    provider: Provider,
    program: &Path,
    invocation: &Invocation,
    deadline: Duration,
) -> Result<String, ProviderError> {
    let executable = program.display().to_string();

    let mut cmd = Command::new(program);
    cmd.args(&invocation.args)
        .stdin(if invocation.stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    debug!(
        "Running {} with {} args (stdin={})",
        executable,
        invocation.args.len(),
        invocation.stdin.is_some()
    );

    let run = async {
        let mut child = cmd.spawn()?;

        let stdin_pipe = child.stdin.take();
        let input = invocation.stdin.as_deref().unwrap_or_default();
        let write = async move {
            if let Some(mut pipe) = stdin_pipe {
                // Dropping the pipe afterwards closes the child's stdin.
                if let Err(e) = pipe.write_all(input.as_bytes()).await {
                    debug!("Failed to write prompt to stdin: {}", e);
                }
            }
        };

        let ((), output) = tokio::join!(write, child.wait_with_output());
        output
    };

    let output = timeout(deadline, run)
        .await
        .map_err(|_| ProviderError::Timeout { provider, deadline })?
        .map_err(|source| ProviderError::SpawnFailed {
            executable: executable.clone(),
            source,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let code = output.status.code().unwrap_or(-1);
        return Err(ProviderError::NonZeroExit {
            executable,
            code,
            stderr,
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}
