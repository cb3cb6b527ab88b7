//! `ansible-playbook` process adapter.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;
use trigger::{ExecutionAttempt, PlaybookRunner, PlaybookSpec, RunError, RunOutcome};

/// Maximum number of output bytes kept in a [`RunError`].
const OUTPUT_TAIL_BYTES: usize = 2048;

/// Runs playbooks by spawning the `ansible-playbook` executable.
///
/// The invocation is
/// `<tool> --inventory <inventory> --connection local --user <user> <playbook>`.
/// Standard output and error are captured; they are only used for logging.
#[derive(Debug, Clone)]
pub struct AnsiblePlaybook {
    tool: PathBuf,
    timeout: Option<Duration>,
}

impl AnsiblePlaybook {
    /// Name looked up on `PATH` when no explicit tool path is configured.
    pub const DEFAULT_TOOL: &'static str = "ansible-playbook";

    /// Creates a runner for the executable at `tool`, without a time limit.
    pub fn new(tool: impl Into<PathBuf>) -> Self {
        Self {
            tool: tool.into(),
            timeout: None,
        }
    }

    /// Kills runs that take longer than `timeout`. `None` lets them run forever.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn command(&self, spec: &PlaybookSpec) -> Command {
        let mut command = Command::new(&self.tool);
        command
            .args(spec.arguments())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }
}

#[async_trait]
impl PlaybookRunner for AnsiblePlaybook {
    async fn run(&self, attempt: &ExecutionAttempt) -> Result<RunOutcome, RunError> {
        let started = Instant::now();
        let child = self
            .command(attempt.spec())
            .spawn()
            .map_err(|source| match source.kind() {
                ErrorKind::NotFound => RunError::NotFound {
                    tool: self.tool.clone(),
                },
                _ => RunError::Spawn {
                    tool: self.tool.clone(),
                    source,
                },
            })?;
        debug!(pid = ?child.id(), tool = %self.tool.display(), "running playbook");

        // Dropping the future on timeout drops the child, which kills it.
        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| RunError::TimedOut { after: limit })??,
            None => child.wait_with_output().await?,
        };
        let elapsed = started.elapsed();

        if !output.stdout.is_empty() {
            debug!(output = %String::from_utf8_lossy(&output.stdout), "playbook stdout");
        }
        if !output.stderr.is_empty() {
            debug!(output = %String::from_utf8_lossy(&output.stderr), "playbook stderr");
        }

        if output.status.success() {
            return Ok(RunOutcome {
                elapsed,
                stdout_bytes: output.stdout.len(),
                stderr_bytes: output.stderr.len(),
            });
        }

        // ansible reports task failures on stdout.
        let source = if output.stderr.is_empty() {
            &output.stdout
        } else {
            &output.stderr
        };
        let tail = output_tail(source, OUTPUT_TAIL_BYTES);
        Err(match output.status.code() {
            Some(code) => RunError::NonZeroExit { code, output: tail },
            None => RunError::Signalled { output: tail },
        })
    }
}

/// Last `limit` bytes of `bytes`, lossily decoded and trimmed.
fn output_tail(bytes: &[u8], limit: usize) -> String {
    let start = bytes.len().saturating_sub(limit);
    String::from_utf8_lossy(&bytes[start..]).trim().to_string()
}

#[cfg(test)]
#[path = "ansible_tests.rs"]
mod tests;
