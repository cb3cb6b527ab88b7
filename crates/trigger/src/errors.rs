//! Error types for the trigger domain.
//!
//! [`ConfigError`] covers startup conditions that stop the process.
//! [`RunError`] covers a single playbook run going wrong; it is only ever
//! logged by the detached task that owns the run and never reaches the
//! webhook sender. Request validation failures are not errors at all; they
//! are the [`crate::InvalidReason`] arm of [`crate::WebhookEvent`].

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Parsing of named selections
// ---------------------------------------------------------------------------

/// A configuration value did not name a known option.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseSelectionError {
    kind: &'static str,
    value: String,
}

impl ParseSelectionError {
    /// Creates an error for `value`, which was supposed to name a `kind`.
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    /// The rejected value.
    pub fn value(&self) -> &str {
        &self.value
    }
}

// ---------------------------------------------------------------------------
// Startup errors
// ---------------------------------------------------------------------------

/// Configuration problems detected before the server starts.
///
/// All variants are fatal: the process reports them and exits.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The webhook route must be a literal absolute path such as `/webhooks`.
    #[error("invalid route path '{path}': {reason}")]
    InvalidRoutePath {
        /// The rejected path.
        path: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// A required setting was empty.
    #[error("{setting} must not be empty")]
    Empty {
        /// Name of the setting.
        setting: &'static str,
    },

    /// The automation tool could not be resolved to an executable.
    #[error("unable to find {tool}: {reason}")]
    ToolNotFound {
        /// Name or path that was looked up.
        tool: String,
        /// Why the lookup failed.
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// Run errors
// ---------------------------------------------------------------------------

/// Failure of a single playbook run.
///
/// Never retried.
#[derive(Debug, Error)]
pub enum RunError {
    /// The tool binary no longer exists at the resolved path.
    #[error("automation tool not found at {}", tool.display())]
    NotFound {
        /// Path that was executed.
        tool: PathBuf,
    },

    /// The process could not be started.
    #[error("failed to start {}: {source}", tool.display())]
    Spawn {
        /// Path that was executed.
        tool: PathBuf,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// The tool exited with a non-zero status.
    #[error("playbook exited with status {code}: {output}")]
    NonZeroExit {
        /// Exit status.
        code: i32,
        /// Tail of the captured standard error, or of standard output when
        /// nothing was written to standard error.
        output: String,
    },

    /// The tool was terminated by a signal.
    #[error("playbook terminated by signal: {output}")]
    Signalled {
        /// Tail of the captured output.
        output: String,
    },

    /// The run exceeded the configured time limit and was killed.
    #[error("playbook did not finish within {after:?}")]
    TimedOut {
        /// The configured limit.
        after: Duration,
    },

    /// Waiting on the child or reading its output failed.
    #[error("I/O error while running playbook: {0}")]
    Io(#[from] std::io::Error),
}
