//! Shared value types for the trigger domain.
//!
//! Unlike the newtype identifiers in [`crate::identifiers`], these types carry
//! behaviour: provider selection, the argument list handed to
//! `ansible-playbook`, and the record of one execution attempt.

use std::ffi::OsString;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::{DeliveryId, ExecutionUser, ParseSelectionError, RunId};

// ---------------------------------------------------------------------------
// Provider selection
// ---------------------------------------------------------------------------

/// Source-code hosting service whose webhooks are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// GitHub: HMAC-SHA256 signature in `X-Hub-Signature-256`.
    Github,
    /// GitLab: shared token in `X-Gitlab-Token`.
    Gitlab,
    /// Bitbucket: hook UUID in `X-Hook-UUID`.
    Bitbucket,
}

impl ProviderKind {
    /// Canonical lower-case name, as accepted by `--service`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Github => "github",
            Self::Gitlab => "gitlab",
            Self::Bitbucket => "bitbucket",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = ParseSelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "github" => Ok(Self::Github),
            "gitlab" => Ok(Self::Gitlab),
            "bitbucket" => Ok(Self::Bitbucket),
            _ => Err(ParseSelectionError::new("webhook provider", s)),
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Log destination
// ---------------------------------------------------------------------------

/// Where log records are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogSink {
    /// Human-readable lines on standard output.
    #[default]
    Stdout,
    /// One JSON object per line on standard output.
    Json,
    /// The local system log daemon.
    Syslog,
}

impl FromStr for LogSink {
    type Err = ParseSelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stdout" => Ok(Self::Stdout),
            "json" => Ok(Self::Json),
            "syslog" => Ok(Self::Syslog),
            _ => Err(ParseSelectionError::new("log sink", s)),
        }
    }
}

impl std::fmt::Display for LogSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Stdout => "stdout",
            Self::Json => "json",
            Self::Syslog => "syslog",
        })
    }
}

// ---------------------------------------------------------------------------
// Playbook invocation
// ---------------------------------------------------------------------------

/// Everything ansible needs to know about one run, apart from the tool path.
///
/// The connection mode is always [`PlaybookSpec::LOCAL_CONNECTION`]; the
/// playbook is executed against the inventory from the machine receiving the
/// webhook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybookSpec {
    playbook: PathBuf,
    inventory: PathBuf,
    user: ExecutionUser,
}

impl PlaybookSpec {
    /// Connection plugin passed to `--connection`.
    pub const LOCAL_CONNECTION: &'static str = "local";

    /// Creates a new spec.
    pub fn new(playbook: impl Into<PathBuf>, inventory: impl Into<PathBuf>, user: ExecutionUser) -> Self {
        Self {
            playbook: playbook.into(),
            inventory: inventory.into(),
            user,
        }
    }

    /// Path of the playbook file.
    pub fn playbook(&self) -> &PathBuf {
        &self.playbook
    }

    /// Path of the inventory file.
    pub fn inventory(&self) -> &PathBuf {
        &self.inventory
    }

    /// Remote user ansible runs as.
    pub fn user(&self) -> &ExecutionUser {
        &self.user
    }

    /// Command-line arguments for `ansible-playbook`, excluding the program
    /// name itself.
    pub fn arguments(&self) -> Vec<OsString> {
        vec![
            OsString::from("--inventory"),
            self.inventory.clone().into_os_string(),
            OsString::from("--connection"),
            OsString::from(Self::LOCAL_CONNECTION),
            OsString::from("--user"),
            OsString::from(self.user.as_str()),
            self.playbook.clone().into_os_string(),
        ]
    }
}

// ---------------------------------------------------------------------------
// Execution attempt
// ---------------------------------------------------------------------------

/// One playbook run launched in response to one push event.
///
/// Nothing about the attempt is retained after it finishes; its outcome is
/// only logged.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionAttempt {
    run_id: RunId,
    spec: PlaybookSpec,
    delivery: Option<DeliveryId>,
    started_at: Timestamp,
}

impl ExecutionAttempt {
    /// Creates an attempt with a fresh [`RunId`], stamped with the current time.
    pub fn new(spec: PlaybookSpec, delivery: Option<DeliveryId>) -> Self {
        Self {
            run_id: RunId::new_random(),
            spec,
            delivery,
            started_at: Timestamp::now(),
        }
    }

    /// Identifier of this run.
    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// What to run.
    pub fn spec(&self) -> &PlaybookSpec {
        &self.spec
    }

    /// Delivery that caused this run, if the provider supplied one.
    pub fn delivery(&self) -> Option<&DeliveryId> {
        self.delivery.as_ref()
    }

    /// When the attempt was created.
    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }
}

/// Summary of a run that exited successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// Wall-clock time from spawn to exit.
    pub elapsed: Duration,
    /// Bytes written to standard output.
    pub stdout_bytes: usize,
    /// Bytes written to standard error.
    pub stderr_bytes: usize,
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns the current UTC time as a [`Timestamp`].
    pub fn now() -> Self {
        Self(Utc::now())
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
