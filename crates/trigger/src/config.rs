//! Process configuration.
//!
//! [`TriggerConfig`] is assembled once by the binary from flags and
//! environment variables, validated, and then shared read-only (behind an
//! `Arc`) with the receiver and the dispatcher. Nothing mutates it afterwards.

use std::path::PathBuf;
use std::time::Duration;

use crate::{ConfigError, LogSink, PlaybookSpec};

/// Shared secret used to authenticate webhook deliveries.
///
/// For GitHub this is the HMAC key, for GitLab the token, for Bitbucket the
/// hook UUID. An empty secret turns authentication off.
///
/// The value is redacted from `Debug` output so configuration can be logged.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct WebhookSecret(String);

impl WebhookSecret {
    /// Wraps a secret value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the secret bytes.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Returns `true` if no secret is configured.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for WebhookSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            f.write_str("WebhookSecret(<empty>)")
        } else {
            f.write_str("WebhookSecret(<redacted>)")
        }
    }
}

/// Immutable process configuration.
#[derive(Debug, Clone)]
pub struct TriggerConfig {
    /// Address to listen on, e.g. `0.0.0.0:8080` or `:8080`.
    pub address: String,
    /// Path of the single webhook route.
    pub route_path: String,
    /// Shared secret for the configured provider.
    pub secret: WebhookSecret,
    /// Configured provider name. Kept as text: an unsupported name is
    /// reported per request rather than at startup.
    pub service: String,
    /// Playbook, inventory and user for every run.
    pub playbook: PlaybookSpec,
    /// Resolved path of the `ansible-playbook` executable.
    pub tool: PathBuf,
    /// Optional upper bound on a single run.
    pub run_timeout: Option<Duration>,
    /// Log destination.
    pub log_sink: LogSink,
}

impl TriggerConfig {
    /// Default route path.
    pub const DEFAULT_ROUTE_PATH: &'static str = "/webhooks";

    /// Checks the invariants the server relies on.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the route path is not a literal absolute
    /// path or a required setting is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.address.trim().is_empty() {
            return Err(ConfigError::Empty { setting: "address" });
        }
        check_route_path(&self.route_path)?;
        if self.playbook.playbook().as_os_str().is_empty() {
            return Err(ConfigError::Empty {
                setting: "playbook path",
            });
        }
        if self.playbook.inventory().as_os_str().is_empty() {
            return Err(ConfigError::Empty {
                setting: "inventory path",
            });
        }
        Ok(())
    }

    /// Address in a form the socket layer accepts.
    ///
    /// A bare `:port` (as accepted by many HTTP servers) listens on all
    /// interfaces.
    pub fn listen_address(&self) -> String {
        let address = self.address.trim();
        if address.starts_with(':') {
            format!("0.0.0.0{address}")
        } else {
            address.to_string()
        }
    }
}

/// Accepts only literal absolute paths. The router treats `{..}` as a
/// capture and rejects segments starting with `:` or `*` outright.
fn check_route_path(path: &str) -> Result<(), ConfigError> {
    let reason = if !path.starts_with('/') {
        Some("must start with '/'")
    } else if path.contains(['{', '}']) {
        Some("must not contain '{' or '}'")
    } else if path
        .split('/')
        .any(|segment| segment.starts_with(':') || segment.starts_with('*'))
    {
        Some("segments must not start with ':' or '*'")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ConfigError::InvalidRoutePath {
            path: path.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
