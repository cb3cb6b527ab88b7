//! Command line flags and their conversion into [`TriggerConfig`].

use std::{path::PathBuf, time::Duration};

use clap::Parser;
use runner::AnsiblePlaybook;
use trigger::{ConfigError, ExecutionUser, LogSink, PlaybookSpec, TriggerConfig, WebhookSecret};

/// Runs an ansible playbook whenever a push webhook arrives.
#[derive(Clone, Debug, Parser)]
#[command(name = "ansihook", version, about, long_about = None)]
pub struct Args {
    /// Address to listen on, `host:port` or `:port`.
    #[arg(long, env = "ANSIHOOK_ADDRESS", default_value = "0.0.0.0:8080")]
    pub address: String,

    /// Path of the webhook route.
    #[arg(long, env = "ANSIHOOK_HTTP_PATH", default_value = TriggerConfig::DEFAULT_ROUTE_PATH)]
    pub http_path: String,

    /// Webhook secret: HMAC key for GitHub, token for GitLab, hook UUID for
    /// Bitbucket. Empty disables verification.
    #[arg(long, env = "ANSIHOOK_SECRET", default_value = "", hide_env_values = true)]
    pub secret: String,

    /// Hosting service sending the webhooks: github, gitlab or bitbucket.
    #[arg(long, env = "ANSIHOOK_SERVICE", default_value = "github")]
    pub service: String,

    /// Playbook to run.
    #[arg(long = "path", env = "ANSIHOOK_PLAYBOOK", default_value = "./main.yaml")]
    pub playbook: PathBuf,

    /// Inventory passed to ansible.
    #[arg(long, env = "ANSIHOOK_INVENTORY", default_value = "./hosts")]
    pub inventory: PathBuf,

    /// Remote user passed to ansible.
    #[arg(long, env = "ANSIHOOK_USER", default_value = "root")]
    pub user: String,

    /// Name or path of the ansible-playbook executable.
    #[arg(long, env = "ANSIHOOK_ANSIBLE_PLAYBOOK", default_value = AnsiblePlaybook::DEFAULT_TOOL)]
    pub ansible_playbook: String,

    /// Kill a run that takes longer than this many seconds.
    #[arg(long, env = "ANSIHOOK_RUN_TIMEOUT_SECS")]
    pub run_timeout_secs: Option<u64>,

    /// Log destination: stdout, json or syslog.
    #[arg(long, env = "ANSIHOOK_LOG", default_value_t = LogSink::Stdout)]
    pub log: LogSink,

    /// OTLP gRPC endpoint for span export, e.g. http://localhost:4317.
    #[arg(long, env = "ANSIHOOK_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,
}

impl Args {
    /// Builds and validates the immutable configuration.
    ///
    /// `tool` is left as given; the caller resolves it to an executable.
    pub fn into_config(self) -> Result<TriggerConfig, ConfigError> {
        let user = ExecutionUser::new(self.user.trim()).ok_or(ConfigError::Empty { setting: "user" })?;

        let config = TriggerConfig {
            address: self.address,
            route_path: self.http_path,
            secret: WebhookSecret::new(self.secret),
            service: self.service,
            playbook: PlaybookSpec::new(self.playbook, self.inventory, user),
            tool: PathBuf::from(self.ansible_playbook),
            run_timeout: self.run_timeout_secs.map(Duration::from_secs),
            log_sink: self.log,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
#[path = "args_tests.rs"]
mod tests;
