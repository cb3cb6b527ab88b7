//! ansihook entry point.
//!
//! This binary is the composition root:
//!
//! 1. **Parse configuration** from flags and `ANSIHOOK_*` environment
//!    variables into an immutable [`trigger::TriggerConfig`].
//! 2. **Wire observability**: the selected log sink, plus OTLP span export
//!    when an endpoint is given.
//! 3. **Construct infrastructure**: the provider decoder, the
//!    `ansible-playbook` runner and the dispatcher.
//! 4. **Serve** the webhook route until Ctrl-C or SIGTERM.
//!
//! Any startup failure is fatal and exits with a non-zero status.

mod args;
mod logging;
#[cfg(unix)]
mod syslog;
mod telemetry;

use std::{process::ExitCode, sync::Arc};

use anyhow::Context;
use clap::Parser;
use listener::WebhookState;
use runner::{locate_tool, AnsiblePlaybook, Dispatcher};
use tokio::signal;
use tracing::{error, info, warn};

use crate::args::Args;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let logging = match logging::init(args.log, args.otlp_endpoint.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("ansihook: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let code = match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = format!("{e:#}"), "fatal error, exiting");
            ExitCode::FAILURE
        }
    };

    logging.shutdown();
    code
}

async fn run(args: Args) -> anyhow::Result<()> {
    let mut config = args.into_config().context("invalid configuration")?;
    config.tool = locate_tool(&config.tool.to_string_lossy())?;

    if config.secret.is_empty() {
        warn!(
            service = %config.service,
            "no webhook secret configured, request authenticity is not verified"
        );
    }
    if !config.playbook.playbook().exists() {
        warn!(
            playbook = %config.playbook.playbook().display(),
            "playbook not found, runs will fail until it exists"
        );
    }

    let decoder = providers::decoder_for(&config.service, config.secret.clone());
    let runner = AnsiblePlaybook::new(config.tool.clone()).with_timeout(config.run_timeout);
    let dispatcher = Dispatcher::new(Arc::new(runner), config.playbook.clone());
    let app = listener::router(&config.route_path, WebhookState::new(decoder, dispatcher));

    let address = config.listen_address();
    let tcp = listener::bind(&address).await?;
    info!(
        service = %config.service,
        tool = %config.tool.display(),
        playbook = %config.playbook.playbook().display(),
        inventory = %config.playbook.inventory().display(),
        user = %config.playbook.user(),
        log = %config.log_sink,
        "server started at {}{}",
        address,
        config.route_path
    );

    listener::serve(tcp, app, shutdown_signal()).await?;
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "unable to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "unable to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received, no longer accepting webhooks");
}
