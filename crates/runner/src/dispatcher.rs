//! Fire-and-forget dispatch of playbook runs.

use std::sync::Arc;

use tracing::{error, info, info_span, Instrument};
use trigger::{ExecutionAttempt, PlaybookRunner, PlaybookSpec, PushEvent, RunId};

/// Launches one detached playbook run per push event.
///
/// Cloning is cheap; every clone shares the same runner and spec. Runs are
/// not queued, deduplicated or serialised: two pushes arriving together
/// produce two overlapping runs.
#[derive(Clone)]
pub struct Dispatcher {
    runner: Arc<dyn PlaybookRunner>,
    spec: Arc<PlaybookSpec>,
}

impl Dispatcher {
    /// Creates a dispatcher that runs `spec` through `runner`.
    pub fn new(runner: Arc<dyn PlaybookRunner>, spec: PlaybookSpec) -> Self {
        Self {
            runner,
            spec: Arc::new(spec),
        }
    }

    /// Spawns a run for `event` and returns without waiting for it.
    ///
    /// Must be called from within a Tokio runtime. The outcome of the run is
    /// only logged: success at info level, failure at error level.
    pub fn dispatch(&self, event: &PushEvent) -> RunId {
        let attempt = ExecutionAttempt::new(PlaybookSpec::clone(&self.spec), event.delivery.clone());
        let run_id = attempt.run_id();

        let span = info_span!(
            "playbook_run",
            run_id = %run_id,
            provider = %event.provider,
            delivery = event.delivery.as_ref().map(|d| d.as_str()).unwrap_or("-"),
        );
        span.in_scope(|| {
            info!(
                playbook = %attempt.spec().playbook().display(),
                inventory = %attempt.spec().inventory().display(),
                git_ref = event.git_ref.as_deref().unwrap_or("-"),
                repository = event.repository.as_deref().unwrap_or("-"),
                head_commit = event.head_commit.as_deref().unwrap_or("-"),
                pusher = event.pusher.as_deref().unwrap_or("-"),
                started_at = %attempt.started_at(),
                "dispatching playbook run"
            );
        });

        let runner = Arc::clone(&self.runner);
        tokio::spawn(
            async move {
                match runner.run(&attempt).await {
                    Ok(outcome) => info!(
                        elapsed_ms = u64::try_from(outcome.elapsed.as_millis()).unwrap_or(u64::MAX),
                        stdout_bytes = outcome.stdout_bytes,
                        stderr_bytes = outcome.stderr_bytes,
                        "playbook run finished"
                    ),
                    Err(e) => error!(error = %e, "playbook run failed"),
                }
            }
            .instrument(span),
        );

        run_id
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("spec", &self.spec)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
