use crate::dispatch_due_reminders::DispatchDueRemindersUseCase;
use crate::error::DispatchError;
use crate::shared::usecase::execute;
use remindd_infra::Context;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Handle to the running dispatch timer. Dropping it does NOT stop the job;
/// call `stop` to shut down gracefully.
pub struct DispatchJob {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl DispatchJob {
    /// Signals shutdown and waits for the loop to exit. A cycle that is in
    /// flight finishes claiming and recording first, so no reminder is left
    /// claimed longer than necessary.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.handle.await;
    }
}

/// Starts the repeating dispatch timer. Every `dispatch_interval_millis` the
/// job runs one dispatch cycle; a failed cycle is simply retried on the next
/// tick, bounded by the tick period, so no extra backoff is needed.
pub fn start_dispatch_job(ctx: Context) -> DispatchJob {
    let (shutdown, mut shutdown_signal) = watch::channel(false);

    let handle = tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(Duration::from_millis(ctx.config.dispatch_interval_millis));
        info!(
            "Dispatch job started with a {} ms interval",
            ctx.config.dispatch_interval_millis
        );

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    match execute(DispatchDueRemindersUseCase, &ctx).await {
                        Ok(report) if report.claimed > 0 => {
                            info!(
                                "Dispatched {} reminder(s): {} sent, {} without subscription, {} publish failure(s), {} faulted",
                                report.claimed,
                                report.sent.len(),
                                report.without_subscription.len(),
                                report.publish_failures.len(),
                                report.faulted.len(),
                            );
                        }
                        Ok(_) => {}
                        Err(DispatchError::InvariantViolation { .. }) => {
                            // A reminder reached two terminal statuses, so claim
                            // exclusivity is broken. Going down beats dispatching
                            // duplicates.
                            error!("Claim exclusivity is broken, aborting");
                            std::process::abort();
                        }
                        Err(_) => {
                            // Already logged; retried on the next tick
                        }
                    }
                }
                _ = shutdown_signal.changed() => {
                    info!("Dispatch job shutting down");
                    break;
                }
            }
        }
    });

    DispatchJob { shutdown, handle }
}
