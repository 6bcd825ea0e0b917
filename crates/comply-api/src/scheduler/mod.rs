//! Background source-check scheduler
//!
//! Periodically runs the regulatory source monitoring pipeline. Each run
//! only touches sources whose check frequency has elapsed, so the interval
//! can be shorter than the per-source schedules without extra work.

use std::time::Duration;

use comply_service::services::SourceCheckService;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::state::AppState;

/// Spawn the periodic source-check task if the scheduler is enabled
///
/// Returns the task handle when a task was spawned. The first run happens
/// after one full interval, not at startup, so deployments don't hammer the
/// monitored pages on every restart.
pub fn spawn(state: AppState) -> Option<JoinHandle<()>> {
    let config = state.config().scheduler.clone();
    if !config.enabled {
        info!("Source check scheduler disabled");
        return None;
    }

    let interval = Duration::from_secs(config.interval_hours.saturating_mul(3600));
    info!(
        interval_hours = config.interval_hours,
        "Source check scheduler started"
    );

    Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick of a tokio interval completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let service = SourceCheckService::new(state.service_context());
            match service.run_due_checks().await {
                Ok(summary) => {
                    info!(
                        checked = summary.checked,
                        changed = summary.changed,
                        failed = summary.failed,
                        suggestions = summary.suggestions_created,
                        "Scheduled source check run complete"
                    );
                }
                Err(e) => {
                    error!(error = %e, "Scheduled source check run failed");
                }
            }
        }
    }))
}
