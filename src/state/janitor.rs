use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use crate::state::limiter::RateLimiter;

use tracing::{debug, info, instrument, trace, Instrument};

/// Periodically forgets rate-limit buckets of clients that went quiet.
#[instrument(skip(limiter))]
pub fn start_janitor(limiter: Arc<RateLimiter>, interval: Duration) -> JoinHandle<()> {
    info!(?interval, "Starting rate limit janitor");

    let span = tracing::info_span!(parent: None, "janitor_service");

    tokio::spawn(async move {
        let mut interval_timer = tokio::time::interval(interval);

        loop {
            interval_timer.tick().await;

            let dropped = limiter.sweep();
            if dropped == 0 {
                trace!("No idle clients found");
                continue;
            }

            debug!(dropped, tracked = limiter.tracked_clients(), "Dropped idle rate limit buckets");
        }
    }.instrument(span))
}
