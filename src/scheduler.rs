use std::time::Duration;

use actix_web::rt::time::{Instant, interval_at};
use chrono::Utc;
use tracing::{debug, error};

use crate::tracker::PresenceTracker;

/// Runs one reset check now. Errors are logged; the next tick retries.
pub async fn run_reset_check(tracker: &PresenceTracker) -> bool {
    match tracker.reset_if_new_day(Utc::now()).await {
        Ok(reset) => {
            debug!(reset, "Daily reset check done");
            reset
        }
        Err(e) => {
            error!(error = %e, "Daily reset check failed");
            false
        }
    }
}

/// Spawns the periodic reset driver on the actix runtime. The first tick
/// fires one `period` from now; startup runs its own check before this.
pub fn spawn_reset_driver(tracker: PresenceTracker, period: Duration) {
    actix_web::rt::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        loop {
            ticker.tick().await;
            run_reset_check(&tracker).await;
        }
    });
}
