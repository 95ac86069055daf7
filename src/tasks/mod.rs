//! Background scheduled tasks for the application.
//!
//! Call `spawn_all` once during startup to launch them.

use crate::services::BumpScheduler;
use std::time::Duration;

/// Spawn all background tasks.
///
/// The bump pass is idempotent for a given instant, so a tick that fails is
/// simply retried on the next one.
pub fn spawn_all(bump_scheduler: BumpScheduler, bump_interval: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(bump_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match bump_scheduler.run_pass().await {
                Ok(report) if report.changed() => log::info!(
                    "Bump pass: scanned {}, bumped {}, expired {}",
                    report.scanned,
                    report.bumped,
                    report.expired
                ),
                Ok(report) => log::debug!("Bump pass: scanned {}, nothing due", report.scanned),
                Err(e) => log::error!("Failed to run bump pass: {e:?}"),
            }
        }
    });
}
