//! Periodic removal of expired links.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::application::services::LinkService;
use crate::domain::repositories::LinkRepository;
use crate::infrastructure::cache::CacheService;

/// Runs [`LinkService::sweep_expired`] every `period` until `shutdown` flips
/// to `true` or its sender is dropped.
///
/// The first sweep runs immediately. Failures are logged and the loop keeps
/// going; a slow sweep delays the next tick instead of bursting.
pub async fn run_sweeper<L, C>(
    service: Arc<LinkService<L, C>>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) where
    L: LinkRepository + ?Sized,
    C: CacheService + ?Sized,
{
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(period_secs = period.as_secs(), "Expired link sweeper started");

    loop {
        tokio::select! {
            biased;

            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
            _ = ticker.tick() => {
                match service.sweep_expired().await {
                    Ok(0) => debug!("Sweep found no expired links"),
                    Ok(removed) => info!(removed, "Expired links swept"),
                    Err(e) => error!(error = %e, "Expired link sweep failed"),
                }
            }
        }
    }

    info!("Expired link sweeper stopped");
}
