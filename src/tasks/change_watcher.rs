use crate::db::{Database, TallyChange};
use log::{debug, error, info};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};

/// Poll the tally revision and announce every move to subscribers, so
/// votes written by other clients show up without a manual refresh.
pub async fn watch_tally_changes(database: Arc<Database>, every: Duration) {
    info!("Starting background task to watch the tally every {:?}", every);
    let mut interval = interval(every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut last_seen = match database.revision().await {
        Ok(revision) => Some(revision),
        Err(e) => {
            error!("Failed to read tally revision: {}", e);
            None
        }
    };

    loop {
        interval.tick().await;

        match database.revision().await {
            Ok(revision) if Some(revision) != last_seen => {
                debug!("Tally revision moved to {}", revision);
                last_seen = Some(revision);
                database.notify(TallyChange::Revision(revision));
            }
            Ok(_) => {}
            Err(e) => error!("Failed to read tally revision: {}", e),
        }
    }
}
