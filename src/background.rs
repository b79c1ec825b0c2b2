use std::sync::Arc;
use std::time::Duration;
use chrono::Utc;
use tokio::time::sleep;
use tracing::{debug, info, info_span, Instrument};
use crate::state::AppState;

/// Periodically drops idle dialogue sessions. Runs forever; with no TTL configured
/// every pass purges nothing.
pub async fn start_session_sweeper(state: Arc<AppState>) {
    let interval = Duration::from_secs(state.config.session_sweep_interval_secs.max(1));
    info!(
        interval_secs = interval.as_secs(),
        ttl_minutes = ?state.config.session_ttl_minutes,
        "Starting session sweeper..."
    );

    loop {
        sleep(interval).await;

        async {
            let purged = state.session_store.purge_expired(Utc::now()).await;
            if purged > 0 {
                info!(purged, "Purged idle dialogue sessions");
            } else {
                debug!("No idle dialogue sessions to purge");
            }
        }
            .instrument(info_span!("session_sweep"))
            .await;
    }
}
