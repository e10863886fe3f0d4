use std::time::Duration;

use tracing::info;

use crate::services::SessionStore;

pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Periodically forgets sessions nobody has touched for `idle_timeout`.
pub struct SessionSweeper {
    sessions: SessionStore,
    idle_timeout: Duration,
    interval: Duration,
}

impl SessionSweeper {
    pub fn new(sessions: SessionStore, idle_timeout: Duration, interval: Duration) -> Self {
        Self {
            sessions,
            idle_timeout,
            interval,
        }
    }

    pub async fn start(self) {
        info!(
            "starting session sweeper (idle timeout: {:?}, interval: {:?})",
            self.idle_timeout, self.interval
        );

        loop {
            tokio::time::sleep(self.interval).await;
            self.sweep().await;
        }
    }

    pub async fn sweep(&self) -> usize {
        let removed = self.sessions.purge_idle(self.idle_timeout).await;
        if removed > 0 {
            info!(
                "expired {} idle sessions, {} remain",
                removed,
                self.sessions.len().await
            );
        }
        removed
    }
}
