use std::sync::Arc;

use tokio::sync::RwLock;
use weekstats_core::LinkedInStats;

/// Single slot holding the last `LinkedIn` numbers entered by hand.
///
/// Lives for the life of the process; each write replaces the previous one.
#[derive(Debug, Clone, Default)]
pub struct ManualStatsStore {
    linkedin: Arc<RwLock<Option<LinkedInStats>>>,
}

impl ManualStatsStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_linkedin(&self, stats: LinkedInStats) {
        *self.linkedin.write().await = Some(stats);
    }

    pub async fn linkedin(&self) -> Option<LinkedInStats> {
        self.linkedin.read().await.clone()
    }
}
