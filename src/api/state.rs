use std::sync::Arc;

use tokio::sync::Mutex;

use crate::api::ApiError;
use crate::cache::StatsCache;
use crate::models::{ComputedStats, Game};
use crate::storage::GameLog;

#[derive(Clone)]
pub struct AppState {
    pub log: Arc<GameLog>,
    pub cache: Arc<Mutex<StatsCache>>,
}

impl AppState {
    pub fn new(log: GameLog) -> Self {
        Self {
            log: Arc::new(log),
            cache: Arc::new(Mutex::new(StatsCache::new())),
        }
    }

    /// Read the current match log from disk.
    pub fn load_games(&self) -> Result<Vec<Game>, ApiError> {
        self.log
            .load()
            .map_err(|e| ApiError::Internal(format!("Failed to load match log: {}", e)))
    }

    /// The report for the log as it is on disk right now.
    pub async fn current_stats(&self) -> Result<Arc<ComputedStats>, ApiError> {
        let games = self.load_games()?;
        let mut cache = self.cache.lock().await;
        Ok(cache.get_or_compute(&games))
    }
}
