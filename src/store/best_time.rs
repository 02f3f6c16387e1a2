//! Persisted best survival time

use chrono::{DateTime, Utc};

use super::local::{LocalStorage, StoreError};

/// Key holding the best time in milliseconds, as a decimal string
pub const BEST_TIME_KEY: &str = "bestTime";
/// Key holding when the best time was set, RFC 3339
pub const BEST_TIME_AT_KEY: &str = "bestTimeAt";

/// Best time store operations
#[derive(Clone)]
pub struct BestTimeStore {
    storage: LocalStorage,
}

impl BestTimeStore {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    /// Stored best time; anything missing or unreadable counts as zero
    pub fn load(&self) -> u64 {
        self.storage
            .get_item(BEST_TIME_KEY)
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|ms| ms.is_finite() && *ms > 0.0)
            .map(|ms| ms as u64)
            .unwrap_or(0)
    }

    pub fn achieved_at(&self) -> Option<DateTime<Utc>> {
        self.storage
            .get_item(BEST_TIME_AT_KEY)
            .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
            .map(|at| at.with_timezone(&Utc))
    }

    /// Persist a new best time
    pub async fn save(&self, best_ms: u64) -> Result<(), StoreError> {
        self.storage
            .set_item(BEST_TIME_KEY, &best_ms.to_string())
            .await?;
        self.storage
            .set_item(BEST_TIME_AT_KEY, &Utc::now().to_rfc3339())
            .await
    }

    /// Forget the best time, as a browser page does on unload
    pub async fn clear(&self) -> Result<(), StoreError> {
        self.storage.remove_item(BEST_TIME_KEY).await?;
        self.storage.remove_item(BEST_TIME_AT_KEY).await
    }
}
