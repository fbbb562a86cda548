// In-memory cache slots.
// Handles TTL checking, stale fallback, and invalidation for one value per slot.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::Result;

use super::clock::Clock;

/// Default validity window for documentation and statistics: 5 minutes.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Wrapper for cached data with metadata.
#[derive(Debug, Clone)]
pub struct CachedData<T> {
    /// The cached data.
    pub data: T,
    /// When the data was cached.
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    /// Create a new cached data entry.
    pub fn new(data: T, cached_at: DateTime<Utc>) -> Self {
        Self { data, cached_at }
    }

    /// Check if this cached data has expired at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        let elapsed = now
            .signed_duration_since(self.cached_at)
            .to_std()
            .unwrap_or(Duration::MAX);

        elapsed >= ttl
    }

    /// Check if this cached data is still valid (not expired).
    pub fn is_valid(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        !self.is_expired(now, ttl)
    }
}

/// Freshness of a slot at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Empty,
    Fresh,
    Stale,
}

/// A single cached value with a validity window.
///
/// Expired entries are kept so they can be served when a refresh fails.
pub struct CacheSlot<T> {
    name: &'static str,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entry: RwLock<Option<CachedData<T>>>,
}

impl<T: Clone> CacheSlot<T> {
    pub fn new(name: &'static str, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            name,
            ttl,
            clock,
            entry: RwLock::new(None),
        }
    }

    /// The stored entry, fresh or not.
    pub async fn get(&self) -> Option<CachedData<T>> {
        self.entry.read().await.clone()
    }

    /// The stored value if it is still within the validity window.
    pub async fn fresh(&self) -> Option<T> {
        let now = self.clock.now();
        self.entry
            .read()
            .await
            .as_ref()
            .filter(|cached| cached.is_valid(now, self.ttl))
            .map(|cached| cached.data.clone())
    }

    /// Replace the stored value, stamped with the current time.
    pub async fn set(&self, data: T) {
        let cached = CachedData::new(data, self.clock.now());
        *self.entry.write().await = Some(cached);
    }

    /// Drop the stored value.
    pub async fn invalidate(&self) {
        *self.entry.write().await = None;
    }

    pub async fn state(&self) -> SlotState {
        let now = self.clock.now();
        match self.entry.read().await.as_ref() {
            None => SlotState::Empty,
            Some(cached) if cached.is_valid(now, self.ttl) => SlotState::Fresh,
            Some(_) => SlotState::Stale,
        }
    }

    /// Serve a fresh value, or refresh it.
    ///
    /// `refresh` only runs when the slot is empty or expired. If it fails, the
    /// previous value is served however old it is, and `placeholder` is used
    /// when there has never been one.
    pub async fn get_or_refresh<F, Fut>(&self, refresh: F, placeholder: impl FnOnce() -> T) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Some(data) = self.fresh().await {
            debug!(slot = self.name, "serving cached value");
            return data;
        }

        match refresh().await {
            Ok(data) => {
                self.set(data.clone()).await;
                info!(slot = self.name, "refreshed and cached");
                data
            }
            Err(err) => match self.get().await {
                Some(stale) => {
                    warn!(
                        slot = self.name,
                        error = %err,
                        cached_at = %stale.cached_at,
                        "refresh failed, serving stale value"
                    );
                    stale.data
                }
                None => {
                    warn!(
                        slot = self.name,
                        error = %err,
                        "refresh failed with nothing cached, serving placeholder"
                    );
                    placeholder()
                }
            },
        }
    }
}
