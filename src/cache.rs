//! On-disk cache for upstream response bodies.
//!
//! Entries carry their own expiry, so a process restart keeps serving
//! responses stored by the previous run until they go stale.

use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use fjall::Keyspace;
use serde::{Deserialize, Serialize};
use tokio::task;
use tracing::debug;

const KEYSPACE: &str = "http_responses";

#[derive(Serialize, Deserialize)]
struct CachedBody {
    body: String,
    /// Unix seconds
    expires_at: u64,
}

impl CachedBody {
    fn is_fresh(&self, now: u64) -> bool {
        now < self.expires_at
    }
}

fn unix_now() -> Result<u64> {
    Ok(SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs())
}

/// Response bodies keyed by request URL, shared by every page view
pub struct PersistentCache {
    store: Keyspace,
}

impl PersistentCache {
    /// Opens (or creates) the cache database in `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = fjall::Database::builder(path.as_ref())
            .open()
            .with_context(|| format!("Failed to open cache at {}", path.as_ref().display()))?;
        let store = db.keyspace(KEYSPACE, fjall::KeyspaceCreateOptions::default)?;
        Ok(Self { store })
    }

    /// Stores `body` under `key` for `ttl`.
    #[tracing::instrument(name = "cache_store", level = "debug", skip(self, body), fields(len = body.len()))]
    pub async fn store(&self, key: &str, body: String, ttl: Duration) -> Result<()> {
        let expires_at = unix_now()?.saturating_add(ttl.as_secs());
        let bytes = postcard::to_stdvec(&CachedBody { body, expires_at })?;

        let store = self.store.clone();
        let key = key.as_bytes().to_vec();
        task::spawn_blocking(move || store.insert(key, bytes)).await??;
        Ok(())
    }

    /// Returns the stored body while it is fresh. Stale entries are evicted
    /// on the way out.
    #[tracing::instrument(name = "cache_lookup", level = "debug", skip(self))]
    pub async fn lookup(&self, key: &str) -> Result<Option<String>> {
        let store = self.store.clone();
        let key_bytes = key.as_bytes().to_vec();
        let raw = task::spawn_blocking(move || {
            store.get(key_bytes).map(|found| found.map(|v| v.to_vec()))
        })
        .await??;

        let Some(raw) = raw else {
            debug!("miss");
            return Ok(None);
        };

        let entry: CachedBody = postcard::from_bytes(&raw)?;
        if entry.is_fresh(unix_now()?) {
            debug!("hit");
            return Ok(Some(entry.body));
        }

        debug!("stale");
        self.evict(key).await?;
        Ok(None)
    }

    pub async fn evict(&self, key: &str) -> Result<()> {
        let store = self.store.clone();
        let key = key.as_bytes().to_vec();
        task::spawn_blocking(move || store.remove(key)).await??;
        Ok(())
    }
}
