//! Loaded feed snapshots and the store that caches them.
//!
//! A [`Snapshot`] is immutable. [`SnapshotStore`] keeps at most one of them
//! plus the summaries computed from it, and forgets both on
//! [`SnapshotStore::invalidate`].

use std::collections::hash_map::DefaultHasher;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Serialize, Serializer};
use tokio::sync::RwLock;
use tracing::debug;

use crate::aggregation::{self, SummaryTable};
use crate::feed::{parse_feed, FeedLoader, FeedSource, LoadReport};
use crate::{FeedConfig, FeedError, RawObservation, UtcDateTime};

/// Content fingerprint of a feed, stable for identical bytes and parse
/// settings.
///
/// Built on `DefaultHasher`, whose output may change between Rust releases,
/// so ids are only comparable within one build of voltick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SnapshotId(u64);

impl SnapshotId {
    pub fn fingerprint(bytes: &[u8], config: &FeedConfig) -> Self {
        let mut hasher = DefaultHasher::new();
        bytes.hash(&mut hasher);
        config.delimiter.hash(&mut hasher);
        config.thousands_separators.hash(&mut hasher);
        Self(hasher.finish())
    }
}

impl Display for SnapshotId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl Serialize for SnapshotId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// One load of the feed.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    id: SnapshotId,
    source: FeedSource,
    loaded_at: UtcDateTime,
    observations: Vec<RawObservation>,
    report: LoadReport,
}

impl Snapshot {
    pub fn from_bytes(
        source: FeedSource,
        bytes: &[u8],
        config: &FeedConfig,
    ) -> Result<Self, FeedError> {
        let parsed = parse_feed(bytes, config)?;
        Ok(Self {
            id: SnapshotId::fingerprint(bytes, config),
            source,
            loaded_at: UtcDateTime::now(),
            observations: parsed.observations,
            report: parsed.report,
        })
    }

    pub fn id(&self) -> SnapshotId {
        self.id
    }

    pub fn source(&self) -> &FeedSource {
        &self.source
    }

    pub fn loaded_at(&self) -> UtcDateTime {
        self.loaded_at
    }

    /// Normalized rows in feed order.
    pub fn observations(&self) -> &[RawObservation] {
        &self.observations
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

/// How [`SnapshotStore::load`] treats the cached snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheMode {
    /// Reuse an unexpired snapshot; otherwise load and cache. (Default)
    #[default]
    Use,
    /// Always load and replace the cached snapshot.
    Refresh,
    /// Always load; neither read nor write the cache.
    Bypass,
}

/// Snapshot handed out by [`SnapshotStore::load`].
#[derive(Debug, Clone)]
pub struct Loaded {
    pub snapshot: Arc<Snapshot>,
    pub cache_hit: bool,
}

#[derive(Debug)]
struct CachedSnapshot {
    snapshot: Arc<Snapshot>,
    expires_at: Option<Instant>,
}

impl CachedSnapshot {
    fn is_fresh(&self) -> bool {
        self.expires_at.map_or(true, |deadline| Instant::now() <= deadline)
    }
}

#[derive(Debug)]
struct StoreInner {
    snapshot: Option<CachedSnapshot>,
    summaries: Option<(SnapshotId, Arc<SummaryTable>)>,
    ttl: Option<Duration>,
}

impl StoreInner {
    fn fresh_snapshot(&self) -> Option<Arc<Snapshot>> {
        self.snapshot
            .as_ref()
            .filter(|cached| cached.is_fresh())
            .map(|cached| Arc::clone(&cached.snapshot))
    }

    fn put(&mut self, snapshot: Arc<Snapshot>) {
        let expires_at = self.ttl.map(|ttl| Instant::now() + ttl);
        self.snapshot = Some(CachedSnapshot {
            snapshot,
            expires_at,
        });
    }

    fn clear(&mut self) {
        self.snapshot = None;
        self.summaries = None;
    }
}

/// Explicit, shareable cache of the current snapshot and its summaries.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    inner: Arc<RwLock<StoreInner>>,
}

impl SnapshotStore {
    /// Store whose snapshots expire after `ttl`; `None` keeps them until
    /// invalidated.
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(StoreInner {
                snapshot: None,
                summaries: None,
                ttl,
            })),
        }
    }

    /// Cached snapshot, if one is present and unexpired.
    pub async fn current(&self) -> Option<Arc<Snapshot>> {
        self.inner.read().await.fresh_snapshot()
    }

    /// Returns a snapshot according to `mode`, loading through `loader` when
    /// the cache cannot serve it.
    pub async fn load(&self, loader: &FeedLoader, mode: CacheMode) -> Result<Loaded, FeedError> {
        if mode == CacheMode::Use {
            if let Some(snapshot) = self.current().await {
                debug!(snapshot = %snapshot.id(), "snapshot cache hit");
                return Ok(Loaded {
                    snapshot,
                    cache_hit: true,
                });
            }
        }

        let snapshot = Arc::new(loader.load().await?);
        if mode != CacheMode::Bypass {
            self.inner.write().await.put(Arc::clone(&snapshot));
        }

        Ok(Loaded {
            snapshot,
            cache_hit: false,
        })
    }

    /// Caches an already built snapshot, replacing any previous one.
    pub async fn put(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        let snapshot = Arc::new(snapshot);
        self.inner.write().await.put(Arc::clone(&snapshot));
        snapshot
    }

    /// Summaries for `snapshot`, recomputed only when its id differs from
    /// the last one summarized.
    pub async fn summaries(&self, snapshot: &Snapshot) -> Arc<SummaryTable> {
        if let Some((id, table)) = &self.inner.read().await.summaries {
            if *id == snapshot.id() {
                return Arc::clone(table);
            }
        }

        let table = Arc::new(aggregation::summarize(snapshot.observations()));
        self.inner.write().await.summaries = Some((snapshot.id(), Arc::clone(&table)));
        table
    }

    /// Drops the cached snapshot and summaries; the next `Use` load reads
    /// the feed again.
    pub async fn invalidate(&self) {
        self.inner.write().await.clear();
    }

    pub async fn is_cached(&self) -> bool {
        self.current().await.is_some()
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(text: &str) -> Snapshot {
        let config = FeedConfig::default();
        Snapshot::from_bytes(
            FeedSource::File("stocks.csv".into()),
            text.as_bytes(),
            &config,
        )
        .expect("snapshot builds")
    }

    #[test]
    fn fingerprint_tracks_content() {
        let a = snapshot("Symbol,Volume\nAAA,1\n");
        let b = snapshot("Symbol,Volume\nAAA,1\n");
        let c = snapshot("Symbol,Volume\nAAA,2\n");

        assert_eq!(a.id(), b.id());
        assert_ne!(a.id(), c.id());
        assert_eq!(a.id().to_string().len(), 16);
    }

    #[tokio::test]
    async fn put_and_invalidate() {
        let store = SnapshotStore::default();
        assert!(!store.is_cached().await);

        store.put(snapshot("Symbol\nAAA\n")).await;
        assert!(store.is_cached().await);

        store.invalidate().await;
        assert!(store.current().await.is_none());
    }

    #[tokio::test]
    async fn snapshots_expire_after_ttl() {
        let store = SnapshotStore::new(Some(Duration::from_millis(50)));
        store.put(snapshot("Symbol\nAAA\n")).await;
        assert!(store.is_cached().await);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!store.is_cached().await);
    }

    #[tokio::test]
    async fn summaries_are_memoized_per_snapshot() {
        let store = SnapshotStore::default();
        let first = snapshot("Symbol,Date,Volume\nAAA,2024-01-01,10\n");

        let a = store.summaries(&first).await;
        let b = store.summaries(&first).await;
        assert!(Arc::ptr_eq(&a, &b));

        let second = snapshot("Symbol,Date,Volume\nAAA,2024-01-02,20\n");
        let c = store.summaries(&second).await;
        assert!(!Arc::ptr_eq(&a, &c));
    }
}
