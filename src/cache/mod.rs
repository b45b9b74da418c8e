//! Detail cache
//!
//! Namespaced key-value store for resolved item details: a moka in-memory
//! layer in front of one JSON file per namespace. Entries have no TTL;
//! they live until overwritten with a fresher value for the same key.
//! `get_or_resolve` coalesces concurrent misses for the same key into a
//! single resolution (single-flight), so the second of two racing detail
//! requests waits for the first instead of invoking the plugin again.

use crate::error::Error;
use moka::future::Cache;
use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Default bound on in-memory entries
pub const DEFAULT_MEMORY_CAPACITY: u64 = 10_000;

/// Persistent, namespaced detail cache
pub struct DetailCache {
    dir: PathBuf,
    memory: Cache<String, String>,
    // Namespace files are updated read-modify-write; the lock keeps
    // concurrent writers from losing each other's keys.
    disk: Mutex<()>,
}

impl DetailCache {
    /// Open a cache rooted at `dir`; namespace files are created lazily
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_capacity(dir, DEFAULT_MEMORY_CAPACITY)
    }

    pub fn with_capacity(dir: impl Into<PathBuf>, capacity: u64) -> Self {
        Self {
            dir: dir.into(),
            memory: Cache::builder().max_capacity(capacity).build(),
            disk: Mutex::new(()),
        }
    }

    /// Check whether an entry exists
    pub async fn has(&self, namespace: &str, key: &str) -> Result<bool, Error> {
        Ok(self.get(namespace, key).await?.is_some())
    }

    /// Read an entry, consulting memory before the namespace file
    pub async fn get(&self, namespace: &str, key: &str) -> Result<Option<String>, Error> {
        let composite = composite_key(namespace, key);
        if let Some(value) = self.memory.get(&composite).await {
            return Ok(Some(value));
        }

        let entries = self.load_namespace(namespace).await?;
        if let Some(value) = entries.get(key) {
            self.memory.insert(composite, value.clone()).await;
            return Ok(Some(value.clone()));
        }
        Ok(None)
    }

    /// Write an entry, overwriting any stale value for the same key
    pub async fn set(&self, namespace: &str, key: &str, value: String) -> Result<(), Error> {
        {
            let _guard = self.disk.lock().await;
            let mut entries = self.load_namespace(namespace).await?;
            entries.insert(key.to_string(), value.clone());
            self.store_namespace(namespace, &entries).await?;
        }
        self.memory.insert(composite_key(namespace, key), value).await;
        Ok(())
    }

    /// Return the cached value, or resolve and store it.
    ///
    /// Concurrent calls for the same (namespace, key) share one resolution;
    /// every waiter observes the leader's value or error.
    pub async fn get_or_resolve<F, Fut>(
        &self,
        namespace: &str,
        key: &str,
        resolve: F,
    ) -> Result<String, Error>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, Error>>,
    {
        let composite = composite_key(namespace, key);
        let namespace = namespace.to_string();
        let key = key.to_string();

        self.memory
            .try_get_with(composite, async move {
                if let Some(value) = self.read_disk(&namespace, &key).await? {
                    debug!("detail cache hit (disk) for {namespace}");
                    return Ok(value);
                }
                debug!("detail cache miss for {namespace}");
                let value = resolve().await?;
                {
                    let _guard = self.disk.lock().await;
                    let mut entries = self.load_namespace(&namespace).await?;
                    entries.insert(key, value.clone());
                    self.store_namespace(&namespace, &entries).await?;
                }
                Ok(value)
            })
            .await
            .map_err(|e: Arc<Error>| match e.as_ref() {
                Error::Cache(msg) => Error::Cache(msg.clone()),
                other => Error::Details(other.to_string()),
            })
    }

    async fn read_disk(&self, namespace: &str, key: &str) -> Result<Option<String>, Error> {
        let entries = self.load_namespace(namespace).await?;
        Ok(entries.get(key).cloned())
    }

    async fn load_namespace(&self, namespace: &str) -> Result<HashMap<String, String>, Error> {
        let path = self.namespace_path(namespace);
        match tokio::fs::read_to_string(&path).await {
            Ok(raw) => serde_json::from_str(&raw)
                .map_err(|e| Error::Cache(format!("corrupt namespace {namespace}: {e}"))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(Error::Cache(format!("read {}: {e}", path.display()))),
        }
    }

    async fn store_namespace(
        &self,
        namespace: &str,
        entries: &HashMap<String, String>,
    ) -> Result<(), Error> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| Error::Cache(format!("create {}: {e}", self.dir.display())))?;
        let path = self.namespace_path(namespace);
        let raw = serde_json::to_string(entries)?;
        tokio::fs::write(&path, raw)
            .await
            .map_err(|e| Error::Cache(format!("write {}: {e}", path.display())))
    }

    fn namespace_path(&self, namespace: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize(namespace)))
    }
}

/// Composite memory key; '\u{0}' cannot appear in a namespace
fn composite_key(namespace: &str, key: &str) -> String {
    format!("{namespace}\u{0}{key}")
}

/// Keep namespace file names free of path separators
fn sanitize(namespace: &str) -> String {
    namespace
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Default cache directory under the platform cache root
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("lumen")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    #[tokio::test]
    async fn set_then_get_round_trips() {
        let dir = TempDir::new().unwrap();
        let cache = DetailCache::new(dir.path());

        cache.set("files-item-details", "k1", "detail".into()).await.unwrap();
        assert_eq!(
            cache.get("files-item-details", "k1").await.unwrap(),
            Some("detail".into())
        );
        assert!(cache.has("files-item-details", "k1").await.unwrap());
        assert!(!cache.has("files-item-details", "k2").await.unwrap());
    }

    #[tokio::test]
    async fn entries_survive_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let cache = DetailCache::new(dir.path());
            cache.set("ns", "k", "persisted".into()).await.unwrap();
        }
        let cache = DetailCache::new(dir.path());
        assert_eq!(cache.get("ns", "k").await.unwrap(), Some("persisted".into()));
    }

    #[tokio::test]
    async fn namespaces_are_isolated() {
        let dir = TempDir::new().unwrap();
        let cache = DetailCache::new(dir.path());
        cache.set("a", "k", "va".into()).await.unwrap();
        cache.set("b", "k", "vb".into()).await.unwrap();
        assert_eq!(cache.get("a", "k").await.unwrap(), Some("va".into()));
        assert_eq!(cache.get("b", "k").await.unwrap(), Some("vb".into()));
    }

    #[tokio::test]
    async fn overwrite_replaces_stale_value() {
        let dir = TempDir::new().unwrap();
        let cache = DetailCache::new(dir.path());
        cache.set("ns", "k", "old".into()).await.unwrap();
        cache.set("ns", "k", "new".into()).await.unwrap();
        assert_eq!(cache.get("ns", "k").await.unwrap(), Some("new".into()));
    }

    #[tokio::test]
    async fn concurrent_sets_in_one_namespace_both_persist() {
        let dir = TempDir::new().unwrap();
        {
            let cache = Arc::new(DetailCache::new(dir.path()));
            let (a, b) = tokio::join!(
                cache.set("ns", "k1", "v1".into()),
                cache.set("ns", "k2", "v2".into()),
            );
            a.unwrap();
            b.unwrap();
        }

        // Reopen so reads come from the namespace file, not memory.
        let cache = DetailCache::new(dir.path());
        assert_eq!(cache.get("ns", "k1").await.unwrap(), Some("v1".into()));
        assert_eq!(cache.get("ns", "k2").await.unwrap(), Some("v2".into()));
    }

    #[tokio::test]
    async fn persistence_failure_surfaces_as_cache_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        tokio::fs::write(&blocker, "x").await.unwrap();

        // Rooting the cache at a regular file makes every namespace
        // read and write fail.
        let cache = DetailCache::new(&blocker);
        let err = cache
            .get_or_resolve("ns", "k", || async { Ok("v".to_string()) })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Cache(_)));
    }

    #[tokio::test]
    async fn get_or_resolve_invokes_resolver_once() {
        let dir = TempDir::new().unwrap();
        let cache = DetailCache::new(dir.path());
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let value = cache
                .get_or_resolve("ns", "k", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok("resolved".to_string())
                })
                .await
                .unwrap();
            assert_eq!(value, "resolved");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn concurrent_misses_coalesce() {
        let dir = TempDir::new().unwrap();
        let cache = Arc::new(DetailCache::new(dir.path()));
        let calls = Arc::new(AtomicUsize::new(0));

        let resolve = |calls: Arc<AtomicUsize>| {
            move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(std::time::Duration::from_millis(20)).await;
                Ok("once".to_string())
            }
        };

        let (a, b) = tokio::join!(
            cache.get_or_resolve("ns", "k", resolve(calls.clone())),
            cache.get_or_resolve("ns", "k", resolve(calls.clone())),
        );
        assert_eq!(a.unwrap(), "once");
        assert_eq!(b.unwrap(), "once");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn resolver_error_propagates_and_is_not_cached() {
        let dir = TempDir::new().unwrap();
        let cache = DetailCache::new(dir.path());

        let err = cache
            .get_or_resolve("ns", "k", || async {
                Err(Error::provider("files", "transient"))
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Details(_)));

        // A later attempt resolves normally.
        let value = cache
            .get_or_resolve("ns", "k", || async { Ok("recovered".to_string()) })
            .await
            .unwrap();
        assert_eq!(value, "recovered");
    }

    #[test]
    fn namespace_names_are_sanitized() {
        let dir = std::env::temp_dir();
        let cache = DetailCache::new(&dir);
        let path = cache.namespace_path("../evil/ns");
        assert_eq!(path.file_name().unwrap(), ".._evil_ns.json");
    }
}
