//! Bounded artifact cache with single-flight build deduplication.
//!
//! The cache is the memoizing front for the external compiler. Concurrent
//! requests for the same contract uid while no entry exists collapse into a
//! single underlying build whose outcome every waiter observes; requests for
//! different uids proceed fully in parallel. Successful builds enter a
//! bounded LRU; failed builds are never cached, so the next caller retries.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use chrono::Utc;
use covenant_types::{CacheEntry, ResolveError};
use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::config::CompilerConfig;

mod process;

type SharedBuild = Shared<BoxFuture<'static, Result<Vec<u8>, ResolveError>>>;

/// An in-progress build registered for single-flight deduplication.
///
/// The id distinguishes a build from any later retry for the same contract,
/// so a stale completion cannot retire a newer handle.
#[derive(Clone)]
struct InFlightBuild {
    id: u64,
    build: SharedBuild,
}

/// Memoizing, deduplicating front for the external compiler.
///
/// All mutation (insert, evict, single-flight bookkeeping) happens under one
/// internal lock scoped strictly to cache metadata; the lock is never held
/// across the compiler process itself.
pub struct CompileCache {
    compiler: CompilerConfig,
    capacity: usize,
    build_timeout: Duration,
    state: Mutex<CacheState>,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<u64, CacheEntry>,
    recency: VecDeque<u64>,
    in_flight: HashMap<u64, InFlightBuild>,
    next_build_id: u64,
}

impl CacheState {
    /// Refresh a uid's position in the recency order.
    fn touch(&mut self, uid: u64) {
        self.recency.retain(|entry| *entry != uid);
        self.recency.push_back(uid);
    }

    /// Insert a built artifact, evicting least-recently-used entries beyond
    /// `capacity`.
    fn insert(&mut self, uid: u64, artifact: Vec<u8>, capacity: usize) {
        if self.entries.contains_key(&uid) {
            self.touch(uid);
            return;
        }

        self.entries.insert(
            uid,
            CacheEntry {
                contract_uid: uid,
                artifact,
                built_at: Utc::now(),
            },
        );
        self.recency.push_back(uid);

        while self.entries.len() > capacity {
            match self.recency.pop_front() {
                Some(oldest) => {
                    debug!("evicting cached artifact for contract {oldest}");
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }
    }
}

impl CompileCache {
    /// Create a cache for the given compiler, capacity, and build timeout.
    pub fn new(compiler: CompilerConfig, capacity: usize, build_timeout: Duration) -> Self {
        Self {
            compiler,
            capacity,
            build_timeout,
            state: Mutex::new(CacheState::default()),
        }
    }

    /// Return the cached artifact for a contract, building it at most once
    /// among concurrent callers when absent.
    pub async fn get_or_build(&self, contract_uid: u64, source: &str) -> Result<Vec<u8>, ResolveError> {
        let build = {
            let mut state = self.state.lock().await;

            if let Some(entry) = state.entries.get(&contract_uid) {
                let artifact = entry.artifact.clone();
                state.touch(contract_uid);
                debug!("cache hit for contract {contract_uid}");
                return Ok(artifact);
            }

            if let Some(existing) = state.in_flight.get(&contract_uid) {
                debug!("attaching to in-flight build for contract {contract_uid}");
                existing.clone()
            } else {
                debug!("starting build for contract {contract_uid}");
                let id = state.next_build_id;
                state.next_build_id += 1;
                let in_flight = InFlightBuild {
                    id,
                    build: process::run_compiler(self.compiler.clone(), source.to_string(), self.build_timeout)
                        .boxed()
                        .shared(),
                };
                state.in_flight.insert(contract_uid, in_flight.clone());
                in_flight
            }
        };

        let outcome = build.build.clone().await;

        {
            let mut state = self.state.lock().await;
            // Retire only the build that produced this outcome; a newer
            // retry for the same uid must be left alone.
            if state.in_flight.get(&contract_uid).is_some_and(|current| current.id == build.id) {
                state.in_flight.remove(&contract_uid);
            }
            if let Ok(artifact) = &outcome {
                state.insert(contract_uid, artifact.clone(), self.capacity);
            }
        }

        if let Err(err) = &outcome {
            warn!("build for contract {contract_uid} failed: {err}");
        }
        outcome
    }

    /// Drop the cached artifact for a contract so the next caller rebuilds
    /// wholesale. In-flight builds are unaffected.
    pub async fn invalidate(&self, contract_uid: u64) {
        let mut state = self.state.lock().await;
        if state.entries.remove(&contract_uid).is_some() {
            state.recency.retain(|entry| *entry != contract_uid);
            debug!("invalidated cached artifact for contract {contract_uid}");
        }
    }

    /// Number of cached artifacts.
    pub async fn len(&self) -> usize {
        self.state.lock().await.entries.len()
    }

    /// Whether the cache holds no artifacts.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use super::*;

    fn shell(script: String) -> CompilerConfig {
        CompilerConfig {
            program: "/bin/sh".to_string(),
            args: vec!["-c".to_string(), script],
        }
    }

    /// Compiler double that records one line per invocation and echoes stdin.
    fn counting_compiler(counter: &Path) -> CompilerConfig {
        shell(format!("echo run >> {}; cat", counter.display()))
    }

    fn invocations(counter: &Path) -> usize {
        fs::read_to_string(counter).map(|content| content.lines().count()).unwrap_or(0)
    }

    fn init_test_logging() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    }

    #[tokio::test]
    async fn test_cache_hit_skips_rebuild() {
        let temp_dir = tempfile::tempdir().unwrap();
        let counter = temp_dir.path().join("counter");
        let cache = CompileCache::new(counting_compiler(&counter), 20, Duration::from_secs(5));

        let first = cache.get_or_build(1, "src").await.unwrap();
        let second = cache.get_or_build(1, "src").await.unwrap();

        assert_eq!(first, b"src");
        assert_eq!(second, b"src");
        assert_eq!(invocations(&counter), 1);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_same_uid_builds_once() {
        init_test_logging();
        let temp_dir = tempfile::tempdir().unwrap();
        let counter = temp_dir.path().join("counter");
        // Widen the in-flight window so both callers overlap.
        let script = format!("sleep 0.3; echo run >> {}; cat", counter.display());
        let cache = CompileCache::new(shell(script), 20, Duration::from_secs(5));

        let (first, second) = tokio::join!(cache.get_or_build(1, "src"), cache.get_or_build(1, "src"));

        assert_eq!(first.unwrap(), b"src");
        assert_eq!(second.unwrap(), b"src");
        assert_eq!(invocations(&counter), 1);
    }

    #[tokio::test]
    async fn test_concurrent_failure_is_shared_and_not_cached() {
        let cache = CompileCache::new(shell("sleep 0.3; echo boom >&2; exit 1".to_string()), 20, Duration::from_secs(5));

        let (first, second) = tokio::join!(cache.get_or_build(1, "src"), cache.get_or_build(1, "src"));

        assert!(matches!(first, Err(ResolveError::BuildFailed { .. })));
        assert!(matches!(second, Err(ResolveError::BuildFailed { .. })));
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_distinct_uids_build_independently() {
        let temp_dir = tempfile::tempdir().unwrap();
        let counter = temp_dir.path().join("counter");
        let cache = CompileCache::new(counting_compiler(&counter), 20, Duration::from_secs(5));

        let (first, second) = tokio::join!(cache.get_or_build(1, "one"), cache.get_or_build(2, "two"));

        assert_eq!(first.unwrap(), b"one");
        assert_eq!(second.unwrap(), b"two");
        assert_eq!(invocations(&counter), 2);
        assert_eq!(cache.len().await, 2);
    }

    #[tokio::test]
    async fn test_timeout_fails_and_caches_nothing() {
        let cache = CompileCache::new(shell("sleep 30".to_string()), 20, Duration::from_millis(200));

        let err = cache.get_or_build(1, "src").await.unwrap_err();
        assert!(matches!(err, ResolveError::BuildTimeout { .. }));
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_failed_build_is_retried_by_next_caller() {
        let temp_dir = tempfile::tempdir().unwrap();
        let flag = temp_dir.path().join("flag");
        // Fails on the first invocation, succeeds afterwards.
        let script = format!("if [ -f {flag} ]; then cat; else touch {flag}; echo boom >&2; exit 1; fi", flag = flag.display());
        let cache = CompileCache::new(shell(script), 20, Duration::from_secs(5));

        let err = cache.get_or_build(1, "src").await.unwrap_err();
        match err {
            ResolveError::BuildFailed { stderr } => assert!(stderr.contains("boom")),
            other => panic!("expected BuildFailed, got {other:?}"),
        }
        assert!(cache.is_empty().await);

        let artifact = cache.get_or_build(1, "src").await.unwrap();
        assert_eq!(artifact, b"src");
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_lru_eviction_at_capacity() {
        let temp_dir = tempfile::tempdir().unwrap();
        let counter = temp_dir.path().join("counter");
        let cache = CompileCache::new(counting_compiler(&counter), 2, Duration::from_secs(5));

        cache.get_or_build(1, "one").await.unwrap();
        cache.get_or_build(2, "two").await.unwrap();
        assert_eq!(invocations(&counter), 2);

        // Touch 1 so 2 becomes the eviction candidate.
        cache.get_or_build(1, "one").await.unwrap();
        cache.get_or_build(3, "three").await.unwrap();
        assert_eq!(cache.len().await, 2);
        assert_eq!(invocations(&counter), 3);

        // 1 survived, 2 was evicted and rebuilds.
        cache.get_or_build(1, "one").await.unwrap();
        assert_eq!(invocations(&counter), 3);
        cache.get_or_build(2, "two").await.unwrap();
        assert_eq!(invocations(&counter), 4);
    }

    #[tokio::test]
    async fn test_invalidate_forces_rebuild() {
        let temp_dir = tempfile::tempdir().unwrap();
        let counter = temp_dir.path().join("counter");
        let cache = CompileCache::new(counting_compiler(&counter), 20, Duration::from_secs(5));

        cache.get_or_build(1, "src").await.unwrap();
        cache.invalidate(1).await;
        assert!(cache.is_empty().await);

        cache.get_or_build(1, "src").await.unwrap();
        assert_eq!(invocations(&counter), 2);
    }
}
