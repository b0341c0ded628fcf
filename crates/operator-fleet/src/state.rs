//! Shared cluster state: `current` + `candidate` + the monitor set,
//! guarded by a single read-write lock as the design notes require.
//!
//! This replaces the source's module-level mutable globals with one
//! explicit value the process entry point owns and hands by shared
//! reference to the Fleet Watcher, Signing Engine, and HTTP handlers.
//! Locking stays internal here; nothing outside this module takes the
//! lock directly.

use operator_quorum::ClusterClient;
use operator_types::{MonitorSet, NodeSet};
use std::sync::Arc;
use tokio::sync::RwLock;

struct Inner {
    current: Arc<ClusterClient>,
    candidate: Option<Arc<ClusterClient>>,
    monitors: MonitorSet,
    nodes_changed_time: Option<u64>,
}

pub struct FleetState {
    inner: RwLock<Inner>,
}

/// A point-in-time view used to answer `/info` and to decide what the
/// next watcher tick should do, taken under a single read lock so it
/// never straddles a concurrent swap.
pub struct Snapshot {
    pub current: Arc<ClusterClient>,
    pub candidate: Option<Arc<ClusterClient>>,
    pub monitors: MonitorSet,
    pub nodes_changed_time: Option<u64>,
}

impl FleetState {
    pub fn new(initial: ClusterClient) -> Arc<Self> {
        Arc::new(FleetState {
            inner: RwLock::new(Inner {
                current: Arc::new(initial),
                candidate: None,
                monitors: MonitorSet::default(),
                nodes_changed_time: None,
            }),
        })
    }

    /// The live `current` client, for readers (request handlers, the
    /// signing engine) that need a snapshot for the duration of one
    /// operation.
    pub async fn current(&self) -> Arc<ClusterClient> {
        self.inner.read().await.current.clone()
    }

    pub async fn snapshot(&self) -> Snapshot {
        let inner = self.inner.read().await;
        Snapshot {
            current: inner.current.clone(),
            candidate: inner.candidate.clone(),
            monitors: inner.monitors.clone(),
            nodes_changed_time: inner.nodes_changed_time,
        }
    }

    /// Folds a freshly observed monitor set into `curr`/`all`.
    pub async fn observe_monitors(&self, latest: std::collections::BTreeSet<[u8; 20]>) {
        let mut inner = self.inner.write().await;
        inner.monitors.observe(latest);
    }

    /// Installs `candidate`, entering or remaining in PENDING.
    pub async fn set_candidate(&self, candidate: ClusterClient, changed_time: u64) {
        let mut inner = self.inner.write().await;
        inner.candidate = Some(Arc::new(candidate));
        inner.nodes_changed_time = Some(changed_time);
    }

    /// Drops any candidate and returns to STEADY, e.g. when the upstream
    /// reverts to `current`'s node set before the settle delay elapses.
    pub async fn clear_candidate(&self) {
        let mut inner = self.inner.write().await;
        inner.candidate = None;
        inner.nodes_changed_time = None;
    }

    /// Atomically promotes `candidate` to `current`. No request observes
    /// a torn state where the public `NodeSet` disagrees with the
    /// underlying client list, since both live behind the same guard.
    pub async fn promote_candidate(&self) {
        let mut inner = self.inner.write().await;
        if let Some(candidate) = inner.candidate.take() {
            inner.current = candidate;
        }
        inner.nodes_changed_time = None;
    }

    pub async fn is_pending(&self) -> bool {
        self.inner.read().await.candidate.is_some()
    }

    pub async fn current_node_set(&self) -> NodeSet {
        self.inner.read().await.current.node_set.clone()
    }

    pub async fn candidate_node_set(&self) -> Option<NodeSet> {
        self.inner
            .read()
            .await
            .candidate
            .as_ref()
            .map(|c| c.node_set.clone())
    }
}
