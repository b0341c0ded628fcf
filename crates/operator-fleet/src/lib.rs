// Path: crates/operator-fleet/src/lib.rs
//! Fleet Watcher: periodically re-reads the governance node list and
//! atomically rotates the trusted cluster after a settle delay, while
//! `current` keeps serving reads throughout.

pub mod state;
pub mod watcher;

pub use state::FleetState;
pub use watcher::{FleetWatcher, FleetWatcherConfig};

#[cfg(test)]
mod tests {
    use super::*;
    use operator_quorum::ClusterClient;
    use operator_types::NodeSet;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn trivial_cluster() -> (MockServer, ClusterClient) {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": []
            })))
            .mount(&server)
            .await;
        let node_set = NodeSet::new(vec![], vec![server.uri()]);
        let cluster = ClusterClient::build(node_set, "0x0", Duration::from_secs(1))
            .await
            .unwrap();
        (server, cluster)
    }

    #[tokio::test]
    async fn starts_in_steady_with_no_candidate() {
        let (_server, cluster) = trivial_cluster().await;
        let state = FleetState::new(cluster);
        assert!(!state.is_pending().await);
    }

    #[tokio::test]
    async fn set_candidate_enters_pending() {
        let (_server1, cluster) = trivial_cluster().await;
        let (_server2, candidate) = trivial_cluster().await;
        let state = FleetState::new(cluster);

        state.set_candidate(candidate, 1_000).await;
        assert!(state.is_pending().await);

        let snap = state.snapshot().await;
        assert_eq!(snap.nodes_changed_time, Some(1_000));
    }

    #[tokio::test]
    async fn clear_candidate_returns_to_steady() {
        let (_server1, cluster) = trivial_cluster().await;
        let (_server2, candidate) = trivial_cluster().await;
        let state = FleetState::new(cluster);
        state.set_candidate(candidate, 1_000).await;

        state.clear_candidate().await;
        assert!(!state.is_pending().await);
        assert_eq!(state.snapshot().await.nodes_changed_time, None);
    }

    #[tokio::test]
    async fn promote_candidate_swaps_current_and_clears_candidate() {
        let (server1, cluster) = trivial_cluster().await;
        let (server2, candidate) = trivial_cluster().await;
        let state = FleetState::new(cluster);
        state.set_candidate(candidate, 1_000).await;

        state.promote_candidate().await;

        assert!(!state.is_pending().await);
        let current = state.current().await;
        // The promoted client's member should be the one pointing at
        // server2's url, not server1's.
        assert_eq!(current.member_count(), 1);
        drop(server1);
        drop(server2);
    }

    #[tokio::test]
    async fn no_request_observes_a_torn_swap() {
        // A reader taking a snapshot mid-promotion sees either the fully
        // old or fully new state, never a mix of node_set and client list,
        // because both live behind the one guard `promote_candidate`
        // writes under.
        let (_s1, cluster) = trivial_cluster().await;
        let (_s2, candidate) = trivial_cluster().await;
        let candidate_node_set = candidate.node_set.clone();
        let state = FleetState::new(cluster);
        state.set_candidate(candidate, 1_000).await;
        state.promote_candidate().await;

        let snap = state.snapshot().await;
        assert_eq!(snap.current.node_set, candidate_node_set);
        assert!(snap.candidate.is_none());
    }
}
