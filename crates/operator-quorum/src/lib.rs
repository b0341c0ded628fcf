// Path: crates/operator-quorum/src/lib.rs
//! The Quorum Client: composition of node clients built from a
//! [`operator_types::NodeSet`], fanning every read out in parallel and
//! requiring every member to agree.

pub mod cluster;

pub use cluster::ClusterClient;

#[cfg(test)]
mod tests {
    use super::*;
    use operator_types::NodeSet;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mock_monitor_server(addr_hex: &str) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": [addr_hex]
            })))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn two_agreeing_private_nodes_return_common_value() {
        let a = mock_monitor_server("0x0101010101010101010101010101010101010101").await;
        let b = mock_monitor_server("0x0101010101010101010101010101010101010101").await;

        let node_set = NodeSet::new(vec![], vec![a.uri(), b.uri()]);
        let cluster = ClusterClient::build(node_set, "0x0", Duration::from_secs(2))
            .await
            .unwrap();

        let result = cluster
            .get(|client| async move { client.get_monitors().await })
            .await
            .unwrap();
        assert_eq!(result, vec![[1u8; 20]]);
    }

    #[tokio::test]
    async fn disagreeing_nodes_fail_the_read() {
        let a = mock_monitor_server("0x0101010101010101010101010101010101010101").await;
        let b = mock_monitor_server("0x0202020202020202020202020202020202020202").await;

        let node_set = NodeSet::new(vec![], vec![a.uri(), b.uri()]);
        let cluster = ClusterClient::build(node_set, "0x0", Duration::from_secs(2))
            .await
            .unwrap();

        let result = cluster
            .get(|client| async move { client.get_monitors().await })
            .await;
        assert!(matches!(
            result,
            Err(operator_types::QuorumError::Disagreement { .. })
        ));
    }

    #[tokio::test]
    async fn single_member_quorum_returns_sole_result() {
        let a = mock_monitor_server("0x0101010101010101010101010101010101010101").await;
        let node_set = NodeSet::new(vec![], vec![a.uri()]);
        let cluster = ClusterClient::build(node_set, "0x0", Duration::from_secs(2))
            .await
            .unwrap();

        let result = cluster
            .get(|client| async move { client.get_monitors().await })
            .await
            .unwrap();
        assert_eq!(result, vec![[1u8; 20]]);
    }
}
