// Path: crates/operator-rpc/src/lib.rs
//! Typed JSON-RPC client to a single upstream chain node: governance
//! node listing, the four UTXO categories, the node's RPC pubkey, and
//! the monitor set.

/// Flat ABI encode/decode for the two governance-contract calls.
pub mod abi;
/// The [`node_client::NodeClient`] itself.
pub mod node_client;

pub use node_client::{pubkey_matches_hash, NodeClient};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn get_monitors_decodes_addresses() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": ["0x0101010101010101010101010101010101010101"]
            })))
            .mount(&server)
            .await;

        let client = NodeClient::new(server.uri(), "0x0", Duration::from_secs(1));
        let monitors = client.get_monitors().await.unwrap();
        assert_eq!(monitors, vec![[1u8; 20]]);
    }

    #[tokio::test]
    async fn remote_json_rpc_error_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "error": {"code": -32000, "message": "boom"}
            })))
            .mount(&server)
            .await;

        let client = NodeClient::new(server.uri(), "0x0", Duration::from_secs(1));
        let err = client.get_monitors().await.unwrap_err();
        assert!(matches!(err, operator_types::RpcError::Remote { code: -32000, .. }));
    }

    #[test]
    fn pubkey_matches_hash_checks_sha256() {
        use sha2::{Digest, Sha256};
        let pubkey = vec![1, 2, 3];
        let hash: [u8; 32] = Sha256::digest(&pubkey).into();
        assert!(pubkey_matches_hash(&pubkey, &hash));
        assert!(!pubkey_matches_hash(&pubkey, &[0u8; 32]));
    }
}
