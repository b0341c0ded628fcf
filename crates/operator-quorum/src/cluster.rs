//! The Quorum Client: a `ClusterClient` built from a [`NodeSet`], fanning
//! every read out to its members and requiring agreement.

use futures::future::join_all;
use operator_rpc::NodeClient;
use operator_types::{NodeSet, QuorumError, RpcError};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Immutable once built: the member clients and the public [`NodeSet`]
/// that justified them. Node order is exactly the sorted public set
/// followed by the private URLs.
pub struct ClusterClient {
    pub node_set: NodeSet,
    members: Vec<Arc<NodeClient>>,
}

impl ClusterClient {
    /// Builds a cluster from `node_set`, validating every public node by
    /// fetching its RPC pubkey and comparing `sha256(pubkey)` against the
    /// descriptor's `pbkHash`. Private URLs are trusted by configuration
    /// and skip this check. Any public mismatch fails the whole build.
    pub async fn build(
        node_set: NodeSet,
        nodes_gov_addr: &str,
        per_request_timeout: Duration,
    ) -> Result<Self, QuorumError> {
        let mut members = Vec::with_capacity(node_set.public.len() + node_set.private_urls.len());

        for desc in &node_set.public {
            let client = Arc::new(NodeClient::new(
                desc.rpc_url.clone(),
                nodes_gov_addr,
                per_request_timeout,
            ));
            let pubkey = client
                .get_rpc_pubkey()
                .await
                .map_err(|e| QuorumError::MemberFailed {
                    url: desc.rpc_url.clone(),
                    source: e,
                })?;
            if !operator_rpc::pubkey_matches_hash(&pubkey, &desc.pbk_hash) {
                return Err(QuorumError::PubkeyMismatch { id: desc.id });
            }
            members.push(client);
        }

        for url in &node_set.private_urls {
            members.push(Arc::new(NodeClient::new(
                url.clone(),
                nodes_gov_addr,
                per_request_timeout,
            )));
        }

        if members.is_empty() {
            return Err(QuorumError::Empty);
        }

        Ok(ClusterClient { node_set, members })
    }

    /// Fans `f` out to every member in parallel, waits for all of them,
    /// and requires every response to compare equal. The first member
    /// error or the first pair of disagreeing responses wins; both name
    /// the offending url(s).
    pub async fn get<F, Fut, T>(&self, f: F) -> Result<T, QuorumError>
    where
        F: Fn(Arc<NodeClient>) -> Fut,
        Fut: Future<Output = Result<T, RpcError>>,
        T: PartialEq + Clone,
    {
        if self.members.is_empty() {
            return Err(QuorumError::Empty);
        }

        let futures = self.members.iter().map(|m| {
            let m = m.clone();
            let fut = f(m.clone());
            async move { (m.url().to_string(), fut.await) }
        });

        let results = join_all(futures).await;

        let mut first: Option<(String, T)> = None;
        for (url, result) in results {
            let value = result.map_err(|source| {
                warn!(url = %url, error = %source, "quorum member failed");
                QuorumError::MemberFailed { url: url.clone(), source }
            })?;

            match &first {
                None => first = Some((url, value)),
                Some((first_url, first_value)) => {
                    if *first_value != value {
                        return Err(QuorumError::Disagreement {
                            left: first_url.clone(),
                            right: url,
                        });
                    }
                }
            }
        }

        Ok(first.expect("members is non-empty, checked above").1)
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use operator_types::NodeDescriptor;

    #[tokio::test]
    async fn build_fails_on_empty_node_set() {
        let result = ClusterClient::build(NodeSet::default(), "0x0", Duration::from_secs(1)).await;
        assert!(matches!(result, Err(QuorumError::Empty)));
    }

    #[tokio::test]
    async fn build_accepts_private_urls_without_pubkey_check() {
        let node_set = NodeSet::new(vec![], vec!["http://127.0.0.1:1".into()]);
        let cluster = ClusterClient::build(node_set, "0x0", Duration::from_millis(50))
            .await
            .unwrap();
        assert_eq!(cluster.member_count(), 1);
    }

    #[allow(dead_code)]
    fn _desc() -> NodeDescriptor {
        NodeDescriptor {
            id: 1,
            pbk_hash: [0u8; 32],
            rpc_url: "http://example".into(),
            intro: String::new(),
        }
    }
}
