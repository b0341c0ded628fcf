//! A typed JSON-RPC client to a single upstream chain node.
//!
//! Unlike the relayer-facing clients elsewhere in this codebase, a
//! single node request is never retried here — the quorum layer above
//! decides what to do with a failure, and retrying underneath it would
//! hide a flaky node from the disagreement check it performs.

use crate::abi;
use operator_types::{Hash32, NodeDescriptor, RpcError, UtxoRef};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use std::time::Duration;
use tokio::sync::Mutex;

#[derive(Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: Value,
    id: u64,
}

#[derive(Deserialize)]
struct JsonRpcResponse<T> {
    #[allow(dead_code)]
    jsonrpc: Option<String>,
    #[allow(dead_code)]
    id: Option<u64>,
    error: Option<JsonRpcErrorBody>,
    result: Option<T>,
}

#[derive(Deserialize)]
struct JsonRpcErrorBody {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
struct CcrpcInfo {
    pubkey: String,
}

#[derive(Deserialize)]
struct UtxoInfoWire {
    #[serde(rename = "txSigHash")]
    tx_sig_hash: String,
}

/// A single upstream node's JSON-RPC endpoint, plus the governance
/// contract address read through it.
pub struct NodeClient {
    url: String,
    nodes_gov_addr: String,
    http: reqwest::Client,
    // `GetRpcPubkey` is side-effectful per the contract: the first
    // successful call fetches cross-chain-info and every call after
    // returns the cached value.
    cached_pubkey: Mutex<Option<Vec<u8>>>,
}

impl NodeClient {
    pub fn new(url: impl Into<String>, nodes_gov_addr: impl Into<String>, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        NodeClient {
            url: url.into(),
            nodes_gov_addr: nodes_gov_addr.into(),
            http,
            cached_pubkey: Mutex::new(None),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, RpcError> {
        let req = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id: 1,
        };

        let resp = self
            .http
            .post(&self.url)
            .json(&req)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RpcError::Timeout {
                        url: self.url.clone(),
                        method: method.to_string(),
                    }
                } else {
                    RpcError::Transport {
                        url: self.url.clone(),
                        source: e.into(),
                    }
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(RpcError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body: JsonRpcResponse<T> = resp.json().await.map_err(|e| RpcError::Decode {
            url: self.url.clone(),
            reason: e.to_string(),
        })?;

        if let Some(err) = body.error {
            return Err(RpcError::Remote {
                url: self.url.clone(),
                code: err.code,
                message: err.message,
            });
        }

        body.result.ok_or_else(|| RpcError::Decode {
            url: self.url.clone(),
            reason: "response had neither result nor error".into(),
        })
    }

    async fn eth_call(&self, data: String) -> Result<String, RpcError> {
        self.call(
            "eth_call",
            json!([{"to": self.nodes_gov_addr, "data": data}, "latest"]),
        )
        .await
    }

    /// Two `eth_call`s: `getNodeCount()` then `nodes(i)` for each index.
    pub async fn get_sbchd_nodes(&self) -> Result<Vec<NodeDescriptor>, RpcError> {
        let count_hex = self.eth_call(abi::GET_NODE_COUNT_SELECTOR.to_string()).await?;
        let count = abi::decode_node_count(&count_hex).map_err(|reason| RpcError::Decode {
            url: self.url.clone(),
            reason,
        })?;

        let mut nodes = Vec::with_capacity(count as usize);
        for i in 0..count {
            let record_hex = self.eth_call(abi::encode_node_by_idx_call(i)).await?;
            let node = abi::decode_node_record(&record_hex).map_err(|reason| RpcError::Decode {
                url: self.url.clone(),
                reason,
            })?;
            nodes.push(node);
        }
        Ok(nodes)
    }

    async fn get_sig_hashes(&self, method: &str) -> Result<Vec<UtxoRef>, RpcError> {
        let infos: Vec<UtxoInfoWire> = self.call(method, json!([])).await?;
        infos
            .into_iter()
            .map(|info| {
                let bytes = hex::decode(info.tx_sig_hash.trim_start_matches("0x")).map_err(|e| {
                    RpcError::Decode {
                        url: self.url.clone(),
                        reason: format!("bad sighash hex: {e}"),
                    }
                })?;
                let hash: Hash32 = bytes.try_into().map_err(|v: Vec<u8>| RpcError::Decode {
                    url: self.url.clone(),
                    reason: format!("sighash was {} bytes, expected 32", v.len()),
                })?;
                Ok(UtxoRef { tx_sig_hash: hash })
            })
            .collect()
    }

    pub async fn get_redeeming_utxos_for_operators(&self) -> Result<Vec<UtxoRef>, RpcError> {
        self.get_sig_hashes("sbch_getRedeemingUtxosForOperators").await
    }

    pub async fn get_redeeming_utxos_for_monitors(&self) -> Result<Vec<UtxoRef>, RpcError> {
        self.get_sig_hashes("sbch_getRedeemingUtxosForMonitors").await
    }

    pub async fn get_to_be_converted_utxos_for_operators(&self) -> Result<Vec<UtxoRef>, RpcError> {
        self.get_sig_hashes("sbch_getToBeConvertedUtxosForOperators").await
    }

    pub async fn get_to_be_converted_utxos_for_monitors(&self) -> Result<Vec<UtxoRef>, RpcError> {
        self.get_sig_hashes("sbch_getToBeConvertedUtxosForMonitors").await
    }

    /// Side-effectful: the first call fetches and caches the cross-chain
    /// RPC pubkey; later calls return the cached bytes without a network
    /// round-trip.
    pub async fn get_rpc_pubkey(&self) -> Result<Vec<u8>, RpcError> {
        let mut cached = self.cached_pubkey.lock().await;
        if let Some(pk) = cached.as_ref() {
            return Ok(pk.clone());
        }
        let info: CcrpcInfo = self.call("sbch_getCcrpcInfo", json!([])).await?;
        let bytes = hex::decode(info.pubkey.trim_start_matches("0x")).map_err(|e| RpcError::Decode {
            url: self.url.clone(),
            reason: format!("bad pubkey hex: {e}"),
        })?;
        *cached = Some(bytes.clone());
        Ok(bytes)
    }

    pub async fn get_monitors(&self) -> Result<Vec<[u8; 20]>, RpcError> {
        let addrs: Vec<String> = self.call("sbch_getMonitors", json!([])).await?;
        addrs
            .into_iter()
            .map(|a| {
                let bytes = hex::decode(a.trim_start_matches("0x")).map_err(|e| RpcError::Decode {
                    url: self.url.clone(),
                    reason: format!("bad monitor address hex: {e}"),
                })?;
                bytes.try_into().map_err(|v: Vec<u8>| RpcError::Decode {
                    url: self.url.clone(),
                    reason: format!("monitor address was {} bytes, expected 20", v.len()),
                })
            })
            .collect()
    }
}

/// `sha256(pubkey) == descriptor.pbkHash`, the check a [`NodeClient`]
/// construction must pass for every public node before it's trusted.
pub fn pubkey_matches_hash(pubkey: &[u8], expected: &Hash32) -> bool {
    let hash = Sha256::digest(pubkey);
    hash.as_slice() == expected
}
