//! HTTP handlers for every endpoint the attested listener exposes.

use crate::resp::{hex0x, Resp};
use crate::state::SharedState;
use crate::suspend::{recover_signer, suspend_message};
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use operator_types::RequestError;
use serde::Deserialize;
use sha2::{Digest, Sha256};

const SUSPEND_TS_SKEW_SECS: i64 = 60;

fn raw_or_envelope(raw: bool, bytes: Vec<u8>) -> Response {
    if raw {
        ([(header::CONTENT_TYPE, "application/octet-stream")], bytes).into_response()
    } else {
        Resp::ok(hex0x(&bytes)).into_response()
    }
}

#[derive(Deserialize, Default)]
pub struct RawQuery {
    #[serde(default)]
    pub raw: bool,
}

pub async fn cert_handler(State(state): State<SharedState>, Query(q): Query<RawQuery>) -> Response {
    raw_or_envelope(q.raw, state.cert_der.clone())
}

pub async fn cert_report_handler(State(state): State<SharedState>) -> Response {
    let hash: [u8; 32] = Sha256::digest(&state.cert_der).into();
    match state.attestation.generate_report(hash).await {
        Ok(report) => Resp::ok(hex0x(&report)).into_response(),
        Err(e) => Resp::from_error(&e).into_response(),
    }
}

pub async fn pubkey_handler(State(state): State<SharedState>, Query(q): Query<RawQuery>) -> Response {
    let pubkey = state.key_vault.public_key();
    raw_or_envelope(q.raw, pubkey.to_vec())
}

pub async fn pubkey_report_handler(State(state): State<SharedState>) -> Response {
    let pubkey = state.key_vault.public_key();
    let hash: [u8; 32] = Sha256::digest(pubkey).into();
    match state.attestation.generate_report(hash).await {
        Ok(report) => Resp::ok(hex0x(&report)).into_response(),
        Err(e) => Resp::from_error(&e).into_response(),
    }
}

pub async fn pubkey_jwt_handler(State(state): State<SharedState>) -> Response {
    let pubkey = state.key_vault.public_key();
    match state
        .attestation
        .create_jwt(&pubkey, &state.attestation_provider_url)
        .await
    {
        Ok(token) => Resp::ok(serde_json::Value::String(token)).into_response(),
        Err(e) => Resp::from_error(&e).into_response(),
    }
}

#[derive(Deserialize)]
pub struct SigQuery {
    pub hash: Option<String>,
}

pub async fn sig_handler(State(state): State<SharedState>, Query(q): Query<SigQuery>) -> Response {
    // Suspension precedes all other logic.
    if state.suspend.is_suspended() {
        return Resp::from_error(&RequestError::Engine(operator_types::EngineError::Suspended))
            .into_response();
    }

    let Some(hash) = q.hash else {
        return Resp::from_error(&RequestError::MissingParam("hash")).into_response();
    };

    match state.engine.get_signature(&hash).await {
        Ok(sig) => Resp::ok(hex0x(&sig)).into_response(),
        Err(e) => Resp::from_error(&RequestError::Engine(e)).into_response(),
    }
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct InfoPayload {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    curr_nodes: Option<operator_types::NodeSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    new_nodes: Option<operator_types::NodeSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    nodes_changed_time: Option<u64>,
    monitors: Vec<String>,
}

pub async fn info_handler(State(state): State<SharedState>) -> Response {
    let snapshot = state.fleet.snapshot().await;
    let status = if state.suspend.is_suspended() { "suspended" } else { "ok" };

    let payload = InfoPayload {
        status,
        curr_nodes: Some(snapshot.current.node_set.clone()),
        new_nodes: snapshot.candidate.map(|c| c.node_set.clone()),
        nodes_changed_time: snapshot.nodes_changed_time,
        monitors: snapshot.monitors.curr.iter().map(|a| hex0x(a)).collect(),
    };
    Resp::ok(payload).into_response()
}

#[derive(Deserialize)]
pub struct SuspendQuery {
    pub sig: Option<String>,
    pub ts: Option<String>,
}

pub async fn suspend_handler(State(state): State<SharedState>, Query(q): Query<SuspendQuery>) -> Response {
    match try_suspend(&state, q).await {
        Ok(()) => Resp::ok(serde_json::Value::String("ok".into())).into_response(),
        Err(e) => Resp::from_error(&e).into_response(),
    }
}

async fn try_suspend(state: &SharedState, q: SuspendQuery) -> Result<(), RequestError> {
    let sig_hex = q.sig.ok_or(RequestError::MissingParam("sig"))?;
    let ts_str = q.ts.ok_or(RequestError::MissingParam("ts"))?;

    let ts: i64 = ts_str
        .parse()
        .map_err(|_| RequestError::BadTimestamp(ts_str.clone()))?;

    let now = state.clock.now_unix() as i64;
    if ts - now > SUSPEND_TS_SKEW_SECS {
        return Err(RequestError::TsTooNew);
    }
    if now - ts > SUSPEND_TS_SKEW_SECS {
        return Err(RequestError::TsTooOld);
    }

    let sig_bytes = hex::decode(sig_hex.trim_start_matches("0x"))
        .map_err(|e| RequestError::BadHex(e.to_string()))?;

    let pubkey = state.key_vault.public_key();
    let message = suspend_message(&pubkey, ts);
    let signer = recover_signer(&message, &sig_bytes).map_err(RequestError::BadSignature)?;

    let snapshot = state.fleet.snapshot().await;
    if !snapshot.monitors.is_authorised(&signer) {
        return Err(RequestError::NotAuthorised);
    }

    state.suspend.set();
    Ok(())
}

async fn utxo_passthrough<F, Fut>(state: &SharedState, f: F) -> Response
where
    F: Fn(std::sync::Arc<operator_rpc::NodeClient>) -> Fut,
    Fut: std::future::Future<Output = Result<Vec<operator_types::UtxoRef>, operator_types::RpcError>>,
{
    let cluster = state.fleet.current().await;
    match cluster.get(f).await {
        Ok(utxos) => {
            let hashes: Vec<String> = utxos.iter().map(|u| hex0x(&u.tx_sig_hash)).collect();
            Resp::ok(hashes).into_response()
        }
        Err(e) => Resp::err(e.to_string()).into_response(),
    }
}

pub async fn redeeming_operators_handler(State(state): State<SharedState>) -> Response {
    utxo_passthrough(&state, |c| async move { c.get_redeeming_utxos_for_operators().await }).await
}

pub async fn redeeming_monitors_handler(State(state): State<SharedState>) -> Response {
    utxo_passthrough(&state, |c| async move { c.get_redeeming_utxos_for_monitors().await }).await
}

pub async fn to_be_converted_operators_handler(State(state): State<SharedState>) -> Response {
    utxo_passthrough(&state, |c| async move { c.get_to_be_converted_utxos_for_operators().await })
        .await
}

pub async fn to_be_converted_monitors_handler(State(state): State<SharedState>) -> Response {
    utxo_passthrough(&state, |c| async move { c.get_to_be_converted_utxos_for_monitors().await })
        .await
}
