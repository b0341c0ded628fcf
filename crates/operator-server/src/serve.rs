//! Start-up wiring: generate the self-signed cert, build the TLS config,
//! and drive the axum listener until the process is killed.

use crate::router::build_router;
use crate::state::{AppState, SharedState};
use crate::{cert, tls};
use operator_types::StartupError;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

const WRITE_TIMEOUT: Duration = Duration::from_secs(5);

pub async fn run(listen_addr: SocketAddr, state: AppState) -> Result<(), StartupError> {
    let cert = cert::generate(&state.server_name)?;
    let tls_config = tls::rustls_config(cert.cert_der.clone(), cert.key_der).await?;

    let state = Arc::new(AppState {
        cert_der: cert.cert_der,
        ..state
    });
    let router = build_router(state, WRITE_TIMEOUT);

    info!(%listen_addr, "listening");
    axum_server::bind_rustls(listen_addr, tls_config)
        .serve(router.into_make_service())
        .await
        .map_err(|e| StartupError::Certificate(format!("server exited with error: {e}")))
}

pub type SharedAppState = SharedState;
