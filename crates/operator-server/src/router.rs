//! Route table for the attested HTTPS listener.

use crate::handlers::*;
use crate::state::SharedState;
use axum::routing::get;
use axum::Router;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// `write_timeout` bounds every handler; HTTPS handlers must complete
/// within it and never call a blocking RPC without a deadline of their
/// own underneath it.
pub fn build_router(state: SharedState, write_timeout: Duration) -> Router {
    Router::new()
        .route("/cert", get(cert_handler))
        .route("/cert-report", get(cert_report_handler))
        .route("/pubkey", get(pubkey_handler))
        .route("/pubkey-report", get(pubkey_report_handler))
        .route("/pubkey-jwt", get(pubkey_jwt_handler))
        .route("/sig", get(sig_handler))
        .route("/info", get(info_handler))
        .route("/suspend", get(suspend_handler))
        .route("/redeeming-utxos-for-operators", get(redeeming_operators_handler))
        .route("/redeeming-utxos-for-monitors", get(redeeming_monitors_handler))
        .route(
            "/to-be-converted-utxos-for-operators",
            get(to_be_converted_operators_handler),
        )
        .route(
            "/to-be-converted-utxos-for-monitors",
            get(to_be_converted_monitors_handler),
        )
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(CatchPanicLayer::new())
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(write_timeout)),
        )
}
