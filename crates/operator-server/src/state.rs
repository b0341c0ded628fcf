//! Shared application state handed to every axum handler.

use operator_attest::AttestationAdapter;
use operator_crypto::{Clock, KeyVault};
use operator_engine::SigningEngine;
use operator_fleet::FleetState;
use operator_types::SuspendFlag;
use std::sync::Arc;

pub struct AppState {
    pub server_name: String,
    pub cert_der: Vec<u8>,
    pub key_vault: Arc<KeyVault>,
    pub engine: Arc<SigningEngine>,
    pub fleet: Arc<FleetState>,
    pub suspend: Arc<SuspendFlag>,
    pub attestation: Arc<dyn AttestationAdapter>,
    pub attestation_provider_url: String,
    pub clock: Arc<dyn Clock>,
}

pub type SharedState = Arc<AppState>;
