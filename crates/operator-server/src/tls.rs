//! Builds the rustls-backed TLS config around the self-signed
//! certificate for the attested listener.

use axum_server::tls_rustls::RustlsConfig;
use operator_types::StartupError;

pub async fn rustls_config(cert_der: Vec<u8>, key_der: Vec<u8>) -> Result<RustlsConfig, StartupError> {
    RustlsConfig::from_der(vec![cert_der], key_der)
        .await
        .map_err(|e| StartupError::Certificate(format!("failed to build tls config: {e}")))
}
