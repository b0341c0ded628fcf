// Path: crates/operator-attest/src/lib.rs
//! Attestation Adapter: "generate a remote report over a payload hash"
//! and its Azure-attestation JWT variant. Remote-report generation and
//! JWT issuance are enclave SDK primitives outside this crate's scope —
//! this crate only owns the seam and the non-SGX fallback behaviour.

use async_trait::async_trait;
use operator_types::RequestError;

#[async_trait]
pub trait AttestationAdapter: Send + Sync {
    /// `report_data` is bound into the enclave's remote report, typically
    /// `sha256(certDer)` or `sha256(pubkey)`.
    async fn generate_report(&self, report_data: [u8; 32]) -> Result<Vec<u8>, RequestError>;

    async fn create_jwt(&self, payload: &[u8], provider_url: &str) -> Result<String, RequestError>;
}

/// The adapter used whenever the `sgx` feature isn't linked: every
/// endpoint that would call into the enclave SDK returns a uniform
/// "non-SGX mode" error instead of silently degrading.
pub struct UnavailableAdapter;

#[async_trait]
impl AttestationAdapter for UnavailableAdapter {
    async fn generate_report(&self, _report_data: [u8; 32]) -> Result<Vec<u8>, RequestError> {
        Err(RequestError::AttestationUnavailable)
    }

    async fn create_jwt(&self, _payload: &[u8], _provider_url: &str) -> Result<String, RequestError> {
        Err(RequestError::AttestationUnavailable)
    }
}

/// Linked only when the `sgx` feature is enabled; the actual enclave
/// syscalls (`ego_enclave::get_remote_report`, Azure attestation token
/// exchange) are an SDK integration this crate deliberately does not
/// implement — a real `sgx` build supplies a concrete adapter of its own
/// and wires it in at the binary crate instead of this stub.
#[cfg(feature = "sgx")]
pub struct EnclaveAdapter;

#[cfg(feature = "sgx")]
#[async_trait]
impl AttestationAdapter for EnclaveAdapter {
    async fn generate_report(&self, _report_data: [u8; 32]) -> Result<Vec<u8>, RequestError> {
        Err(RequestError::Attestation(
            "sgx feature compiled but no enclave SDK adapter was linked in".into(),
        ))
    }

    async fn create_jwt(&self, _payload: &[u8], _provider_url: &str) -> Result<String, RequestError> {
        Err(RequestError::Attestation(
            "sgx feature compiled but no enclave SDK adapter was linked in".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unavailable_adapter_rejects_report_and_jwt() {
        let adapter = UnavailableAdapter;
        assert!(matches!(
            adapter.generate_report([0u8; 32]).await,
            Err(RequestError::AttestationUnavailable)
        ));
        assert!(matches!(
            adapter.create_jwt(b"x", "https://example").await,
            Err(RequestError::AttestationUnavailable)
        ));
    }
}
