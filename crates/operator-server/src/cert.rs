//! Self-signed X.509 certificate generation for the attested HTTPS
//! listener. TLS certificate generation itself is treated as an external
//! collaborator's contract — we lean on `rcgen` and `rsa` rather than
//! hand-rolling ASN.1.

use operator_types::StartupError;
use rsa::pkcs8::EncodePrivateKey;
use rsa::RsaPrivateKey;
use time::{Duration, OffsetDateTime};

pub struct SelfSignedCert {
    pub cert_der: Vec<u8>,
    pub key_der: Vec<u8>,
}

/// Generates an RSA-2048, 10-year self-signed certificate with
/// `CN = server_name`.
pub fn generate(server_name: &str) -> Result<SelfSignedCert, StartupError> {
    let mut rng = rand::thread_rng();
    let rsa_key = RsaPrivateKey::new(&mut rng, 2048)
        .map_err(|e| StartupError::Certificate(format!("rsa key generation failed: {e}")))?;
    let pkcs8_der = rsa_key
        .to_pkcs8_der()
        .map_err(|e| StartupError::Certificate(format!("pkcs8 encoding failed: {e}")))?;

    let key_pair = rcgen::KeyPair::try_from(pkcs8_der.as_bytes())
        .map_err(|e| StartupError::Certificate(format!("rcgen key import failed: {e}")))?;

    let mut params = rcgen::CertificateParams::new(vec![server_name.to_string()])
        .map_err(|e| StartupError::Certificate(format!("invalid server name: {e}")))?;
    let mut dn = rcgen::DistinguishedName::new();
    dn.push(rcgen::DnType::CommonName, server_name);
    params.distinguished_name = dn;
    params.not_before = OffsetDateTime::now_utc();
    params.not_after = OffsetDateTime::now_utc() + Duration::days(365 * 10);

    let cert = params
        .self_signed(&key_pair)
        .map_err(|e| StartupError::Certificate(format!("self-signing failed: {e}")))?;

    Ok(SelfSignedCert {
        cert_der: cert.der().to_vec(),
        key_der: key_pair.serialize_der(),
    })
}
