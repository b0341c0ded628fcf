//! Verification for `newFixedBootstrapUrl`: a `"url0,url1,sig"` triple
//! that replaces the compiled-in default bootstrap pair only when `sig`
//! is a valid ECDSA signature, by the network's compiled-in release
//! key, over `sha256(url0 || url1)`.

use operator_types::StartupError;
use secp256k1::ecdsa::Signature;
use secp256k1::{Message, PublicKey, Secp256k1};
use sha2::{Digest, Sha256};

/// The network's compiled-in release pubkey, used only to authorise a
/// `newFixedBootstrapUrl` override. Distinct from the operator's own
/// signing key, which lives in the Key Vault.
const RELEASE_PUBKEY: [u8; 33] = [
    0x02, 0x79, 0xbe, 0x66, 0x7e, 0xf9, 0xdc, 0xbb, 0xac, 0x55, 0xa0, 0x62, 0x95, 0xce, 0x87, 0x0b,
    0x07, 0x02, 0x9b, 0xfc, 0xdb, 0x2d, 0xce, 0x28, 0xd9, 0x59, 0xf2, 0x81, 0x5b, 0x16, 0xf8, 0x17,
    0x98,
];

pub struct FixedBootstrap {
    pub url0: String,
    pub url1: String,
}

/// Parses and verifies a `"url0,url1,sig"` triple. `sig` is hex-encoded,
/// DER or compact; verification failure is a start-up configuration
/// error, never a silent fallback to the default bootstrap pair.
pub fn parse_and_verify(triple: &str) -> Result<FixedBootstrap, StartupError> {
    let parts: Vec<&str> = triple.splitn(3, ',').collect();
    let [url0, url1, sig_hex] = parts.as_slice() else {
        return Err(StartupError::Config(
            "newFixedBootstrapUrl must be \"url0,url1,sig\"".into(),
        ));
    };

    let sig_bytes = hex::decode(sig_hex.trim_start_matches("0x"))
        .map_err(|e| StartupError::Config(format!("newFixedBootstrapUrl sig is not valid hex: {e}")))?;

    let mut hasher = Sha256::new();
    hasher.update(url0.as_bytes());
    hasher.update(url1.as_bytes());
    let digest: [u8; 32] = hasher.finalize().into();

    let secp = Secp256k1::verification_only();
    let pubkey = PublicKey::from_slice(&RELEASE_PUBKEY)
        .map_err(|e| StartupError::Config(format!("invalid compiled-in release pubkey: {e}")))?;
    let message = Message::from_digest(digest);
    let signature = Signature::from_der(&sig_bytes)
        .or_else(|_| Signature::from_compact(&sig_bytes))
        .map_err(|e| StartupError::Config(format!("newFixedBootstrapUrl sig is malformed: {e}")))?;

    secp.verify_ecdsa(&message, &signature, &pubkey)
        .map_err(|_| StartupError::Config("newFixedBootstrapUrl sig does not match the release key".into()))?;

    Ok(FixedBootstrap {
        url0: url0.to_string(),
        url1: url1.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_triple() {
        assert!(parse_and_verify("only-one-part").is_err());
    }

    #[test]
    fn rejects_bad_hex_signature() {
        assert!(parse_and_verify("https://a,https://b,not-hex").is_err());
    }

    #[test]
    fn rejects_signature_from_the_wrong_key() {
        let secp = Secp256k1::new();
        let (secret_key, _) = secp.generate_keypair(&mut rand::thread_rng());
        let mut hasher = Sha256::new();
        hasher.update(b"https://a");
        hasher.update(b"https://b");
        let digest: [u8; 32] = hasher.finalize().into();
        let sig = secp.sign_ecdsa(&Message::from_digest(digest), &secret_key);
        let triple = format!("https://a,https://b,{}", hex::encode(sig.serialize_der()));
        assert!(parse_and_verify(&triple).is_err());
    }
}
