//! secp256k1 ECDSA over pre-computed sighashes.
//!
//! The signing primitive itself is out of this crate's scope to
//! reimplement; we depend on the `secp256k1` crate for the curve
//! arithmetic and only own the key lifecycle and wire encoding around it.

use operator_types::{KeyVaultError, PublicKeyBytes};
use secp256k1::{
    ecdsa::Signature as EcdsaSignature, Message, PublicKey, Secp256k1, SecretKey,
};
use zeroize::{Zeroize, ZeroizeOnDrop};

#[derive(ZeroizeOnDrop)]
pub struct OperatorKey {
    #[zeroize(skip)]
    secp: Secp256k1<secp256k1::All>,
    secret: SecretKeyBytes,
    #[zeroize(skip)]
    public: PublicKey,
}

#[derive(Zeroize)]
struct SecretKeyBytes([u8; 32]);

impl OperatorKey {
    pub fn from_bytes(raw: &[u8]) -> Result<Self, KeyVaultError> {
        if raw.len() != 32 {
            return Err(KeyVaultError::BadLength {
                found: raw.len(),
                expected: 32,
            });
        }
        let secp = Secp256k1::new();
        let secret = SecretKey::from_slice(raw)
            .map_err(|e| KeyVaultError::Sign(format!("invalid secret key: {e}")))?;
        let public = PublicKey::from_secret_key(&secp, &secret);
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(raw);
        Ok(OperatorKey {
            secp,
            secret: SecretKeyBytes(bytes),
            public,
        })
    }

    pub fn generate() -> Result<Self, KeyVaultError> {
        let raw = crate::rng::random_32()?;
        Self::from_bytes(&raw)
    }

    pub fn serialize_secret(&self) -> [u8; 32] {
        self.secret.0
    }

    /// Compressed 33-byte secp256k1 point.
    pub fn public_key_bytes(&self) -> PublicKeyBytes {
        self.public.serialize()
    }

    /// Standard DER-encoded ECDSA signature over a 32-byte sighash, the
    /// redeem-tx encoding relayers expect.
    pub fn sign_ecdsa(&self, sighash: &[u8; 32]) -> Result<Vec<u8>, KeyVaultError> {
        let msg = Message::from_digest(*sighash);
        let secret = SecretKey::from_slice(&self.secret.0)
            .map_err(|e| KeyVaultError::Sign(format!("invalid secret key: {e}")))?;
        let sig = self.secp.sign_ecdsa(&msg, &secret);
        Ok(sig.serialize_der().to_vec())
    }
}

/// Verifies a DER-encoded ECDSA signature against a compressed pubkey and
/// a 32-byte sighash; used by tests and by monitor-signature recovery
/// paths that want an explicit verify rather than recover.
pub fn verify_ecdsa(
    pubkey: &PublicKeyBytes,
    sighash: &[u8; 32],
    der_sig: &[u8],
) -> Result<(), KeyVaultError> {
    let secp = Secp256k1::verification_only();
    let pk = PublicKey::from_slice(pubkey)
        .map_err(|e| KeyVaultError::Sign(format!("invalid pubkey: {e}")))?;
    let sig = EcdsaSignature::from_der(der_sig)
        .map_err(|e| KeyVaultError::Sign(format!("invalid der signature: {e}")))?;
    let msg = Message::from_digest(*sighash);
    secp.verify_ecdsa(&msg, &sig, &pk)
        .map_err(|e| KeyVaultError::Sign(format!("signature verification failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_then_verify_roundtrip() {
        let key = OperatorKey::generate().unwrap();
        let sighash = [7u8; 32];
        let sig = key.sign_ecdsa(&sighash).unwrap();
        verify_ecdsa(&key.public_key_bytes(), &sighash, &sig).unwrap();
    }

    #[test]
    fn verify_rejects_wrong_sighash() {
        let key = OperatorKey::generate().unwrap();
        let sig = key.sign_ecdsa(&[1u8; 32]).unwrap();
        assert!(verify_ecdsa(&key.public_key_bytes(), &[2u8; 32], &sig).is_err());
    }

    #[test]
    fn from_bytes_rejects_bad_length() {
        assert!(OperatorKey::from_bytes(&[1u8; 31]).is_err());
    }
}
