//! On-disk envelope format for the sealed key file.
//!
//! Layout: `b"CCOP-SEAL1"` magic, one byte format version, 16-byte Argon2
//! salt, 12-byte AEAD nonce, then ciphertext||tag. The key-encryption key
//! (KEK) itself never touches disk — it's derived fresh from the sealing
//! source on every unseal.

use dcrypt::symmetric::aead::chacha20poly1305::ChaCha20Poly1305;
use dcrypt::symmetric::aead::{Aead, Nonce as AeadNonce};
use operator_types::KeyVaultError;
use zeroize::{Zeroize, ZeroizeOnDrop};

const MAGIC: &[u8; 10] = b"CCOP-SEAL1";
const VERSION: u8 = 1;
const SALT_LEN: usize = 16;
const NONCE_LEN: usize = 12;

/// Where the KEK used to seal/unseal the key file comes from. The
/// hardware-bound implementation (derive from the enclave's unique
/// identity) is an enclave SDK primitive and lives outside this crate;
/// see [`crate::attested::EnclaveSealingSource`].
pub trait SealingKeySource: Send + Sync {
    fn derive_kek(&self, salt: &[u8; SALT_LEN]) -> Result<[u8; 32], KeyVaultError>;
}

/// Zeroized container for the raw private key bytes once unsealed.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SensitiveBytes(pub Vec<u8>);

pub fn seal(
    source: &dyn SealingKeySource,
    plaintext: &[u8],
) -> Result<Vec<u8>, KeyVaultError> {
    let mut salt = [0u8; SALT_LEN];
    crate::rng::fill_random(&mut salt)?;
    let mut nonce_bytes = [0u8; NONCE_LEN];
    crate::rng::fill_random(&mut nonce_bytes)?;

    let kek = source.derive_kek(&salt)?;
    let cipher = ChaCha20Poly1305::new(&kek.into());
    let nonce = AeadNonce::from_slice(&nonce_bytes)
        .map_err(|e| KeyVaultError::Seal(format!("bad nonce: {e}")))?;
    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| KeyVaultError::Seal(format!("aead encrypt failed: {e}")))?;

    let mut out = Vec::with_capacity(MAGIC.len() + 1 + SALT_LEN + NONCE_LEN + ciphertext.len());
    out.extend_from_slice(MAGIC);
    out.push(VERSION);
    out.extend_from_slice(&salt);
    out.extend_from_slice(&nonce_bytes);
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

pub fn unseal(
    source: &dyn SealingKeySource,
    sealed: &[u8],
) -> Result<SensitiveBytes, KeyVaultError> {
    let header_len = MAGIC.len() + 1 + SALT_LEN + NONCE_LEN;
    if sealed.len() < header_len {
        return Err(KeyVaultError::Unseal("sealed file too short".into()));
    }
    if &sealed[..MAGIC.len()] != MAGIC {
        return Err(KeyVaultError::Unseal("bad magic".into()));
    }
    let version = sealed[MAGIC.len()];
    if version != VERSION {
        return Err(KeyVaultError::Unseal(format!(
            "unsupported seal version {version}"
        )));
    }
    let mut off = MAGIC.len() + 1;
    let mut salt = [0u8; SALT_LEN];
    salt.copy_from_slice(&sealed[off..off + SALT_LEN]);
    off += SALT_LEN;
    let mut nonce_bytes = [0u8; NONCE_LEN];
    nonce_bytes.copy_from_slice(&sealed[off..off + NONCE_LEN]);
    off += NONCE_LEN;
    let ciphertext = &sealed[off..];

    let kek = source.derive_kek(&salt)?;
    let cipher = ChaCha20Poly1305::new(&kek.into());
    let nonce = AeadNonce::from_slice(&nonce_bytes)
        .map_err(|e| KeyVaultError::Unseal(format!("bad nonce: {e}")))?;
    let plaintext = cipher
        .decrypt(&nonce, ciphertext)
        .map_err(|e| KeyVaultError::Unseal(format!("aead decrypt failed (wrong key or tampered file): {e}")))?;
    Ok(SensitiveBytes(plaintext))
}

/// Derives the KEK from an Argon2id hash of a fixed application-level
/// passphrase. Only suitable when a real hardware seal isn't available;
/// callers in attested builds must supply the enclave-derived source
/// instead.
pub struct PassphraseSealingSource {
    passphrase: Vec<u8>,
}

impl PassphraseSealingSource {
    pub fn new(passphrase: impl Into<Vec<u8>>) -> Self {
        PassphraseSealingSource {
            passphrase: passphrase.into(),
        }
    }
}

impl Drop for PassphraseSealingSource {
    fn drop(&mut self) {
        self.passphrase.zeroize();
    }
}

impl SealingKeySource for PassphraseSealingSource {
    fn derive_kek(&self, salt: &[u8; SALT_LEN]) -> Result<[u8; 32], KeyVaultError> {
        use argon2::{Argon2, Params, Version};
        let params = Params::new(19456, 2, 1, Some(32))
            .map_err(|e| KeyVaultError::Seal(format!("bad argon2 params: {e}")))?;
        let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params);
        let mut kek = [0u8; 32];
        argon2
            .hash_password_into(&self.passphrase, salt, &mut kek)
            .map_err(|e| KeyVaultError::Seal(format!("argon2 derivation failed: {e}")))?;
        Ok(kek)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let src = PassphraseSealingSource::new(b"test-passphrase".to_vec());
        let plaintext = b"super secret key material";
        let sealed = seal(&src, plaintext).unwrap();
        let unsealed = unseal(&src, &sealed).unwrap();
        assert_eq!(unsealed.0, plaintext);
    }

    #[test]
    fn wrong_passphrase_fails() {
        let src = PassphraseSealingSource::new(b"right".to_vec());
        let sealed = seal(&src, b"secret").unwrap();
        let wrong = PassphraseSealingSource::new(b"wrong".to_vec());
        assert!(unseal(&wrong, &sealed).is_err());
    }

    #[test]
    fn tampered_ciphertext_fails() {
        let src = PassphraseSealingSource::new(b"pw".to_vec());
        let mut sealed = seal(&src, b"secret").unwrap();
        let last = sealed.len() - 1;
        sealed[last] ^= 0xff;
        assert!(unseal(&src, &sealed).is_err());
    }

    #[test]
    fn truncated_header_fails() {
        let src = PassphraseSealingSource::new(b"pw".to_vec());
        assert!(unseal(&src, b"short").is_err());
    }
}
