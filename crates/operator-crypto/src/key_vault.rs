//! Key Vault: load-or-generate the operator's secp256k1 key and seal it
//! under the enclave's unique key between restarts.

use crate::attested::EnclaveSealingSource;
use crate::sealing::{self, PassphraseSealingSource, SealingKeySource};
use crate::signing::OperatorKey;
use operator_types::{KeyVaultError, PublicKeyBytes};
use std::path::{Path, PathBuf};
use tracing::info;

/// `Attested` seals the key file with the enclave's unique key and
/// refuses to operate on a plain-text key. `Plain` is test-only: the key
/// file is the raw 32 bytes, unsealed.
pub enum VaultMode {
    Attested,
    Plain,
}

pub struct KeyVault {
    key: OperatorKey,
}

impl KeyVault {
    /// Loads the key at `path`, or generates and persists a fresh one if
    /// the file doesn't exist yet. `integration_test_mode` must be true to
    /// use [`VaultMode::Plain`]; attempting plain mode outside test mode
    /// is a configuration error, not a silent fallback.
    pub fn load_or_generate(
        path: &Path,
        mode: VaultMode,
        integration_test_mode: bool,
    ) -> Result<Self, KeyVaultError> {
        if matches!(mode, VaultMode::Plain) && !integration_test_mode {
            return Err(KeyVaultError::PlainNotAllowed);
        }

        match std::fs::read(path) {
            Ok(data) => {
                let raw = match mode {
                    VaultMode::Attested => {
                        let src = EnclaveSealingSource;
                        sealing::unseal(&src, &data)?.0
                    }
                    VaultMode::Plain => data,
                };
                let key = OperatorKey::from_bytes(&raw)?;
                info!(path = %path.display(), "loaded key from file");
                Ok(KeyVault { key })
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("no key file at {}, generating a new key", path.display());
                let key = OperatorKey::generate()?;
                Self::persist(&key, path, &mode)?;
                Ok(KeyVault { key })
            }
            Err(e) => Err(KeyVaultError::Io(e.to_string())),
        }
    }

    fn persist(key: &OperatorKey, path: &Path, mode: &VaultMode) -> Result<(), KeyVaultError> {
        let raw = key.serialize_secret();
        let bytes = match mode {
            VaultMode::Attested => {
                let src = EnclaveSealingSource;
                sealing::seal(&src, &raw)?
            }
            VaultMode::Plain => raw.to_vec(),
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| KeyVaultError::Io(e.to_string()))?;
        }
        std::fs::write(path, bytes).map_err(|e| KeyVaultError::Io(e.to_string()))?;
        info!(path = %path.display(), "saved key to file");
        Ok(())
    }

    /// Wraps an already-decoded key directly, bypassing the file store.
    /// Used for the `signerKeyWIF` integration-test affordance, where the
    /// secret arrives on the command line rather than from a sealed file.
    pub fn from_key(key: OperatorKey) -> Self {
        KeyVault { key }
    }

    pub fn public_key(&self) -> PublicKeyBytes {
        self.key.public_key_bytes()
    }

    pub fn sign_ecdsa(&self, sighash: &[u8; 32]) -> Result<Vec<u8>, KeyVaultError> {
        self.key.sign_ecdsa(sighash)
    }
}

/// A [`KeyVault`] variant sealed with an application passphrase rather
/// than the enclave's unique key, used in integration tests that want
/// seal/unseal coverage without an enclave runtime. Not reachable from
/// [`KeyVault::load_or_generate`]; constructed directly by test harnesses.
pub fn load_or_generate_with_passphrase(
    path: &Path,
    passphrase: &[u8],
) -> Result<OperatorKey, KeyVaultError> {
    let source = PassphraseSealingSource::new(passphrase.to_vec());
    match std::fs::read(path) {
        Ok(data) => {
            let raw = sealing::unseal(&source, &data)?.0;
            OperatorKey::from_bytes(&raw)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            let key = OperatorKey::generate()?;
            let sealed = sealing::seal(&source, &key.serialize_secret())?;
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| KeyVaultError::Io(e.to_string()))?;
            }
            std::fs::write(path, sealed).map_err(|e| KeyVaultError::Io(e.to_string()))?;
            Ok(key)
        }
        Err(e) => Err(KeyVaultError::Io(e.to_string())),
    }
}

pub fn default_key_path() -> PathBuf {
    PathBuf::from("/data/key.bin")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn plain_mode_generates_and_reloads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("key.bin");

        let vault1 = KeyVault::load_or_generate(&path, VaultMode::Plain, true).unwrap();
        let pk1 = vault1.public_key();

        let vault2 = KeyVault::load_or_generate(&path, VaultMode::Plain, true).unwrap();
        let pk2 = vault2.public_key();

        assert_eq!(pk1, pk2, "reloading must return the same public key");
    }

    #[test]
    fn plain_mode_refused_outside_test_mode() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("key.bin");
        assert!(KeyVault::load_or_generate(&path, VaultMode::Plain, false).is_err());
    }

    #[test]
    fn passphrase_sealing_roundtrips_across_restart() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("key.sealed");
        let k1 = load_or_generate_with_passphrase(&path, b"hunter2").unwrap();
        let k2 = load_or_generate_with_passphrase(&path, b"hunter2").unwrap();
        assert_eq!(k1.public_key_bytes(), k2.public_key_bytes());
    }
}
