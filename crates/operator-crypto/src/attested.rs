//! Enclave-backed sealing source.
//!
//! Deriving a key from the enclave's hardware identity is an enclave SDK
//! primitive — outside this crate's scope, as is remote-report generation
//! (see `operator-attest`). This module only defines the seam; an `sgx`
//! build links a real implementation in at the binary crate.

use crate::sealing::SealingKeySource;
use operator_types::KeyVaultError;

pub struct EnclaveSealingSource;

impl SealingKeySource for EnclaveSealingSource {
    #[cfg(feature = "sgx")]
    fn derive_kek(&self, _salt: &[u8; 16]) -> Result<[u8; 32], KeyVaultError> {
        Err(KeyVaultError::Seal(
            "enclave unique-key derivation is not linked into this build; provide an sgx \
             runtime implementation of EnclaveSealingSource"
                .into(),
        ))
    }

    #[cfg(not(feature = "sgx"))]
    fn derive_kek(&self, _salt: &[u8; 16]) -> Result<[u8; 32], KeyVaultError> {
        Err(KeyVaultError::Seal(
            "attested sealing requires the sgx build feature".into(),
        ))
    }
}
