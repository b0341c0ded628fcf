// Path: crates/operator-crypto/src/lib.rs
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Cryptographic implementations for the cross-chain signing operator:
//! hardware randomness, sealed key storage, and secp256k1 signing.

/// Hardware RDRAND entropy source.
pub mod rng;
/// Sealed on-disk envelope format (Argon2 + ChaCha20-Poly1305).
pub mod sealing;
/// Enclave-backed sealing key source (requires the `sgx` feature).
pub mod attested;
/// secp256k1 ECDSA key and signing operations.
pub mod signing;
/// The Key Vault component: load-or-generate + seal/unseal lifecycle.
pub mod key_vault;
/// RDTSC-derived monotonic "now", used for settle-delay and release-time math.
pub mod clock;

pub use clock::{Clock, FixedClock, SystemClock, TscClock};
pub use key_vault::{default_key_path, KeyVault, VaultMode};
pub use signing::{verify_ecdsa, OperatorKey};
