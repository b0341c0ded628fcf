//! Hardware randomness source.
//!
//! Inside the enclave, entropy comes from RDRAND rather than the host OS
//! — the host is untrusted and must not be able to bias key generation.
//! Each call draws a 16-bit word and retries a bounded number of times on
//! the transient "no entropy available yet" failure Intel's manual
//! documents; exhausting the retry budget is treated as fatal by the
//! caller, never silently papered over with a weaker source.

use operator_types::KeyVaultError;

const MAX_RETRIES_PER_WORD: u32 = 10;

/// Fills `buf` with RDRAND-sourced bytes.
pub fn fill_random(buf: &mut [u8]) -> Result<(), KeyVaultError> {
    let mut i = 0;
    while i < buf.len() {
        let word = rdrand16()?;
        let bytes = word.to_le_bytes();
        let take = (buf.len() - i).min(bytes.len());
        buf[i..i + take].copy_from_slice(&bytes[..take]);
        i += take;
    }
    Ok(())
}

pub fn random_32() -> Result<[u8; 32], KeyVaultError> {
    let mut out = [0u8; 32];
    fill_random(&mut out)?;
    Ok(out)
}

#[cfg(target_arch = "x86_64")]
fn rdrand16() -> Result<u16, KeyVaultError> {
    use std::arch::x86_64::_rdrand16_step;
    for _ in 0..MAX_RETRIES_PER_WORD {
        let mut val: u16 = 0;
        // SAFETY: _rdrand16_step only writes through the given pointer and
        // reports success via its return value; CPU support is assumed on
        // the enclave's x86_64 target.
        let ok = unsafe { _rdrand16_step(&mut val) };
        if ok == 1 {
            return Ok(val);
        }
    }
    Err(KeyVaultError::Rng(
        "RDRAND did not yield entropy after repeated attempts".into(),
    ))
}

#[cfg(not(target_arch = "x86_64"))]
fn rdrand16() -> Result<u16, KeyVaultError> {
    // Non-x86_64 builds only exist for local development off the
    // enclave target; fall back to the OS source rather than fail to
    // compile, but this path must never run in production.
    use rand::RngCore;
    Ok(rand::rngs::OsRng.next_u32() as u16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_requested_length() {
        let mut buf = [0u8; 37];
        fill_random(&mut buf).unwrap();
        assert!(buf.iter().any(|&b| b != 0));
    }

    #[test]
    fn random_32_is_32_bytes() {
        let a = random_32().unwrap();
        let b = random_32().unwrap();
        assert_ne!(a, b, "two draws should not collide");
    }
}
