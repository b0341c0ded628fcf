//! Wallet Import Format decoding for `signerKeyWIF`. Only reachable in
//! integration-test mode; a production deployment always generates or
//! loads a sealed key through the [`operator_crypto::KeyVault`].

use operator_types::StartupError;
use sha2::{Digest, Sha256};

/// Decodes a base58check WIF string into its 32-byte secret key,
/// accepting both the compressed (0x01 suffix) and uncompressed
/// encodings. The version byte itself isn't checked against a specific
/// network id: this binary only ever talks to one chain's key space.
pub fn decode_wif(wif: &str) -> Result<[u8; 32], StartupError> {
    let raw = bs58::decode(wif)
        .into_vec()
        .map_err(|e| StartupError::Config(format!("signerKeyWIF is not valid base58: {e}")))?;

    if raw.len() != 37 && raw.len() != 38 {
        return Err(StartupError::Config(format!(
            "signerKeyWIF decoded to {} bytes, expected 37 (uncompressed) or 38 (compressed)",
            raw.len()
        )));
    }

    let (payload, checksum) = raw.split_at(raw.len() - 4);
    let expected: [u8; 4] = {
        let first = Sha256::digest(payload);
        let second = Sha256::digest(first);
        second[..4].try_into().expect("sha256 digest is 32 bytes")
    };
    if checksum != expected {
        return Err(StartupError::Config("signerKeyWIF checksum mismatch".into()));
    }

    // payload = version byte || 32-byte secret || optional compressed flag
    let secret = &payload[1..33];
    if payload.len() == 34 && payload[33] != 0x01 {
        return Err(StartupError::Config(
            "signerKeyWIF has an extra trailing byte that isn't the compressed-key marker".into(),
        ));
    }

    secret
        .try_into()
        .map_err(|_| StartupError::Config("signerKeyWIF secret key has the wrong length".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_wif(secret: &[u8; 32], compressed: bool) -> String {
        let mut payload = vec![0x80u8];
        payload.extend_from_slice(secret);
        if compressed {
            payload.push(0x01);
        }
        let first = Sha256::digest(&payload);
        let second = Sha256::digest(first);
        payload.extend_from_slice(&second[..4]);
        bs58::encode(payload).into_string()
    }

    #[test]
    fn roundtrips_compressed() {
        let secret = [7u8; 32];
        let wif = encode_wif(&secret, true);
        assert_eq!(decode_wif(&wif).unwrap(), secret);
    }

    #[test]
    fn roundtrips_uncompressed() {
        let secret = [9u8; 32];
        let wif = encode_wif(&secret, false);
        assert_eq!(decode_wif(&wif).unwrap(), secret);
    }

    #[test]
    fn rejects_bad_checksum() {
        let secret = [1u8; 32];
        let mut wif = encode_wif(&secret, true);
        wif.pop();
        wif.push(if wif.ends_with('1') { '2' } else { '1' });
        assert!(decode_wif(&wif).is_err());
    }
}
