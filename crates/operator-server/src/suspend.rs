//! Monitor-authenticated suspend protocol.
//!
//! `personal_sign_hash("0x" + lower_hex(pubkey) + "," + decimal_ts)`
//! where `personal_sign_hash(m) = keccak256("\x19Ethereum Signed
//! Message:\n" + len(m) + m)`. The signature is 65 bytes `r||s||v`.

use operator_types::Address20;
use sha3::{Digest, Keccak256};

/// Builds the exact message bytes a monitor signs, given the operator's
/// compressed pubkey and the Unix-second timestamp.
pub fn suspend_message(pubkey: &[u8], ts: i64) -> String {
    format!("0x{}", hex::encode(pubkey)) + "," + &ts.to_string()
}

fn personal_sign_hash(message: &str) -> [u8; 32] {
    let prefix = format!("\x19Ethereum Signed Message:\n{}", message.len());
    let mut hasher = Keccak256::new();
    hasher.update(prefix.as_bytes());
    hasher.update(message.as_bytes());
    hasher.finalize().into()
}

/// Recovers the Ethereum-style address that produced `sig_65` over
/// `message`. `sig_65` is `r (32) || s (32) || v (1)`, `v` either `0/1`
/// or the Ethereum-legacy `27/28`.
pub fn recover_signer(message: &str, sig_65: &[u8]) -> Result<Address20, String> {
    if sig_65.len() != 65 {
        return Err("invalid signature length".to_string());
    }
    let hash = personal_sign_hash(message);

    let v = sig_65[64];
    let recovery_id = match v {
        0 | 1 => v,
        27 | 28 => v - 27,
        _ => return Err(format!("invalid recovery id: {v}")),
    };
    let rec_id = secp256k1::ecdsa::RecoveryId::from_i32(recovery_id as i32)
        .map_err(|e| format!("invalid recovery id: {e}"))?;

    let rec_sig = secp256k1::ecdsa::RecoverableSignature::from_compact(&sig_65[..64], rec_id)
        .map_err(|e| format!("invalid signature: {e}"))?;

    let secp = secp256k1::Secp256k1::verification_only();
    let msg = secp256k1::Message::from_digest(hash);
    let pubkey = secp
        .recover_ecdsa(&msg, &rec_sig)
        .map_err(|e| format!("signature recovery failed: {e}"))?;

    let uncompressed = pubkey.serialize_uncompressed();
    // Ethereum address: last 20 bytes of keccak256 of the 64-byte
    // uncompressed public key (dropping the leading 0x04 tag byte).
    let hash = Keccak256::digest(&uncompressed[1..]);
    let mut addr = [0u8; 20];
    addr.copy_from_slice(&hash[12..32]);
    Ok(addr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secp256k1::{Secp256k1, SecretKey};

    #[test]
    fn recovers_the_signing_key_address() {
        let secp = Secp256k1::new();
        let secret = SecretKey::from_slice(&[7u8; 32]).unwrap();
        let pubkey = secp256k1::PublicKey::from_secret_key(&secp, &secret);

        let message = suspend_message(&pubkey.serialize(), 1_700_000_000);
        let hash = personal_sign_hash(&message);
        let msg = secp256k1::Message::from_digest(hash);
        let (rec_id, compact) = secp.sign_ecdsa_recoverable(&msg, &secret).serialize_compact();

        let mut sig_65 = [0u8; 65];
        sig_65[..64].copy_from_slice(&compact);
        sig_65[64] = rec_id.to_i32() as u8;

        let uncompressed = pubkey.serialize_uncompressed();
        let expected_hash = Keccak256::digest(&uncompressed[1..]);
        let mut expected_addr = [0u8; 20];
        expected_addr.copy_from_slice(&expected_hash[12..32]);

        let recovered = recover_signer(&message, &sig_65).unwrap();
        assert_eq!(recovered, expected_addr);
    }

    #[test]
    fn rejects_wrong_length_signature() {
        assert!(recover_signer("msg", &[0u8; 64]).is_err());
    }
}
