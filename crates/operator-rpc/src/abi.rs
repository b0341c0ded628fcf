//! Minimal ABI encode/decode for the two governance-contract calls this
//! operator makes. Nothing here is a general-purpose ABI codec; it only
//! covers `getNodeCount() -> uint256` and
//! `nodes(uint256) -> (uint256, bytes32, string, string)` encoded as a
//! flat 128-byte record.

use operator_types::{Hash32, NodeDescriptor};

pub const GET_NODE_COUNT_SELECTOR: &str = "0x39bf397e";
pub const GET_NODE_BY_IDX_SELECTOR: &str = "0x1c53c280";

/// `nodes(uint256)` call data: selector followed by the 32-byte
/// big-endian index.
pub fn encode_node_by_idx_call(idx: u64) -> String {
    let mut word = [0u8; 32];
    word[24..].copy_from_slice(&idx.to_be_bytes());
    format!("{}{}", GET_NODE_BY_IDX_SELECTOR, hex::encode(word))
}

/// Decodes an `eth_call` hex result for `getNodeCount()`: a single
/// right-aligned uint256, of which only the last 8 bytes matter for a
/// realistic node count.
pub fn decode_node_count(result_hex: &str) -> Result<u64, String> {
    let data = decode_hex_result(result_hex)?;
    if data.len() < 32 {
        return Err(format!("getNodeCount result too short: {} bytes", data.len()));
    }
    let mut be = [0u8; 8];
    be.copy_from_slice(&data[data.len() - 8..]);
    Ok(u64::from_be_bytes(be))
}

/// Decodes the flat 128-byte `nodes(uint256)` record: id (last 8 bytes
/// of word 0), pbkHash (word 1), rpcUrl (null-trimmed word 2), intro
/// (null-trimmed word 3).
pub fn decode_node_record(result_hex: &str) -> Result<NodeDescriptor, String> {
    let data = decode_hex_result(result_hex)?;
    if data.len() != 32 * 4 {
        return Err(format!(
            "invalid NodeInfo data: expected {} bytes, got {}",
            32 * 4,
            data.len()
        ));
    }

    let mut id_be = [0u8; 8];
    id_be.copy_from_slice(&data[24..32]);
    let id = u64::from_be_bytes(id_be);

    let mut pbk_hash: Hash32 = [0u8; 32];
    pbk_hash.copy_from_slice(&data[32..64]);

    let rpc_url = trim_nulls_utf8(&data[64..96]);
    let intro = trim_nulls_utf8(&data[96..128]);

    Ok(NodeDescriptor {
        id,
        pbk_hash,
        rpc_url,
        intro,
    })
}

fn trim_nulls_utf8(bytes: &[u8]) -> String {
    let end = bytes.iter().rposition(|&b| b != 0).map(|p| p + 1).unwrap_or(0);
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

fn decode_hex_result(result_hex: &str) -> Result<Vec<u8>, String> {
    let trimmed = result_hex.strip_prefix("0x").unwrap_or(result_hex);
    hex::decode(trimmed).map_err(|e| format!("invalid hex result: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_hex(id: u64, pbk_hash: [u8; 32], rpc_url: &str, intro: &str) -> String {
        let mut out = Vec::new();
        let mut id_word = [0u8; 32];
        id_word[24..].copy_from_slice(&id.to_be_bytes());
        out.extend_from_slice(&id_word);
        out.extend_from_slice(&pbk_hash);
        let mut rpc_word = [0u8; 32];
        rpc_word[..rpc_url.len()].copy_from_slice(rpc_url.as_bytes());
        out.extend_from_slice(&rpc_word);
        let mut intro_word = [0u8; 32];
        intro_word[..intro.len()].copy_from_slice(intro.as_bytes());
        out.extend_from_slice(&intro_word);
        format!("0x{}", hex::encode(out))
    }

    #[test]
    fn decode_node_count_reads_last_8_bytes() {
        let mut word = [0u8; 32];
        word[31] = 7;
        let result = format!("0x{}", hex::encode(word));
        assert_eq!(decode_node_count(&result).unwrap(), 7);
    }

    #[test]
    fn decode_node_record_roundtrips() {
        let hash = [0xab; 32];
        let hex_result = record_hex(3, hash, "https://node.example", "hello world");
        let decoded = decode_node_record(&hex_result).unwrap();
        assert_eq!(decoded.id, 3);
        assert_eq!(decoded.pbk_hash, hash);
        assert_eq!(decoded.rpc_url, "https://node.example");
        assert_eq!(decoded.intro, "hello world");
    }

    #[test]
    fn decode_node_record_rejects_bad_length() {
        assert!(decode_node_record("0x00").is_err());
    }

    #[test]
    fn encode_node_by_idx_call_pads_index() {
        let call = encode_node_by_idx_call(1);
        assert_eq!(
            call,
            format!(
                "{}{}",
                GET_NODE_BY_IDX_SELECTOR,
                "0".repeat(63) + "1"
            )
        );
    }
}
