//! In-flight cross-chain UTXOs awaiting an operator or monitor signature.

use crate::node::Hash32;
use serde::{Deserialize, Serialize};

/// Opaque to the operator beyond the sighash it carries; any other
/// upstream-side fields are dropped at the RPC boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtxoRef {
    pub tx_sig_hash: Hash32,
}

impl UtxoRef {
    pub fn sig_hash_hex(&self) -> String {
        hex::encode(self.tx_sig_hash)
    }
}
