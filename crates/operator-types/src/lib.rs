// Path: crates/operator-types/src/lib.rs
//! Core data structures and error types for the cross-chain signing operator.
//!
//! This crate has minimal dependencies to remain stable: everything above
//! it (rpc, quorum, fleet, engine, server) depends on these types, but
//! this crate depends on nothing above it.

/// Node registry types: [`node::NodeDescriptor`], [`node::NodeSet`].
pub mod node;
/// Monitor set and suspend-authorisation bookkeeping.
pub mod monitor;
/// In-flight UTXO references grouped by category.
pub mod utxo;
/// Shared error taxonomy and the [`error::ErrorCode`] trait.
pub mod error;
/// The monotone one-shot [`suspend::SuspendFlag`].
pub mod suspend;

pub use error::{EngineError, ErrorCode, KeyVaultError, QuorumError, RequestError, RpcError, StartupError};
pub use monitor::{Address20, MonitorSet};
pub use node::{Hash32, NodeDescriptor, NodeSet};
pub use suspend::SuspendFlag;
pub use utxo::UtxoRef;

/// A secp256k1 compressed public key, 33 bytes.
pub type PublicKeyBytes = [u8; 33];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn desc(id: u64, hash_byte: u8) -> NodeDescriptor {
        NodeDescriptor {
            id,
            pbk_hash: [hash_byte; 32],
            rpc_url: format!("https://node{id}.example"),
            intro: String::new(),
        }
    }

    #[test]
    fn node_set_sorts_by_pbk_hash() {
        let set = NodeSet::new(vec![desc(2, 0xbb), desc(1, 0x11)], vec!["priv".into()]);
        assert_eq!(set.public[0].id, 1);
        assert_eq!(set.public[1].id, 2);
        assert_eq!(set.private_urls, vec!["priv".to_string()]);
    }

    #[test]
    fn node_set_equality_ignores_construction_order() {
        let a = NodeSet::new(vec![desc(1, 0x11), desc(2, 0xbb)], vec![]);
        let b = NodeSet::new(vec![desc(2, 0xbb), desc(1, 0x11)], vec![]);
        assert!(a.same_as(&b));
    }

    #[test]
    fn monitor_set_is_cumulative() {
        let mut set = MonitorSet::default();
        let mut first = BTreeSet::new();
        first.insert([1u8; 20]);
        assert!(set.observe(first));
        assert!(set.is_authorised(&[1u8; 20]));

        let mut second = BTreeSet::new();
        second.insert([2u8; 20]);
        assert!(set.observe(second));
        // [1;20] rotated off curr but must still be authorised.
        assert!(set.is_authorised(&[1u8; 20]));
        assert!(set.is_authorised(&[2u8; 20]));
        assert!(!set.curr.contains(&[1u8; 20]));
    }
}
