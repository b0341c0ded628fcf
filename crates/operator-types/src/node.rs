//! On-chain governance node registry types.

use serde::{Deserialize, Serialize};

/// A 32-byte hash, rendered as lowercase hex without a `0x` prefix when
/// used as a cache or map key.
pub type Hash32 = [u8; 32];

/// An on-chain-registered upstream node.
///
/// Two descriptors are equal iff all four fields match. Ordering is
/// lexicographic over the pubkey hash, which is also the sort key a
/// [`NodeSet`] maintains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDescriptor {
    pub id: u64,
    pub pbk_hash: Hash32,
    pub rpc_url: String,
    pub intro: String,
}

impl PartialOrd for NodeDescriptor {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NodeDescriptor {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.pbk_hash.cmp(&other.pbk_hash)
    }
}

/// An ordered sequence of [`NodeDescriptor`]s sorted by pubkey hash, plus
/// out-of-band private URLs that are trusted by configuration and never
/// pubkey-checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct NodeSet {
    pub public: Vec<NodeDescriptor>,
    pub private_urls: Vec<String>,
}

impl NodeSet {
    pub fn new(mut public: Vec<NodeDescriptor>, private_urls: Vec<String>) -> Self {
        public.sort();
        NodeSet {
            public,
            private_urls,
        }
    }

    /// Equal iff the public node lists and private URL lists are equal;
    /// public nodes compare order-independent since both sides are kept
    /// sorted by construction.
    pub fn same_as(&self, other: &NodeSet) -> bool {
        self.public == other.public && self.private_urls == other.private_urls
    }
}
