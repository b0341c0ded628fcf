//! Error taxonomy shared by every layer of the operator.
//!
//! Each variant maps to a stable string code via [`ErrorCode`] so that
//! handlers can translate internal failures into the `{success, error}`
//! wire envelope without leaking implementation detail.

use thiserror::Error;

/// A stable, machine-comparable code for an error variant.
pub trait ErrorCode {
    fn code(&self) -> &'static str;
}

/// Errors raised talking to a single upstream chain-RPC node.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("transport error calling {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("upstream {url} returned non-2xx status {status}")]
    Status { url: String, status: u16 },

    #[error("malformed rpc reply from {url}: {reason}")]
    Decode { url: String, reason: String },

    #[error("rpc {method} timed out against {url}")]
    Timeout { url: String, method: String },

    #[error("json-rpc error from {url}: code {code}, {message}")]
    Remote {
        url: String,
        code: i64,
        message: String,
    },
}

impl ErrorCode for RpcError {
    fn code(&self) -> &'static str {
        match self {
            RpcError::Transport { .. } => "transport",
            RpcError::Status { .. } => "transport",
            RpcError::Decode { .. } => "decode",
            RpcError::Timeout { .. } => "transport",
            RpcError::Remote { .. } => "transport",
        }
    }
}

/// Errors raised fanning a read out across a quorum of node clients.
#[derive(Debug, Error)]
pub enum QuorumError {
    #[error("node {url} failed: {source}")]
    MemberFailed {
        url: String,
        #[source]
        source: RpcError,
    },

    #[error("nodes {left} and {right} disagree on the result")]
    Disagreement { left: String, right: String },

    #[error("pubkey fetched from node {id} does not hash to its on-chain pbkHash")]
    PubkeyMismatch { id: u64 },

    #[error("quorum has no member clients")]
    Empty,
}

impl ErrorCode for QuorumError {
    fn code(&self) -> &'static str {
        match self {
            QuorumError::MemberFailed { .. } => "disagreement",
            QuorumError::Disagreement { .. } => "disagreement",
            QuorumError::PubkeyMismatch { .. } => "pubkey_mismatch",
            QuorumError::Empty => "disagreement",
        }
    }
}

impl From<RpcError> for QuorumError {
    fn from(_: RpcError) -> Self {
        // Callers attach the offending url themselves via `MemberFailed`;
        // this conversion only exists so `?` works inside helpers that
        // don't yet know which member failed.
        QuorumError::Empty
    }
}

/// Errors raised loading, sealing, or using the operator's private key.
#[derive(Debug, Error)]
pub enum KeyVaultError {
    #[error("failed to read key file: {0}")]
    Io(String),

    #[error("failed to unseal key material: {0}")]
    Unseal(String),

    #[error("failed to seal key material: {0}")]
    Seal(String),

    #[error("hardware randomness source failed: {0}")]
    Rng(String),

    #[error("signing failed: {0}")]
    Sign(String),

    #[error("key file contained {found} bytes, expected {expected}")]
    BadLength { found: usize, expected: usize },

    #[error("plain-text key material is only permitted in integration-test mode")]
    PlainNotAllowed,
}

impl ErrorCode for KeyVaultError {
    fn code(&self) -> &'static str {
        "key_vault"
    }
}

/// Errors raised by the signing engine's two TTL caches and lookup logic.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no signature found")]
    CacheMiss,

    #[error("too early")]
    TooEarly,

    #[error("suspended")]
    Suspended,
}

impl ErrorCode for EngineError {
    fn code(&self) -> &'static str {
        match self {
            EngineError::CacheMiss => "cache_miss",
            EngineError::TooEarly => "too_early",
            EngineError::Suspended => "suspended",
        }
    }
}

/// Errors raised handling an inbound HTTP request.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("missing query parameter: {0}")]
    MissingParam(&'static str),

    #[error("invalid hex: {0}")]
    BadHex(String),

    #[error("invalid timestamp: {0}")]
    BadTimestamp(String),

    #[error("ts too new")]
    TsTooNew,

    #[error("ts too old")]
    TsTooOld,

    #[error("invalid signature: {0}")]
    BadSignature(String),

    #[error("not monitor")]
    NotAuthorised,

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("non-SGX mode")]
    AttestationUnavailable,

    #[error("attestation failed: {0}")]
    Attestation(String),
}

impl ErrorCode for RequestError {
    fn code(&self) -> &'static str {
        match self {
            RequestError::MissingParam(_) => "bad_request",
            RequestError::BadHex(_) => "bad_request",
            RequestError::BadTimestamp(_) => "bad_request",
            RequestError::TsTooNew => "bad_request",
            RequestError::TsTooOld => "bad_request",
            RequestError::BadSignature(_) => "bad_request",
            RequestError::NotAuthorised => "not_authorised",
            RequestError::Engine(e) => e.code(),
            RequestError::AttestationUnavailable => "attestation",
            RequestError::Attestation(_) => "attestation",
        }
    }
}

/// Fatal start-up failures; the binary entry point turns these into a
/// non-zero exit code and never serves a request.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    KeyVault(#[from] KeyVaultError),

    #[error("bootstrap node set disagreement: {0}")]
    BootstrapMismatch(String),

    #[error("failed to build bootstrap quorum client: {0}")]
    Bootstrap(String),

    #[error("failed to generate tls certificate: {0}")]
    Certificate(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T, E = anyhow::Error> = std::result::Result<T, E>;
