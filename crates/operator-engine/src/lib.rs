// Path: crates/operator-engine/src/lib.rs
//! The Signing Engine: a cooperative loop that drives the live Quorum
//! Client, signs newly observed operator sighashes, records monitor
//! release times, and answers signature lookups.

pub mod caches;
pub mod engine;

pub use caches::{SigCache, TimeCache};
pub use engine::{SigningEngine, SigningEngineConfig};
