//! The Signing Engine: drives the live Quorum Client, mints signatures
//! for newly observed operator sighashes, and records monitor-observed
//! release times.

use crate::caches::{SigCache, TimeCache};
use operator_crypto::{Clock, KeyVault};
use operator_fleet::FleetState;
use operator_types::{EngineError, Hash32};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, warn};

pub struct SigningEngineConfig {
    pub tick_interval: Duration,
    pub redeem_publicity_period: Duration,
    pub convert_publicity_period: Duration,
}

pub struct SigningEngine {
    config: SigningEngineConfig,
    fleet: Arc<FleetState>,
    key_vault: Arc<KeyVault>,
    clock: Arc<dyn Clock>,
    sig_cache: SigCache,
    time_cache: TimeCache,
}

fn hex_key(hash: &Hash32) -> String {
    hex::encode(hash)
}

impl SigningEngine {
    pub fn new(
        config: SigningEngineConfig,
        fleet: Arc<FleetState>,
        key_vault: Arc<KeyVault>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        SigningEngine {
            config,
            fleet,
            key_vault,
            clock,
            sig_cache: SigCache::new(),
            time_cache: TimeCache::new(),
        }
    }

    pub async fn run(&self) {
        let mut interval = tokio::time::interval(self.config.tick_interval);
        loop {
            interval.tick().await;
            self.tick().await;
        }
    }

    pub async fn tick(&self) {
        if let Err(e) = self.tick_operators().await {
            warn!(error = %e, "signing engine skipped this tick's operator-side work");
        }
        if let Err(e) = self.tick_monitors().await {
            warn!(error = %e, "signing engine skipped this tick's monitor-side work");
        }
    }

    async fn tick_operators(&self) -> Result<(), anyhow::Error> {
        let cluster = self.fleet.current().await;
        let redeeming = cluster
            .get(|c| async move { c.get_redeeming_utxos_for_operators().await })
            .await?;
        let converting = cluster
            .get(|c| async move { c.get_to_be_converted_utxos_for_operators().await })
            .await?;

        let mut op_set: HashSet<Hash32> = HashSet::new();
        op_set.extend(redeeming.iter().map(|u| u.tx_sig_hash));
        op_set.extend(converting.iter().map(|u| u.tx_sig_hash));

        for hash in op_set {
            let key = hex_key(&hash);
            if self.sig_cache.contains(&key).await {
                continue;
            }
            match self.key_vault.sign_ecdsa(&hash) {
                Ok(sig) => self.sig_cache.insert(key, sig).await,
                Err(e) => {
                    // One bad sighash must not halt the loop; best-effort
                    // per sighash, logged and skipped.
                    error!(sighash = %key, error = %e, "failed to sign sighash, continuing");
                }
            }
        }
        Ok(())
    }

    async fn tick_monitors(&self) -> Result<(), anyhow::Error> {
        let cluster = self.fleet.current().await;
        let redeem_mo = cluster
            .get(|c| async move { c.get_redeeming_utxos_for_monitors().await })
            .await?;
        let convert_mo = cluster
            .get(|c| async move { c.get_to_be_converted_utxos_for_monitors().await })
            .await?;

        let now = self.clock.now_unix();
        for utxo in redeem_mo {
            let key = hex_key(&utxo.tx_sig_hash);
            if !self.time_cache.contains(&key).await {
                self.time_cache
                    .insert(key, now + self.config.redeem_publicity_period.as_secs())
                    .await;
            }
        }
        for utxo in convert_mo {
            let key = hex_key(&utxo.tx_sig_hash);
            if !self.time_cache.contains(&key).await {
                self.time_cache
                    .insert(key, now + self.config.convert_publicity_period.as_secs())
                    .await;
            }
        }
        Ok(())
    }

    /// Strips `0x`, lowercases, and looks the sighash up in both caches.
    /// A miss in either cache collapses to the same [`EngineError::CacheMiss`]
    /// by design — an unknown sighash and one the operator simply hasn't
    /// seen on the monitor-side list yet are indistinguishable to a caller.
    pub async fn get_signature(&self, hash_hex: &str) -> Result<Vec<u8>, EngineError> {
        let key = hash_hex.trim_start_matches("0x").to_lowercase();

        let sig = self.sig_cache.get(&key).await.ok_or(EngineError::CacheMiss)?;
        let release_at = self.time_cache.get(&key).await.ok_or(EngineError::CacheMiss)?;

        if self.clock.now_unix() < release_at {
            return Err(EngineError::TooEarly);
        }

        Ok(sig)
    }

    pub fn sig_cache(&self) -> &SigCache {
        &self.sig_cache
    }

    pub fn time_cache(&self) -> &TimeCache {
        &self.time_cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use operator_crypto::{FixedClock, VaultMode};
    use operator_quorum::ClusterClient;
    use operator_types::NodeSet;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn dummy_engine(clock: Arc<FixedClock>) -> (SigningEngine, tempfile::TempDir) {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": []
            })))
            .mount(&server)
            .await;
        let node_set = NodeSet::new(vec![], vec![server.uri()]);
        let cluster = ClusterClient::build(node_set, "0x0", Duration::from_secs(1))
            .await
            .unwrap();
        let fleet = FleetState::new(cluster);

        let dir = tempfile::tempdir().unwrap();
        let key_path = dir.path().join("key.bin");
        let key_vault = Arc::new(
            KeyVault::load_or_generate(&key_path, VaultMode::Plain, true).unwrap(),
        );

        let config = SigningEngineConfig {
            tick_interval: Duration::from_secs(3600),
            redeem_publicity_period: Duration::from_secs(25),
            convert_publicity_period: Duration::from_secs(100),
        };
        (SigningEngine::new(config, fleet, key_vault, clock), dir)
    }

    #[tokio::test]
    async fn unknown_sighash_is_a_cache_miss() {
        let (engine, _dir) = dummy_engine(Arc::new(FixedClock::new(1_000))).await;
        let err = engine.get_signature("aa").await.unwrap_err();
        assert!(matches!(err, EngineError::CacheMiss));
    }

    #[tokio::test]
    async fn present_before_release_time_is_too_early() {
        let clock = Arc::new(FixedClock::new(1_000));
        let (engine, _dir) = dummy_engine(clock.clone()).await;
        engine.sig_cache().insert("aa".into(), vec![9, 9]).await;
        engine.time_cache().insert("aa".into(), 1_025).await;

        let err = engine.get_signature("0xAA").await.unwrap_err();
        assert!(matches!(err, EngineError::TooEarly));

        clock.set(1_025);
        let sig = engine.get_signature("0xAA").await.unwrap();
        assert_eq!(sig, vec![9, 9]);
    }

    #[tokio::test]
    async fn sig_without_time_cache_entry_is_still_a_cache_miss() {
        let (engine, _dir) = dummy_engine(Arc::new(FixedClock::new(1_000))).await;
        engine.sig_cache().insert("aa".into(), vec![1]).await;
        let err = engine.get_signature("aa").await.unwrap_err();
        assert!(matches!(err, EngineError::CacheMiss));
    }
}
