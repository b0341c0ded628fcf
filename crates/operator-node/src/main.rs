//! Binary entry point: wires the Key Vault, Fleet Watcher, Signing
//! Engine, and attested HTTPS listener together and runs them
//! concurrently until the process is killed.

mod config;
mod fixed_bootstrap;
mod wif;

use clap::Parser;
use config::{CliOpts, Config};
use operator_attest::{AttestationAdapter, UnavailableAdapter};
use operator_crypto::{KeyVault, OperatorKey, TscClock, VaultMode};
use operator_engine::{SigningEngine, SigningEngineConfig};
use operator_fleet::{FleetWatcher, FleetWatcherConfig};
use operator_server::AppState;
use operator_types::{StartupError, SuspendFlag};
use std::process::ExitCode;
use std::sync::Arc;

#[cfg(feature = "sgx")]
fn attestation_adapter() -> Arc<dyn AttestationAdapter> {
    Arc::new(operator_attest::EnclaveAdapter)
}

#[cfg(not(feature = "sgx"))]
fn attestation_adapter() -> Arc<dyn AttestationAdapter> {
    Arc::new(UnavailableAdapter)
}

fn load_key_vault(config: &Config) -> Result<KeyVault, StartupError> {
    if let Some(wif) = &config.signer_key_wif {
        if !config.integration_test_mode {
            return Err(StartupError::Config(
                "signerKeyWIF is only honoured in integration-test mode".into(),
            ));
        }
        let secret = wif::decode_wif(wif)?;
        let key = OperatorKey::from_bytes(&secret)?;
        return Ok(KeyVault::from_key(key));
    }

    let mode = if config.integration_test_mode {
        VaultMode::Plain
    } else {
        VaultMode::Attested
    };
    Ok(KeyVault::load_or_generate(
        &operator_crypto::default_key_path(),
        mode,
        config.integration_test_mode,
    )?)
}

async fn run(config: Config) -> Result<(), StartupError> {
    let clock = Arc::new(TscClock::calibrate());
    let key_vault = Arc::new(load_key_vault(&config)?);

    let bootstrap_urls = config.effective_bootstrap_urls()?;
    let watcher = FleetWatcher::new(
        FleetWatcherConfig {
            nodes_gov_addr: config.nodes_gov_addr.clone(),
            private_urls: config.private_rpc_urls.clone(),
            per_request_timeout: config.per_request_timeout,
            tick_interval: config.fleet_tick_interval,
            settle_delay: config.settle_delay,
        },
        clock.clone(),
    );
    let fleet = watcher.bootstrap(bootstrap_urls).await?;

    let engine = Arc::new(SigningEngine::new(
        SigningEngineConfig {
            tick_interval: config.engine_tick_interval,
            redeem_publicity_period: config.redeem_publicity_period,
            convert_publicity_period: config.convert_publicity_period,
        },
        fleet.clone(),
        key_vault.clone(),
        clock.clone(),
    ));

    let listen_addr = config
        .listen_addr
        .parse()
        .map_err(|e| StartupError::Config(format!("invalid listenAddr: {e}")))?;

    let state = AppState {
        server_name: config.server_name.clone(),
        cert_der: Vec::new(),
        key_vault: key_vault.clone(),
        engine: engine.clone(),
        fleet: fleet.clone(),
        suspend: Arc::new(SuspendFlag::default()),
        attestation: attestation_adapter(),
        attestation_provider_url: config.attestation_provider_url.clone(),
        clock: clock.clone(),
    };

    let watcher = Arc::new(watcher);
    let watcher_task = {
        let fleet = fleet.clone();
        let watcher = watcher.clone();
        tokio::spawn(async move { watcher.run(fleet).await })
    };
    let engine_task = {
        let engine = engine.clone();
        tokio::spawn(async move { engine.run().await })
    };
    let server_task = tokio::spawn(async move { operator_server::run(listen_addr, state).await });

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!(event = "shutdown", reason = "ctrl-c");
            Ok(())
        }
        res = server_task => {
            match res {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => Err(e),
                Err(e) => Err(StartupError::Certificate(format!("server task panicked: {e}"))),
            }
        }
        _ = watcher_task => {
            tracing::error!(event = "shutdown", reason = "fleet watcher task exited unexpectedly");
            Ok(())
        }
        _ = engine_task => {
            tracing::error!(event = "shutdown", reason = "signing engine task exited unexpectedly");
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = operator_telemetry::init_tracing() {
        eprintln!("failed to initialise logging: {e}");
        return ExitCode::FAILURE;
    }

    let cli = CliOpts::parse();
    let config = match Config::resolve(cli) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(event = "startup_failed", error = %e);
            return ExitCode::FAILURE;
        }
    };

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(event = "startup_failed", error = %e);
            ExitCode::FAILURE
        }
    }
}
