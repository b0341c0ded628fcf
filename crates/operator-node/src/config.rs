//! Configuration surface: CLI flags layered over an optional TOML file,
//! matching the precedence the rest of the fleet's binaries use
//! (flag > file > built-in default).

use clap::Parser;
use operator_types::StartupError;
use serde::Deserialize;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "cc-operator", about = "Cross-chain signing operator")]
pub struct CliOpts {
    /// Path to a TOML file providing defaults for any flag left unset.
    #[clap(long)]
    pub config: Option<String>,

    #[clap(long)]
    pub server_name: Option<String>,

    #[clap(long)]
    pub listen_addr: Option<String>,

    #[clap(long)]
    pub nodes_gov_addr: Option<String>,

    /// Comma-separated bootstrap URLs, cross-checked against themselves
    /// at start-up before anything is trusted.
    #[clap(long, value_delimiter = ',')]
    pub bootstrap_rpc_urls: Vec<String>,

    /// Comma-separated additional URLs mixed into every cluster without
    /// an on-chain pubkey to verify against.
    #[clap(long, value_delimiter = ',')]
    pub private_rpc_urls: Vec<String>,

    /// Only honoured when `--integration-test-mode` is also set.
    #[clap(long)]
    pub signer_key_wif: Option<String>,

    /// `"url0,url1,sig"`; replaces the configured bootstrap URLs when the
    /// signature verifies against the compiled-in release key.
    #[clap(long)]
    pub new_fixed_bootstrap_url: Option<String>,

    #[clap(long)]
    pub integration_test_mode: bool,

    #[clap(long)]
    pub engine_tick_interval_secs: Option<u64>,

    #[clap(long)]
    pub fleet_tick_interval_secs: Option<u64>,

    #[clap(long)]
    pub settle_delay_secs: Option<u64>,

    #[clap(long)]
    pub redeem_publicity_period_secs: Option<u64>,

    #[clap(long)]
    pub convert_publicity_period_secs: Option<u64>,

    #[clap(long)]
    pub per_request_timeout_secs: Option<u64>,

    #[clap(long)]
    pub attestation_provider_url: Option<String>,
}

#[derive(Deserialize, Default)]
struct FileConfig {
    server_name: Option<String>,
    listen_addr: Option<String>,
    nodes_gov_addr: Option<String>,
    #[serde(default)]
    bootstrap_rpc_urls: Vec<String>,
    #[serde(default)]
    private_rpc_urls: Vec<String>,
    signer_key_wif: Option<String>,
    new_fixed_bootstrap_url: Option<String>,
    #[serde(default)]
    integration_test_mode: bool,
    engine_tick_interval_secs: Option<u64>,
    fleet_tick_interval_secs: Option<u64>,
    settle_delay_secs: Option<u64>,
    redeem_publicity_period_secs: Option<u64>,
    convert_publicity_period_secs: Option<u64>,
    per_request_timeout_secs: Option<u64>,
    attestation_provider_url: Option<String>,
}

pub struct Config {
    pub server_name: String,
    pub listen_addr: String,
    pub nodes_gov_addr: String,
    pub bootstrap_rpc_urls: Vec<String>,
    pub private_rpc_urls: Vec<String>,
    pub signer_key_wif: Option<String>,
    pub new_fixed_bootstrap_url: Option<String>,
    pub integration_test_mode: bool,
    pub engine_tick_interval: Duration,
    pub fleet_tick_interval: Duration,
    pub settle_delay: Duration,
    pub redeem_publicity_period: Duration,
    pub convert_publicity_period: Duration,
    pub per_request_timeout: Duration,
    pub attestation_provider_url: String,
}

const DEFAULT_ENGINE_TICK_INTERVAL_SECS: u64 = 10;
const DEFAULT_FLEET_TICK_INTERVAL_SECS: u64 = 6 * 60;
const DEFAULT_SETTLE_DELAY_SECS: u64 = 6 * 60 * 60;
const DEFAULT_REDEEM_PUBLICITY_SECS: u64 = 25 * 60;
const DEFAULT_CONVERT_PUBLICITY_SECS: u64 = 100 * 60;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 5 * 60;
const DEFAULT_ATTESTATION_PROVIDER_URL: &str = "https://shareduks.uks.attest.azure.net";

impl Config {
    pub fn resolve(cli: CliOpts) -> Result<Self, StartupError> {
        let file = match &cli.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .map_err(|e| StartupError::Config(format!("failed to read {path}: {e}")))?;
                toml::from_str(&text)
                    .map_err(|e| StartupError::Config(format!("failed to parse {path}: {e}")))?
            }
            None => FileConfig::default(),
        };

        let server_name = cli
            .server_name
            .or(file.server_name)
            .ok_or_else(|| StartupError::Config("serverName is required".into()))?;
        let listen_addr = cli
            .listen_addr
            .or(file.listen_addr)
            .ok_or_else(|| StartupError::Config("listenAddr is required".into()))?;
        let nodes_gov_addr = cli
            .nodes_gov_addr
            .or(file.nodes_gov_addr)
            .ok_or_else(|| StartupError::Config("nodesGovAddr is required".into()))?;

        let bootstrap_rpc_urls = if !cli.bootstrap_rpc_urls.is_empty() {
            cli.bootstrap_rpc_urls
        } else {
            file.bootstrap_rpc_urls
        };
        let private_rpc_urls = if !cli.private_rpc_urls.is_empty() {
            cli.private_rpc_urls
        } else {
            file.private_rpc_urls
        };

        let integration_test_mode = cli.integration_test_mode || file.integration_test_mode;
        let signer_key_wif = cli.signer_key_wif.or(file.signer_key_wif);
        let new_fixed_bootstrap_url = cli.new_fixed_bootstrap_url.or(file.new_fixed_bootstrap_url);

        Ok(Config {
            server_name,
            listen_addr,
            nodes_gov_addr,
            bootstrap_rpc_urls,
            private_rpc_urls,
            signer_key_wif,
            new_fixed_bootstrap_url,
            integration_test_mode,
            engine_tick_interval: Duration::from_secs(
                cli.engine_tick_interval_secs
                    .or(file.engine_tick_interval_secs)
                    .unwrap_or(DEFAULT_ENGINE_TICK_INTERVAL_SECS),
            ),
            fleet_tick_interval: Duration::from_secs(
                cli.fleet_tick_interval_secs
                    .or(file.fleet_tick_interval_secs)
                    .unwrap_or(DEFAULT_FLEET_TICK_INTERVAL_SECS),
            ),
            settle_delay: Duration::from_secs(
                cli.settle_delay_secs
                    .or(file.settle_delay_secs)
                    .unwrap_or(DEFAULT_SETTLE_DELAY_SECS),
            ),
            redeem_publicity_period: Duration::from_secs(
                cli.redeem_publicity_period_secs
                    .or(file.redeem_publicity_period_secs)
                    .unwrap_or(DEFAULT_REDEEM_PUBLICITY_SECS),
            ),
            convert_publicity_period: Duration::from_secs(
                cli.convert_publicity_period_secs
                    .or(file.convert_publicity_period_secs)
                    .unwrap_or(DEFAULT_CONVERT_PUBLICITY_SECS),
            ),
            per_request_timeout: Duration::from_secs(
                cli.per_request_timeout_secs
                    .or(file.per_request_timeout_secs)
                    .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            ),
            attestation_provider_url: cli
                .attestation_provider_url
                .or(file.attestation_provider_url)
                .unwrap_or_else(|| DEFAULT_ATTESTATION_PROVIDER_URL.to_string()),
        })
    }

    /// The bootstrap URLs actually used at start-up: a verified
    /// `newFixedBootstrapUrl` overrides the configured list outright.
    pub fn effective_bootstrap_urls(&self) -> Result<Vec<String>, StartupError> {
        if let Some(triple) = &self.new_fixed_bootstrap_url {
            let fixed = crate::fixed_bootstrap::parse_and_verify(triple)?;
            return Ok(vec![fixed.url0, fixed.url1]);
        }
        if self.bootstrap_rpc_urls.is_empty() {
            return Err(StartupError::Config("bootstrapRpcURLs is required".into()));
        }
        Ok(self.bootstrap_rpc_urls.clone())
    }
}
