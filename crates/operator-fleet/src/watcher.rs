//! The Fleet Watcher: periodically re-reads the governance node list and
//! rotates the trusted cluster after a settle delay.

use crate::state::FleetState;
use operator_crypto::Clock;
use operator_quorum::ClusterClient;
use operator_types::{NodeSet, StartupError};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

pub struct FleetWatcherConfig {
    pub nodes_gov_addr: String,
    pub private_urls: Vec<String>,
    pub per_request_timeout: Duration,
    pub tick_interval: Duration,
    pub settle_delay: Duration,
}

pub struct FleetWatcher {
    config: FleetWatcherConfig,
    clock: Arc<dyn Clock>,
}

impl FleetWatcher {
    pub fn new(config: FleetWatcherConfig, clock: Arc<dyn Clock>) -> Self {
        FleetWatcher { config, clock }
    }

    /// Start-up bootstrap: build a cluster from the configured bootstrap
    /// URLs, ask it for the governance node list, then build a second,
    /// independent cluster from that list and ask *it* for the node list
    /// again. The two must agree, or start-up is refused — a bootstrap
    /// URL that lies about the node set must not be trusted silently.
    pub async fn bootstrap(
        &self,
        bootstrap_urls: Vec<String>,
    ) -> Result<Arc<FleetState>, StartupError> {
        let bootstrap_set = NodeSet::new(vec![], bootstrap_urls);
        let bootstrap_cluster =
            ClusterClient::build(bootstrap_set, &self.config.nodes_gov_addr, self.config.per_request_timeout)
                .await
                .map_err(|e| StartupError::Bootstrap(e.to_string()))?;

        let first_nodes = bootstrap_cluster
            .get(|c| async move { c.get_sbchd_nodes().await })
            .await
            .map_err(|e| StartupError::Bootstrap(e.to_string()))?;
        let first_set = NodeSet::new(first_nodes, self.config.private_urls.clone());

        let fresh_cluster = ClusterClient::build(
            first_set.clone(),
            &self.config.nodes_gov_addr,
            self.config.per_request_timeout,
        )
        .await
        .map_err(|e| StartupError::Bootstrap(e.to_string()))?;

        let second_nodes = fresh_cluster
            .get(|c| async move { c.get_sbchd_nodes().await })
            .await
            .map_err(|e| StartupError::Bootstrap(e.to_string()))?;
        let second_set = NodeSet::new(second_nodes, self.config.private_urls.clone());

        if !first_set.same_as(&second_set) {
            return Err(StartupError::BootstrapMismatch(format!(
                "bootstrap node set ({} nodes) disagrees with the fresh cluster's own node set ({} nodes)",
                first_set.public.len(),
                second_set.public.len()
            )));
        }

        info!(nodes = first_set.public.len(), "bootstrap node set confirmed");
        Ok(FleetState::new(fresh_cluster))
    }

    /// Runs the watch loop until the process exits. Construction
    /// failures never stop the loop: they're logged and retried at the
    /// next tick, per the component's failure-semantics contract.
    pub async fn run(&self, state: Arc<FleetState>) {
        let mut interval = tokio::time::interval(self.config.tick_interval);
        loop {
            interval.tick().await;
            if let Err(e) = self.tick(&state).await {
                error!(error = %e, "fleet watcher tick failed, retrying next interval");
            }
        }
    }

    pub async fn tick(&self, state: &FleetState) -> Result<(), anyhow::Error> {
        let current = state.current().await;

        // Step 1: refresh the monitor set.
        match current.get(|c| async move { c.get_monitors().await }).await {
            Ok(monitors) => {
                let set: std::collections::BTreeSet<[u8; 20]> = monitors.into_iter().collect();
                state.observe_monitors(set).await;
            }
            Err(e) => warn!(error = %e, "failed to refresh monitor set this tick"),
        }

        // Step 2: refresh the node list and decide STEADY/PENDING.
        let latest_nodes = current
            .get(|c| async move { c.get_sbchd_nodes().await })
            .await?;
        let latest_set = NodeSet::new(latest_nodes, self.config.private_urls.clone());

        let candidate_set = state.candidate_node_set().await;
        let current_set = state.current_node_set().await;

        if let Some(candidate_set) = &candidate_set {
            if latest_set.same_as(candidate_set) {
                // Still PENDING against the same candidate; nothing to do
                // until the settle delay elapses (step 3 below).
            } else if latest_set.same_as(&current_set) {
                info!("node set reverted to current before settling; dropping candidate");
                state.clear_candidate().await;
            } else {
                self.build_and_install_candidate(state, latest_set).await?;
            }
        } else if !latest_set.same_as(&current_set) {
            self.build_and_install_candidate(state, latest_set).await?;
        }

        // Step 3: promote if the settle delay has elapsed.
        let snapshot = state.snapshot().await;
        if let Some(changed_time) = snapshot.nodes_changed_time {
            let now = self.clock.now_unix();
            if now.saturating_sub(changed_time) > self.config.settle_delay.as_secs() {
                info!("settle delay elapsed, promoting candidate to current");
                state.promote_candidate().await;
            }
        }

        Ok(())
    }

    async fn build_and_install_candidate(
        &self,
        state: &FleetState,
        latest_set: NodeSet,
    ) -> Result<(), anyhow::Error> {
        match ClusterClient::build(
            latest_set,
            &self.config.nodes_gov_addr,
            self.config.per_request_timeout,
        )
        .await
        {
            Ok(candidate) => {
                let now = self.clock.now_unix();
                info!("node set changed, entering PENDING");
                state.set_candidate(candidate, now).await;
                Ok(())
            }
            Err(e) => {
                // Construction failure leaves state unchanged; the next
                // tick retries from scratch.
                warn!(error = %e, "failed to build candidate cluster, will retry next tick");
                Ok(())
            }
        }
    }
}
