use std::sync::Arc;

use anyhow::Result;

use crate::auth::{CredentialSource, SessionCredentials};
use crate::config::Config;
use crate::github::ReleaseClient;
use crate::http::{HttpClient, ReqwestClient};
use crate::notify::ChannelNotifier;
use crate::runtime::WorkerPool;
use crate::services::{RewardsService, UpdateService};
use crate::transport::Transport;
use crate::twitch::RewardsClient;

/// Composition root owned by the host
///
/// Owns the worker pool and every service whose state its tasks touch.
/// Dropping it (or calling [`App::shutdown`]) stops the pool before anything
/// else is released.
pub struct App<H: HttpClient + Clone = ReqwestClient> {
    pool: WorkerPool,
    config: Config,
    credentials: Arc<SessionCredentials>,
    notifier: Arc<ChannelNotifier>,
    rewards: RewardsService<H>,
    updates: UpdateService<H>,
}

impl App {
    /// Creates the application with the production HTTP client
    pub fn new(config: Config) -> Result<Self> {
        let http = ReqwestClient::with_user_agent(&config.user_agent)?;
        Self::with_http_client(config, http)
    }
}

impl<H: HttpClient + Clone + 'static> App<H> {
    /// Creates the application with a custom HTTP client
    pub fn with_http_client(config: Config, http: H) -> Result<Self> {
        let pool = WorkerPool::new(config.worker_threads)?;
        let credentials = Arc::new(SessionCredentials::new(config.client_id.clone()));
        let notifier = Arc::new(ChannelNotifier::new());

        let rewards_client = RewardsClient::new(Transport::new(http.clone()), credentials.clone())
            .with_host(config.helix_host.clone());
        let release_client = ReleaseClient::new(Transport::new(http), config.current_version.clone())
            .with_endpoint(config.release_host.clone(), config.release_path.clone());

        let rewards = RewardsService::new(rewards_client, pool.spawner(), notifier.clone());
        let updates = UpdateService::new(release_client, pool.spawner(), notifier.clone());

        Ok(Self {
            pool,
            config,
            credentials,
            notifier,
            rewards,
            updates,
        })
    }

    /// Starts background behaviour
    ///
    /// Refreshes the catalog whenever the identity changes (and once now if a
    /// session is already installed) and checks for updates once.
    pub fn start(&self) {
        tracing::info!(
            version = %self.config.current_version,
            threads = self.pool.threads(),
            "Starting Rewards Theater client"
        );

        self.rewards.watch_identity();
        if self.credentials.subscribe().borrow().is_some() {
            self.rewards.update_rewards();
        }
        self.updates.check_for_updates();
    }

    /// Stops the worker pool, then releases the services
    pub fn shutdown(mut self) {
        self.pool.stop();
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Credential source the host's login flow writes into
    pub fn credentials(&self) -> &Arc<SessionCredentials> {
        &self.credentials
    }

    pub fn notifier(&self) -> &Arc<ChannelNotifier> {
        &self.notifier
    }

    pub fn rewards(&self) -> &RewardsService<H> {
        &self.rewards
    }

    pub fn updates(&self) -> &UpdateService<H> {
        &self.updates
    }
}

impl<H: HttpClient + Clone> Drop for App<H> {
    fn drop(&mut self) {
        // Fields drop after this, so no task can resume into released services
        self.pool.stop();
    }
}
