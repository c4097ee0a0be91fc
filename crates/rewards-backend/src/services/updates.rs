use std::sync::Arc;

use crate::github::ReleaseClient;
use crate::http::{HttpClient, ReqwestClient};
use crate::notify::Notifier;
use crate::runtime::Spawner;

/// Background check for newer releases
///
/// Failures never reach the user; they are logged and dropped.
pub struct UpdateService<H: HttpClient = ReqwestClient> {
    client: Arc<ReleaseClient<H>>,
    spawner: Spawner,
    notifier: Arc<dyn Notifier>,
}

impl<H: HttpClient + 'static> UpdateService<H> {
    pub fn new(client: ReleaseClient<H>, spawner: Spawner, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            client: Arc::new(client),
            spawner,
            notifier,
        }
    }

    /// Raises `Notifier::update_available` if a newer release exists
    pub fn check_for_updates(&self) {
        let client = self.client.clone();
        let notifier = self.notifier.clone();

        self.spawner.spawn(async move {
            match client.is_update_available().await {
                Ok(true) => {
                    tracing::info!("A newer release is available");
                    notifier.update_available();
                }
                Ok(false) => tracing::debug!(
                    current = client.current_version(),
                    "Running the latest release"
                ),
                Err(e) => tracing::warn!("Failed to check for updates: {}", e),
            }
        });
    }
}

impl<H: HttpClient> Clone for UpdateService<H> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            spawner: self.spawner.clone(),
            notifier: self.notifier.clone(),
        }
    }
}
