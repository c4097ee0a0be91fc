use std::sync::Arc;

use crate::callback::Callback;
use crate::error::Outcome;
use crate::http::{HttpClient, ReqwestClient};
use crate::notify::{Notifier, RewardBatch};
use crate::runtime::Spawner;
use crate::twitch::{NewReward, RedemptionStatus, Reward, RewardRedemption, RewardsClient};

/// Background operations on the broadcaster's reward catalog
///
/// Concurrent refreshes are neither coalesced nor serialized.
pub struct RewardsService<H: HttpClient = ReqwestClient> {
    client: Arc<RewardsClient<H>>,
    spawner: Spawner,
    notifier: Arc<dyn Notifier>,
}

impl<H: HttpClient + 'static> RewardsService<H> {
    pub fn new(client: RewardsClient<H>, spawner: Spawner, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            client: Arc::new(client),
            spawner,
            notifier,
        }
    }

    pub fn client(&self) -> &RewardsClient<H> {
        &self.client
    }

    /// Refreshes the catalog and reports it through `Notifier::rewards_updated`
    pub fn update_rewards(&self) {
        let client = self.client.clone();
        let notifier = self.notifier.clone();

        self.spawner.spawn(async move {
            let outcome = client.get_rewards().await.map(RewardBatch::from);
            match &outcome {
                Ok(rewards) => tracing::info!(count = rewards.len(), "Rewards updated"),
                Err(e) => tracing::error!("Failed to update rewards: {}", e),
            }
            notifier.rewards_updated(outcome);
        });
    }

    /// Deletes `reward`, delivering the outcome to `callback`
    pub fn delete_reward(&self, reward: Reward, callback: Callback<Outcome<()>>) {
        let client = self.client.clone();

        self.spawner.spawn(async move {
            let outcome = client.delete_reward(&reward).await;
            if let Err(e) = &outcome {
                tracing::error!(reward_id = %reward.id, "Failed to delete reward: {}", e);
            }
            callback.deliver(outcome);
        });
    }

    /// Downloads the image of `reward`, delivering the bytes to `callback`
    pub fn download_image(&self, reward: &Reward, callback: Callback<Outcome<Vec<u8>>>) {
        let client = self.client.clone();
        let reward = reward.clone();

        self.spawner.spawn(async move {
            let outcome = client.download_image(&reward).await;
            if let Err(e) = &outcome {
                tracing::error!(url = %reward.image_url, "Failed to download reward image: {}", e);
            }
            callback.deliver(outcome);
        });
    }

    /// Creates a reward, delivering the created reward to `callback`
    pub fn create_reward(&self, reward: NewReward, callback: Callback<Outcome<Reward>>) {
        let client = self.client.clone();

        self.spawner.spawn(async move {
            let outcome = client.create_reward(&reward).await;
            if let Err(e) = &outcome {
                tracing::error!(title = %reward.title, "Failed to create reward: {}", e);
            }
            callback.deliver(outcome);
        });
    }

    /// Marks a redemption fulfilled or canceled; failures are only logged
    pub fn update_redemption_status(&self, redemption: RewardRedemption, status: RedemptionStatus) {
        let client = self.client.clone();

        self.spawner.spawn(async move {
            match client.update_redemption_status(&redemption, status).await {
                Ok(()) => tracing::debug!(
                    redemption_id = %redemption.redemption_id,
                    ?status,
                    "Updated redemption status"
                ),
                Err(e) => tracing::error!(
                    redemption_id = %redemption.redemption_id,
                    "Failed to update redemption status: {}", e
                ),
            }
        });
    }

    /// Refreshes the catalog every time the authenticated identity changes
    ///
    /// Runs until the worker pool stops.
    pub fn watch_identity(&self) {
        let mut changes = self.client.credentials().subscribe();
        let service = self.clone();

        self.spawner.spawn(async move {
            while changes.changed().await.is_ok() {
                let user_id = changes.borrow_and_update().clone();
                tracing::info!(user_id = ?user_id, "Identity changed, refreshing rewards");
                service.update_rewards();
            }
        });
    }
}

impl<H: HttpClient> Clone for RewardsService<H> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            spawner: self.spawner.clone(),
            notifier: self.notifier.clone(),
        }
    }
}
