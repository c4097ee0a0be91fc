//! Notifications emitted to the host
//!
//! Services report through the [`Notifier`] trait so hosts can plug in their
//! own event loop and tests can record what was emitted.

use std::sync::Arc;

use tokio::sync::watch;

use crate::error::Outcome;
use crate::twitch::Reward;

/// Batch of rewards produced by one catalog refresh
pub type RewardBatch = Arc<[Reward]>;

/// Trait for receiving service notifications
///
/// Called from worker threads; implementations must not block.
pub trait Notifier: Send + Sync {
    /// A catalog refresh finished, successfully or not
    fn rewards_updated(&self, rewards: Outcome<RewardBatch>);

    /// A newer release than the running version was published
    fn update_available(&self);
}

/// Notifier that publishes the latest state over watch channels
pub struct ChannelNotifier {
    rewards_tx: watch::Sender<Option<Outcome<RewardBatch>>>,
    update_tx: watch::Sender<bool>,
}

impl ChannelNotifier {
    pub fn new() -> Self {
        let (rewards_tx, _) = watch::channel(None);
        let (update_tx, _) = watch::channel(false);
        Self {
            rewards_tx,
            update_tx,
        }
    }

    /// Receiver for catalog refreshes
    ///
    /// Holds `None` until the first refresh completes.
    pub fn subscribe_rewards(&self) -> watch::Receiver<Option<Outcome<RewardBatch>>> {
        self.rewards_tx.subscribe()
    }

    /// Receiver that flips to true once an update has been found
    pub fn subscribe_update_available(&self) -> watch::Receiver<bool> {
        self.update_tx.subscribe()
    }

    /// Returns the most recent refresh result, if any
    pub fn latest_rewards(&self) -> Option<Outcome<RewardBatch>> {
        self.rewards_tx.borrow().clone()
    }

    pub fn is_update_available(&self) -> bool {
        *self.update_tx.borrow()
    }
}

impl Default for ChannelNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for ChannelNotifier {
    fn rewards_updated(&self, rewards: Outcome<RewardBatch>) {
        self.rewards_tx.send_replace(Some(rewards));
    }

    fn update_available(&self) {
        self.update_tx.send_replace(true);
    }
}
