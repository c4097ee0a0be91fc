use std::collections::HashSet;
use std::sync::Arc;

use reqwest::Method;
use serde_json::{json, Value};

use super::types::*;
use crate::auth::CredentialSource;
use crate::error::{ApiError, Outcome};
use crate::http::{HttpClient, ReqwestClient};
use crate::transport::{Query, Response, Transport};

pub const HELIX_HOST: &str = "api.twitch.tv";
const CUSTOM_REWARDS_PATH: &str = "/helix/channel_points/custom_rewards";
const REDEMPTIONS_PATH: &str = "/helix/channel_points/custom_rewards/redemptions";

/// Twitch Helix channel-points client
///
/// Stateless apart from its collaborators: every call reads the current
/// credentials. Generic over the HTTP client implementation for testability.
pub struct RewardsClient<H: HttpClient = ReqwestClient> {
    transport: Transport<H>,
    credentials: Arc<dyn CredentialSource>,
    host: String,
}

impl<H: HttpClient> RewardsClient<H> {
    pub fn new(transport: Transport<H>, credentials: Arc<dyn CredentialSource>) -> Self {
        Self {
            transport,
            credentials,
            host: HELIX_HOST.to_string(),
        }
    }

    /// Overrides the Helix host
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn credentials(&self) -> &Arc<dyn CredentialSource> {
        &self.credentials
    }

    /// Fetches the full reward catalog of the authenticated broadcaster
    ///
    /// Two listings run in sequence: the manageable-only one decides
    /// `can_manage`, the full one decides membership and order.
    pub async fn get_rewards(&self) -> Outcome<Vec<Reward>> {
        let manageable_ids = self.manageable_reward_ids().await?;

        let all = self.list_rewards(false).await?;
        let all: HelixResponse<Value> = serde_json::from_value(all)
            .map_err(|e| ApiError::parse(format!("rewards listing: {e}")))?;

        let rewards = all
            .data
            .iter()
            .map(|json| {
                let id = json.get("id").and_then(Value::as_str).unwrap_or_default();
                parse_reward(json, manageable_ids.contains(id))
            })
            .collect::<Outcome<Vec<_>>>()?;

        tracing::debug!(
            total = rewards.len(),
            manageable = manageable_ids.len(),
            "Fetched rewards"
        );
        Ok(rewards)
    }

    /// IDs of the rewards this application created
    pub async fn manageable_reward_ids(&self) -> Outcome<HashSet<String>> {
        let manageable = self.list_rewards(true).await?;
        Ok(serde_json::from_value::<HelixResponse<RewardId>>(manageable)
            .map_err(|e| ApiError::parse(format!("manageable rewards listing: {e}")))?
            .data
            .into_iter()
            .map(|r| r.id)
            .collect())
    }

    /// Parses a redemption message, resolving `can_manage` from the
    /// manageable-only listing
    pub async fn resolve_redemption(&self, json: &Value) -> Outcome<RewardRedemption> {
        let manageable_ids = self.manageable_reward_ids().await?;
        parse_redemption(json, &manageable_ids)
    }

    /// Deletes a reward created by this application
    ///
    /// Rewards marked unmanageable fail locally without a request.
    pub async fn delete_reward(&self, reward: &Reward) -> Outcome<()> {
        if !reward.can_manage {
            return Err(ApiError::NotManageable);
        }

        let query = Query::from([
            ("broadcaster_id", self.credentials.user_id().await?),
            ("id", reward.id.clone()),
        ]);
        let response = self
            .transport
            .request(
                &self.host,
                CUSTOM_REWARDS_PATH,
                Some(self.credentials.as_ref()),
                &query,
                Method::DELETE,
            )
            .await?;

        if response.status != 204 {
            return Err(unexpected_status(&response));
        }

        tracing::info!(reward_id = %reward.id, "Deleted reward");
        Ok(())
    }

    /// Downloads the reward's image bytes
    pub async fn download_image(&self, reward: &Reward) -> Outcome<Vec<u8>> {
        self.transport.download_url(&reward.image_url).await
    }

    /// Creates a reward owned by this application
    pub async fn create_reward(&self, reward: &NewReward) -> Outcome<Reward> {
        let query = Query::from([("broadcaster_id", self.credentials.user_id().await?)]);
        let response = self
            .transport
            .request_json(
                &self.host,
                CUSTOM_REWARDS_PATH,
                Some(self.credentials.as_ref()),
                &query,
                Method::POST,
                &reward.to_json(),
            )
            .await?;

        match response.status {
            200 => {}
            400 => {
                return Err(ApiError::InvalidParameters {
                    body: response.body_text(),
                })
            }
            403 => return Err(ApiError::NotAffiliateOrPartner),
            _ => return Err(unexpected_status(&response)),
        }

        let created: HelixResponse<Value> = serde_json::from_value(response.json)
            .map_err(|e| ApiError::parse(format!("created reward: {e}")))?;
        let json = created
            .data
            .first()
            .ok_or_else(|| ApiError::parse("created reward missing from response"))?;

        let reward = parse_reward(json, true)?;
        tracing::info!(reward_id = %reward.id, "Created reward");
        Ok(reward)
    }

    /// Marks a redemption as fulfilled or canceled
    ///
    /// Twitch only accepts this for rewards created by this application.
    pub async fn update_redemption_status(
        &self,
        redemption: &RewardRedemption,
        status: RedemptionStatus,
    ) -> Outcome<()> {
        if !redemption.reward.can_manage {
            return Err(ApiError::NotManageable);
        }

        let query = Query::from([
            ("broadcaster_id", self.credentials.user_id().await?),
            ("reward_id", redemption.reward.id.clone()),
            ("id", redemption.redemption_id.clone()),
        ]);
        let response = self
            .transport
            .request_json(
                &self.host,
                REDEMPTIONS_PATH,
                Some(self.credentials.as_ref()),
                &query,
                Method::PATCH,
                &json!({ "status": status }),
            )
            .await?;

        if response.status != 200 {
            return Err(unexpected_status(&response));
        }
        Ok(())
    }

    /// One listing request; 403 means the channel has no channel points
    async fn list_rewards(&self, only_manageable: bool) -> Outcome<Value> {
        let query = Query::from([
            ("broadcaster_id", self.credentials.user_id().await?),
            ("only_manageable_rewards", only_manageable.to_string()),
        ]);
        let response = self
            .transport
            .request(
                &self.host,
                CUSTOM_REWARDS_PATH,
                Some(self.credentials.as_ref()),
                &query,
                Method::GET,
            )
            .await?;

        match response.status {
            200 => Ok(response.json),
            403 => Err(ApiError::NotAffiliateOrPartner),
            _ => Err(unexpected_status(&response)),
        }
    }
}

impl<H: HttpClient + Clone> Clone for RewardsClient<H> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            credentials: self.credentials.clone(),
            host: self.host.clone(),
        }
    }
}

fn unexpected_status(response: &Response) -> ApiError {
    ApiError::UnexpectedStatus {
        status: response.status,
        body: response.body_text(),
    }
}
