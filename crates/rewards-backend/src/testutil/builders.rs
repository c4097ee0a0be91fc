//! Test data builders
//!
//! Provides builder patterns for creating test data with sensible defaults.

use url::Url;

use crate::twitch::{Color, Reward};

/// Builder for creating test Reward objects
#[derive(Debug, Clone)]
pub struct RewardBuilder {
    id: String,
    title: String,
    cost: u32,
    image_url: String,
    is_enabled: bool,
    background_color: Color,
    max_redemptions_per_stream: Option<u64>,
    max_redemptions_per_user_per_stream: Option<u64>,
    global_cooldown_seconds: Option<u64>,
    can_manage: bool,
}

impl Default for RewardBuilder {
    fn default() -> Self {
        Self {
            id: "reward_123".to_string(),
            title: "Test Reward".to_string(),
            cost: 100,
            image_url: "https://static-cdn.jtvnw.net/custom-reward-images/default-4.png"
                .to_string(),
            is_enabled: true,
            background_color: Color::BLACK,
            max_redemptions_per_stream: None,
            max_redemptions_per_user_per_stream: None,
            global_cooldown_seconds: None,
            can_manage: true,
        }
    }
}

impl RewardBuilder {
    /// Creates a new reward builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the reward ID
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Sets the reward title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the cost in channel points
    pub fn cost(mut self, cost: u32) -> Self {
        self.cost = cost;
        self
    }

    /// Sets the image URL (must be absolute)
    pub fn image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = url.into();
        self
    }

    pub fn enabled(mut self, is_enabled: bool) -> Self {
        self.is_enabled = is_enabled;
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Sets all three redemption limits
    pub fn limits(
        mut self,
        per_stream: Option<u64>,
        per_user_per_stream: Option<u64>,
        cooldown_seconds: Option<u64>,
    ) -> Self {
        self.max_redemptions_per_stream = per_stream;
        self.max_redemptions_per_user_per_stream = per_user_per_stream;
        self.global_cooldown_seconds = cooldown_seconds;
        self
    }

    /// Sets whether this application may manage the reward
    pub fn can_manage(mut self, can_manage: bool) -> Self {
        self.can_manage = can_manage;
        self
    }

    /// Builds the Reward
    pub fn build(self) -> Reward {
        Reward {
            id: self.id,
            title: self.title,
            cost: self.cost,
            image_url: Url::parse(&self.image_url).expect("Invalid test image URL"),
            is_enabled: self.is_enabled,
            background_color: self.background_color,
            max_redemptions_per_stream: self.max_redemptions_per_stream,
            max_redemptions_per_user_per_stream: self.max_redemptions_per_user_per_stream,
            global_cooldown_seconds: self.global_cooldown_seconds,
            can_manage: self.can_manage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reward_builder_defaults() {
        let reward = RewardBuilder::new().build();

        assert_eq!(reward.id, "reward_123");
        assert_eq!(reward.cost, 100);
        assert!(reward.is_enabled);
        assert!(reward.can_manage);
        assert_eq!(reward.background_color, Color::BLACK);
    }

    #[test]
    fn reward_builder_overrides() {
        let reward = RewardBuilder::new()
            .id("abc")
            .title("Scream")
            .cost(5000)
            .enabled(false)
            .color(Color::new(1, 2, 3))
            .limits(Some(1), None, Some(60))
            .can_manage(false)
            .build();

        assert_eq!(reward.id, "abc");
        assert_eq!(reward.title, "Scream");
        assert_eq!(reward.cost, 5000);
        assert!(!reward.is_enabled);
        assert_eq!(reward.background_color, Color::new(1, 2, 3));
        assert_eq!(reward.max_redemptions_per_stream, Some(1));
        assert_eq!(reward.max_redemptions_per_user_per_stream, None);
        assert_eq!(reward.global_cooldown_seconds, Some(60));
        assert!(!reward.can_manage);
    }
}
