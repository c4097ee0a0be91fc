use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use crate::error::ApiError;

/// An RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Parses `#rrggbb`. An empty string is black.
    pub fn from_hex(hex: &str) -> Result<Self, ApiError> {
        if hex.is_empty() {
            return Ok(Self::BLACK);
        }

        let digits = hex
            .strip_prefix('#')
            .ok_or_else(|| ApiError::parse(format!("Color {hex:?} does not start with '#'")))?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ApiError::parse(format!(
                "Color {hex:?} must have six hex digits"
            )));
        }
        let value = u32::from_str_radix(digits, 16)
            .map_err(|_| ApiError::parse(format!("Color {hex:?} is not valid hex")))?;

        Ok(Self::new(
            ((value >> 16) & 0xff) as u8,
            ((value >> 8) & 0xff) as u8,
            (value & 0xff) as u8,
        ))
    }
}

impl FromStr for Color {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }
}

/// A channel-points reward, as seen in one catalog refresh
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reward {
    pub id: String,
    pub title: String,
    pub cost: u32,
    pub image_url: Url,
    pub is_enabled: bool,
    pub background_color: Color,
    pub max_redemptions_per_stream: Option<u64>,
    pub max_redemptions_per_user_per_stream: Option<u64>,
    pub global_cooldown_seconds: Option<u64>,
    /// Whether this application created the reward and may modify it
    pub can_manage: bool,
}

/// Parameters for creating a reward
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReward {
    pub title: String,
    pub cost: u32,
    pub is_enabled: bool,
    pub background_color: Option<Color>,
    pub max_redemptions_per_stream: Option<u64>,
    pub max_redemptions_per_user_per_stream: Option<u64>,
    pub global_cooldown_seconds: Option<u64>,
}

impl NewReward {
    pub fn new(title: impl Into<String>, cost: u32) -> Self {
        Self {
            title: title.into(),
            cost,
            is_enabled: true,
            background_color: None,
            max_redemptions_per_stream: None,
            max_redemptions_per_user_per_stream: None,
            global_cooldown_seconds: None,
        }
    }

    /// Request body for the Create Custom Rewards endpoint
    pub fn to_json(&self) -> Value {
        let mut body = serde_json::json!({
            "title": self.title,
            "cost": self.cost,
            "is_enabled": self.is_enabled,
            "is_max_per_stream_enabled": self.max_redemptions_per_stream.is_some(),
            "max_per_stream": self.max_redemptions_per_stream.unwrap_or(0),
            "is_max_per_user_per_stream_enabled":
                self.max_redemptions_per_user_per_stream.is_some(),
            "max_per_user_per_stream": self.max_redemptions_per_user_per_stream.unwrap_or(0),
            "is_global_cooldown_enabled": self.global_cooldown_seconds.is_some(),
            "global_cooldown_seconds": self.global_cooldown_seconds.unwrap_or(0),
        });
        if let Some(color) = self.background_color {
            body["background_color"] = Value::String(color.to_string());
        }
        body
    }
}

/// A viewer's redemption of a reward
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardRedemption {
    pub reward: Reward,
    pub redemption_id: String,
}

/// Final state of a redemption
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RedemptionStatus {
    Fulfilled,
    Canceled,
}

/// Helix envelope: `{"data": [...]}`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct HelixResponse<T> {
    pub data: Vec<T>,
}

/// Just the ID of a reward from the manageable-only listing
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RewardId {
    pub id: String,
}

/// Custom reward as returned by Helix
#[derive(Debug, Clone, Deserialize)]
struct RawReward {
    id: String,
    title: String,
    cost: u32,
    #[serde(default)]
    image: Option<RawImage>,
    #[serde(default)]
    default_image: Option<RawImage>,
    is_enabled: bool,
    background_color: String,
    // Redemption messages use the bare names
    #[serde(alias = "max_per_stream")]
    max_per_stream_setting: RawSetting,
    #[serde(alias = "max_per_user_per_stream")]
    max_per_user_per_stream_setting: RawSetting,
    #[serde(alias = "global_cooldown")]
    global_cooldown_setting: RawSetting,
}

#[derive(Debug, Clone, Deserialize)]
struct RawImage {
    url_4x: String,
}

/// `{"is_enabled": bool, <value key>: number}`
#[derive(Debug, Clone, Deserialize)]
struct RawSetting {
    is_enabled: bool,
    #[serde(flatten)]
    values: Map<String, Value>,
}

impl RawSetting {
    /// The value under `key` if the setting is enabled
    fn value(&self, key: &str) -> Result<Option<u64>, String> {
        if !self.is_enabled {
            return Ok(None);
        }
        let value = self
            .values
            .get(key)
            .ok_or_else(|| format!("missing field `{key}`"))?;
        value
            .as_u64()
            .map(Some)
            .ok_or_else(|| format!("field `{key}` is not a non-negative integer: {value}"))
    }
}

/// Parses one Helix custom reward
///
/// Errors name the reward ID whenever the object carries one.
pub fn parse_reward(json: &Value, can_manage: bool) -> Result<Reward, ApiError> {
    let id_hint = json.get("id").and_then(Value::as_str).map(str::to_string);
    let fail = |message: String| match &id_hint {
        Some(id) => ApiError::parse_reward(id.clone(), message),
        None => ApiError::parse(message),
    };

    let raw = RawReward::deserialize(json).map_err(|e| fail(e.to_string()))?;

    let image = raw
        .image
        .as_ref()
        .or(raw.default_image.as_ref())
        .ok_or_else(|| fail("reward has neither `image` nor `default_image`".to_string()))?;
    let image_url =
        Url::parse(&image.url_4x).map_err(|e| fail(format!("invalid image URL: {e}")))?;

    let background_color = Color::from_hex(&raw.background_color).map_err(|e| match e {
        ApiError::Parse { message, .. } => fail(message),
        other => other,
    })?;

    Ok(Reward {
        max_redemptions_per_stream: raw
            .max_per_stream_setting
            .value("max_per_stream")
            .map_err(&fail)?,
        max_redemptions_per_user_per_stream: raw
            .max_per_user_per_stream_setting
            .value("max_per_user_per_stream")
            .map_err(&fail)?,
        global_cooldown_seconds: raw
            .global_cooldown_setting
            .value("global_cooldown_seconds")
            .map_err(&fail)?,
        id: raw.id,
        title: raw.title,
        cost: raw.cost,
        image_url,
        is_enabled: raw.is_enabled,
        background_color,
        can_manage,
    })
}

/// Parses a channel-points redemption: `{"id": ..., "reward": {...}}`
///
/// `can_manage` is set when the reward ID is in `manageable_ids`, the same
/// rule the catalog listing applies.
pub fn parse_redemption(
    json: &Value,
    manageable_ids: &HashSet<String>,
) -> Result<RewardRedemption, ApiError> {
    let reward_json = json
        .get("reward")
        .ok_or_else(|| ApiError::parse("redemption has no `reward`"))?;
    let reward_id = reward_json.get("id").and_then(Value::as_str).unwrap_or_default();
    let reward = parse_reward(reward_json, manageable_ids.contains(reward_id))?;

    let redemption_id = json
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::parse_reward(reward.id.clone(), "redemption has no `id`"))?;

    Ok(RewardRedemption {
        reward,
        redemption_id: redemption_id.to_string(),
    })
}
