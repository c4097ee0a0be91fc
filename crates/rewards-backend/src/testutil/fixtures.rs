//! Test fixtures
//!
//! Helix and GitHub JSON payloads shaped like the real responses.

use serde_json::{json, Value};

/// A Helix custom reward with the default image and every limit disabled
pub fn reward_json(id: &str, title: &str, cost: i64, is_enabled: bool, color: &str) -> Value {
    json!({
        "broadcaster_id": "user123",
        "broadcaster_login": "streamer",
        "broadcaster_name": "Streamer",
        "id": id,
        "title": title,
        "prompt": "",
        "cost": cost,
        "image": null,
        "default_image": {
            "url_1x": "https://static-cdn.jtvnw.net/custom-reward-images/default-1.png",
            "url_2x": "https://static-cdn.jtvnw.net/custom-reward-images/default-2.png",
            "url_4x": "https://static-cdn.jtvnw.net/custom-reward-images/default-4.png"
        },
        "background_color": color,
        "is_enabled": is_enabled,
        "is_user_input_required": false,
        "max_per_stream_setting": {"is_enabled": false, "max_per_stream": 0},
        "max_per_user_per_stream_setting": {"is_enabled": false, "max_per_user_per_stream": 0},
        "global_cooldown_setting": {"is_enabled": false, "global_cooldown_seconds": 0},
        "is_paused": false,
        "is_in_stock": true,
        "should_redemptions_skip_request_queue": false,
        "redemptions_redeemed_current_stream": null,
        "cooldown_expires_at": null
    })
}

/// A channel-points redemption of `reward`
pub fn redemption_json(id: &str, reward: Value) -> Value {
    json!({
        "id": id,
        "user": {"id": "viewer1", "login": "viewer", "display_name": "Viewer"},
        "channel_id": "user123",
        "redeemed_at": "2023-10-01T12:45:00Z",
        "reward": reward,
        "status": "UNFULFILLED"
    })
}

/// Wraps rewards in the Helix `data` envelope
pub fn listing(rewards: Vec<Value>) -> Value {
    json!({ "data": rewards })
}

/// A GitHub "latest release" payload
pub fn release_json(tag_name: &str) -> Value {
    json!({
        "url": "https://api.github.com/repos/gottagofaster236/RewardsTheater/releases/1",
        "html_url": format!("https://github.com/gottagofaster236/RewardsTheater/releases/tag/{tag_name}"),
        "id": 1,
        "tag_name": tag_name,
        "name": format!("RewardsTheater {tag_name}"),
        "draft": false,
        "prerelease": false,
        "created_at": "2023-10-01T12:00:00Z",
        "published_at": "2023-10-01T12:30:00Z"
    })
}
