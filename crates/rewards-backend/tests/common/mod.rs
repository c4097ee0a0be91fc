//! Common test utilities for integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rewards_backend::auth::{Session, SessionCredentials};
use rewards_backend::http::{HttpClient, HttpRequest, HttpResponse};
use serde_json::{json, Value};
use tokio::sync::Notify;

pub const MANAGEABLE_URL: &str = "https://api.twitch.tv/helix/channel_points/custom_rewards?broadcaster_id=user123&only_manageable_rewards=true";
pub const ALL_URL: &str = "https://api.twitch.tv/helix/channel_points/custom_rewards?broadcaster_id=user123&only_manageable_rewards=false";
pub const DELETE_URL: &str =
    "https://api.twitch.tv/helix/channel_points/custom_rewards?broadcaster_id=user123&id=A";
pub const LATEST_URL: &str =
    "https://api.github.com/repos/gottagofaster236/RewardsTheater/releases/latest";

/// HTTP client answering from a fixed URL table
#[derive(Clone, Default)]
pub struct ScriptedHttp {
    responses: Arc<Mutex<HashMap<String, (u16, Vec<u8>)>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl ScriptedHttp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, url: &str, status: u16, body: impl Into<Vec<u8>>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), (status, body.into()));
        self
    }

    pub fn reply_json(self, url: &str, body: &Value) -> Self {
        self.reply(url, 200, body.to_string())
    }

    /// URLs requested so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpClient for ScriptedHttp {
    async fn send(&self, request: HttpRequest) -> anyhow::Result<HttpResponse> {
        self.requests.lock().unwrap().push(request.url.clone());
        let (status, body) = self
            .responses
            .lock()
            .unwrap()
            .get(&request.url)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("unexpected request to {}", request.url))?;
        Ok(HttpResponse { status, body })
    }
}

/// HTTP client that holds every response until released
#[derive(Clone)]
pub struct GatedHttp {
    inner: ScriptedHttp,
    gate: Arc<Notify>,
    arrived: Arc<Notify>,
}

impl GatedHttp {
    pub fn new(inner: ScriptedHttp) -> Self {
        Self {
            inner,
            gate: Arc::new(Notify::new()),
            arrived: Arc::new(Notify::new()),
        }
    }

    /// Waits until a request is parked at the gate
    pub async fn request_arrived(&self) {
        self.arrived.notified().await;
    }

    /// Lets one parked request complete
    pub fn release(&self) {
        self.gate.notify_one();
    }
}

#[async_trait]
impl HttpClient for GatedHttp {
    async fn send(&self, request: HttpRequest) -> anyhow::Result<HttpResponse> {
        self.arrived.notify_one();
        self.gate.notified().await;
        self.inner.send(request).await
    }
}

pub fn session() -> Session {
    Session {
        access_token: "test_token".to_string(),
        user_id: "user123".to_string(),
        user_login: "streamer".to_string(),
        expires_at: None,
    }
}

pub async fn logged_in() -> Arc<SessionCredentials> {
    let credentials = Arc::new(SessionCredentials::new("test_client_id"));
    credentials.set_session(session()).await;
    credentials
}

/// A Helix custom reward without a custom image and with every limit disabled
pub fn reward_json(id: &str, cost: u32, is_enabled: bool, color: &str) -> Value {
    json!({
        "id": id,
        "title": format!("Reward {id}"),
        "cost": cost,
        "image": null,
        "default_image": {
            "url_1x": "https://static-cdn.jtvnw.net/custom-reward-images/default-1.png",
            "url_2x": "https://static-cdn.jtvnw.net/custom-reward-images/default-2.png",
            "url_4x": "https://static-cdn.jtvnw.net/custom-reward-images/default-4.png"
        },
        "background_color": color,
        "is_enabled": is_enabled,
        "max_per_stream_setting": {"is_enabled": false, "max_per_stream": 0},
        "max_per_user_per_stream_setting": {"is_enabled": false, "max_per_user_per_stream": 0},
        "global_cooldown_setting": {"is_enabled": false, "global_cooldown_seconds": 0}
    })
}

pub fn listing(rewards: Vec<Value>) -> Value {
    json!({ "data": rewards })
}
