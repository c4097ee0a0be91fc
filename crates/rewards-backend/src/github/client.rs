use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::Deserialize;

use super::version::{compare_versions, parse_version};
use crate::error::{ApiError, Outcome};
use crate::http::{HttpClient, ReqwestClient};
use crate::transport::{Query, Transport};

pub const RELEASE_HOST: &str = "api.github.com";
pub const RELEASE_PATH: &str = "/repos/gottagofaster236/RewardsTheater/releases/latest";

/// Metadata of a published release
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseInfo {
    pub tag_name: String,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

/// Client for the latest published release
pub struct ReleaseClient<H: HttpClient = ReqwestClient> {
    transport: Transport<H>,
    host: String,
    path: String,
    current_version: String,
}

impl<H: HttpClient> ReleaseClient<H> {
    /// Creates a client comparing releases against `current_version`
    pub fn new(transport: Transport<H>, current_version: impl Into<String>) -> Self {
        Self {
            transport,
            host: RELEASE_HOST.to_string(),
            path: RELEASE_PATH.to_string(),
            current_version: current_version.into(),
        }
    }

    /// Overrides where the latest release is read from
    pub fn with_endpoint(mut self, host: impl Into<String>, path: impl Into<String>) -> Self {
        self.host = host.into();
        self.path = path.into();
        self
    }

    pub fn current_version(&self) -> &str {
        &self.current_version
    }

    /// Fetches the latest release metadata
    pub async fn latest_release(&self) -> Outcome<ReleaseInfo> {
        let response = self
            .transport
            .request(&self.host, &self.path, None, &Query::new(), Method::GET)
            .await?;

        if response.status != 200 {
            return Err(ApiError::UnexpectedStatus {
                status: response.status,
                body: response.body_text(),
            });
        }

        serde_json::from_value(response.json)
            .map_err(|e| ApiError::parse(format!("latest release: {e}")))
    }

    /// Returns true if the latest release is newer than the running version
    pub async fn is_update_available(&self) -> Outcome<bool> {
        let latest = self.latest_release().await?;
        let latest_version = parse_version(&latest.tag_name)?;
        let current_version = parse_version(&self.current_version)?;

        let newer = compare_versions(&latest_version, &current_version) == Ordering::Greater;
        tracing::debug!(
            latest = %latest.tag_name,
            current = %self.current_version,
            newer,
            "Compared release versions"
        );
        Ok(newer)
    }
}
