//! Authenticated request execution on top of [`HttpClient`]
//!
//! `Transport` turns (host, path, query, method) into one HTTPS request,
//! attaches credentials read at call time, and parses the body as JSON. It
//! never judges the status code: acceptable statuses differ per endpoint.

use std::collections::BTreeMap;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde_json::Value;
use url::Url;

use crate::auth::CredentialSource;
use crate::error::{ApiError, Outcome};
use crate::http::{HttpClient, HttpRequest, ReqwestClient};

/// Query parameters, emitted in key order
pub type Query<'a> = BTreeMap<&'a str, String>;

/// Result of one transport call
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    /// Parsed body. `Null` when empty, a JSON string holding the raw text
    /// when an error status came with a non-JSON body.
    pub json: Value,
    /// Body exactly as received, lossily decoded as UTF-8
    pub raw: String,
}

impl Response {
    /// Returns true if status is in 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as received, for diagnostics
    pub fn body_text(&self) -> String {
        self.raw.clone()
    }
}

/// Executes single-attempt HTTPS requests
///
/// Generic over the HTTP client implementation for testability.
#[derive(Debug, Clone)]
pub struct Transport<H: HttpClient = ReqwestClient> {
    http: H,
}

impl<H: HttpClient> Transport<H> {
    pub fn new(http: H) -> Self {
        Self { http }
    }

    /// Sends a request without a body
    ///
    /// When `credentials` is given, the bearer token and client ID are read
    /// from it for this call only.
    pub async fn request(
        &self,
        host: &str,
        path: &str,
        credentials: Option<&dyn CredentialSource>,
        query: &Query<'_>,
        method: Method,
    ) -> Outcome<Response> {
        self.execute(host, path, credentials, query, method, None)
            .await
    }

    /// Sends a request with a JSON body
    pub async fn request_json(
        &self,
        host: &str,
        path: &str,
        credentials: Option<&dyn CredentialSource>,
        query: &Query<'_>,
        method: Method,
        body: &Value,
    ) -> Outcome<Response> {
        self.execute(host, path, credentials, query, method, Some(body))
            .await
    }

    /// Downloads the raw bytes at `host` + `path`
    pub async fn download_file(&self, host: &str, path: &str) -> Outcome<Vec<u8>> {
        self.download(build_url(host, path, &Query::new())).await
    }

    /// Downloads the raw bytes at `url`, unchanged
    pub async fn download_url(&self, url: &Url) -> Outcome<Vec<u8>> {
        self.download(url.to_string()).await
    }

    async fn download(&self, url: String) -> Outcome<Vec<u8>> {
        let response = self.http.send(HttpRequest::new(Method::GET, &url)).await?;

        if !response.is_success() {
            return Err(ApiError::UnexpectedStatus {
                status: response.status,
                body: response.text(),
            });
        }

        tracing::debug!(url = %url, bytes = response.body.len(), "Downloaded file");
        Ok(response.body)
    }

    async fn execute(
        &self,
        host: &str,
        path: &str,
        credentials: Option<&dyn CredentialSource>,
        query: &Query<'_>,
        method: Method,
        body: Option<&Value>,
    ) -> Outcome<Response> {
        let url = build_url(host, path, query);
        let mut request = HttpRequest::new(method, &url);

        if let Some(credentials) = credentials {
            request.headers = auth_headers(credentials).await?;
        }
        if let Some(body) = body {
            request
                .headers
                .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            request.body = Some(body.to_string().into_bytes());
        }

        tracing::debug!(method = %request.method, url = %url, "Sending request");
        let response = self.http.send(request).await?;

        let json = if response.body.is_empty() {
            Value::Null
        } else {
            match serde_json::from_slice(&response.body) {
                Ok(json) => json,
                Err(_) if !response.is_success() => Value::String(response.text()),
                Err(e) => {
                    return Err(ApiError::Transport(format!(
                        "Malformed response body from {url}: {e}"
                    )))
                }
            }
        };

        Ok(Response {
            status: response.status,
            json,
            raw: response.text(),
        })
    }
}

/// Builds the headers for an authenticated request
async fn auth_headers(credentials: &dyn CredentialSource) -> Outcome<HeaderMap> {
    let token = credentials.access_token().await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| ApiError::Transport("Access token is not a valid header".into()))?,
    );
    headers.insert(
        "Client-Id",
        HeaderValue::from_str(credentials.client_id())
            .map_err(|_| ApiError::Transport("Client ID is not a valid header".into()))?,
    );

    Ok(headers)
}

/// Builds `https://{host}{path}?{query}` with URL-encoded parameters
fn build_url(host: &str, path: &str, query: &Query<'_>) -> String {
    let mut url = format!("https://{host}{path}");
    for (i, (key, value)) in query.iter().enumerate() {
        url.push(if i == 0 { '?' } else { '&' });
        url.push_str(&urlencoding::encode(key));
        url.push('=');
        url.push_str(&urlencoding::encode(value));
    }
    url
}
