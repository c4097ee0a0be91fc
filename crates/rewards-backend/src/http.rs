//! HTTP client abstraction
//!
//! This module provides a trait-based HTTP client that can be easily mocked for testing.
//! It only moves bytes; authentication and status interpretation live above it.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::Method;
use serde::de::DeserializeOwned;

/// Trait for making HTTP requests
///
/// One call is exactly one attempt. Implementations must not retry.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Sends the request and returns the raw response, whatever its status
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// A fully built HTTP request
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Creates a request without headers or body
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            body: None,
        }
    }
}

/// Response from an HTTP request
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Returns true if status is in 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns the body as text, replacing invalid UTF-8
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Deserializes the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).context("Failed to parse JSON response")
    }
}

/// Production HTTP client using reqwest
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    inner: reqwest::Client,
}

impl ReqwestClient {
    /// Creates a new reqwest-based HTTP client with default settings
    pub fn new() -> Self {
        Self {
            inner: reqwest::Client::new(),
        }
    }

    /// Creates a client that sends the given User-Agent on every request
    pub fn with_user_agent(user_agent: &str) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { inner })
    }
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = self
            .inner
            .request(request.method, &request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.context("Failed to send request")?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .context("Failed to read response body")?;

        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, RwLock};

    /// Mock HTTP client for testing
    ///
    /// Allows setting up canned responses for specific (method, URL) pairs.
    #[derive(Debug, Clone, Default)]
    pub struct MockHttpClient {
        responses: Arc<RwLock<HashMap<(Method, String), MockResponse>>>,
        requests: Arc<RwLock<Vec<RecordedRequest>>>,
    }

    /// A recorded HTTP request
    #[derive(Debug, Clone)]
    pub struct RecordedRequest {
        pub method: Method,
        pub url: String,
        pub headers: HeaderMap,
        pub body: Option<Vec<u8>>,
    }

    impl RecordedRequest {
        /// Parses the recorded body as JSON
        pub fn json_body(&self) -> serde_json::Value {
            serde_json::from_slice(self.body.as_deref().unwrap_or_default())
                .expect("Recorded body is not JSON")
        }
    }

    #[derive(Debug, Clone)]
    enum MockResponse {
        Reply { status: u16, body: Vec<u8> },
        Fail(String),
    }

    impl MockHttpClient {
        /// Creates a new mock client
        pub fn new() -> Self {
            Self::default()
        }

        /// Configures a response for a method and URL
        pub fn on(self, method: Method, url: &str, status: u16, body: impl Into<Vec<u8>>) -> Self {
            self.responses.write().unwrap().insert(
                (method, url.to_string()),
                MockResponse::Reply {
                    status,
                    body: body.into(),
                },
            );
            self
        }

        /// Configures a GET response for a URL
        pub fn on_get(self, url: &str, status: u16, body: impl Into<Vec<u8>>) -> Self {
            self.on(Method::GET, url, status, body)
        }

        /// Configures a successful JSON GET response for a URL
        pub fn on_get_json(self, url: &str, data: &serde_json::Value) -> Self {
            self.on_get(url, 200, data.to_string())
        }

        /// Configures a connection-level failure for a method and URL
        pub fn on_fail(self, method: Method, url: &str, message: &str) -> Self {
            self.responses.write().unwrap().insert(
                (method, url.to_string()),
                MockResponse::Fail(message.to_string()),
            );
            self
        }

        /// Returns all recorded requests
        pub fn get_requests(&self) -> Vec<RecordedRequest> {
            self.requests.read().unwrap().clone()
        }

        /// Returns the number of requests made
        pub fn request_count(&self) -> usize {
            self.requests.read().unwrap().len()
        }
    }

    #[async_trait]
    impl HttpClient for MockHttpClient {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
            self.requests.write().unwrap().push(RecordedRequest {
                method: request.method.clone(),
                url: request.url.clone(),
                headers: request.headers.clone(),
                body: request.body.clone(),
            });

            let responses = self.responses.read().unwrap();
            let mock_response = responses
                .get(&(request.method.clone(), request.url.clone()))
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "No mock response configured for {} {}",
                        request.method,
                        request.url
                    )
                })?;

            match mock_response {
                MockResponse::Reply { status, body } => Ok(HttpResponse {
                    status: *status,
                    body: body.clone(),
                }),
                MockResponse::Fail(message) => Err(anyhow::anyhow!("{message}")),
            }
        }
    }
}
