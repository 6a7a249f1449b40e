//! HTTP transports.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::FetchError;

/// A received HTTP response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// Raw body bytes.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Create a new response.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Check if the response was successful (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Something that can perform a GET request.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Perform a single GET request.
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError>;
}

/// Transport backed by `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with a default client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport around an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        let transport_err = |e: reqwest::Error| FetchError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        };

        let resp = self.client.get(url).send().await.map_err(transport_err)?;
        let status = resp.status().as_u16();
        let body = resp.bytes().await.map_err(transport_err)?;

        Ok(HttpResponse::new(status, body.to_vec()))
    }
}

#[derive(Debug, Clone)]
enum StaticRoute {
    Respond(HttpResponse),
    Fail(String),
}

/// Transport answering from a fixed table of URLs.
///
/// Used for local product files and tests. Unknown URLs fail with a
/// transport error.
#[derive(Debug, Default)]
pub struct StaticTransport {
    routes: HashMap<String, StaticRoute>,
    requests: AtomicUsize,
}

impl StaticTransport {
    /// Create an empty transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `url` with a status and body.
    pub fn with_response(mut self, url: impl Into<String>, status: u16, body: impl Into<Vec<u8>>) -> Self {
        self.routes.insert(
            url.into(),
            StaticRoute::Respond(HttpResponse::new(status, body)),
        );
        self
    }

    /// Answer `url` with a 200 and the given body.
    pub fn with_body(self, url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.with_response(url, 200, body)
    }

    /// Fail requests to `url` with a transport error.
    pub fn with_failure(mut self, url: impl Into<String>, message: impl Into<String>) -> Self {
        self.routes
            .insert(url.into(), StaticRoute::Fail(message.into()));
        self
    }

    /// Number of requests received so far.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpTransport for StaticTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        match self.routes.get(url) {
            Some(StaticRoute::Respond(resp)) => Ok(resp.clone()),
            Some(StaticRoute::Fail(message)) => Err(FetchError::Transport {
                url: url.to_string(),
                message: message.clone(),
            }),
            None => Err(FetchError::Transport {
                url: url.to_string(),
                message: "no route configured".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn test_static_routes() {
        let transport = StaticTransport::new()
            .with_body("http://a/products", "[]")
            .with_response("http://a/missing", 404, "not found")
            .with_failure("http://a/down", "connection refused");

        let ok = block_on(transport.get("http://a/products")).unwrap();
        assert!(ok.is_success());
        assert_eq!(ok.body, b"[]");

        let missing = block_on(transport.get("http://a/missing")).unwrap();
        assert_eq!(missing.status, 404);
        assert!(!missing.is_success());

        let down = block_on(transport.get("http://a/down")).unwrap_err();
        assert_eq!(down.kind(), "transport");

        let unknown = block_on(transport.get("http://b/")).unwrap_err();
        assert!(unknown.to_string().contains("no route configured"));

        assert_eq!(transport.request_count(), 4);
    }
}
