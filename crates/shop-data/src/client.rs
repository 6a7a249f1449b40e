//! Fetch client with load-id correlation.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use shop_core::LoadId;

use crate::error::FetchError;
use crate::transport::HttpTransport;

/// A decoded response plus what it cost to get it.
#[derive(Debug, Clone)]
pub struct Fetched<T> {
    /// Decoded body.
    pub value: T,
    /// HTTP status code.
    pub status: u16,
    /// Body size in bytes.
    pub bytes: usize,
    /// Time from request to decoded value.
    pub duration: Duration,
}

/// Fetch client for one page load.
///
/// Each call issues exactly one request; there is no retry, timeout or
/// cancellation.
#[derive(Clone)]
pub struct FetchClient {
    load_id: LoadId,
    transport: Arc<dyn HttpTransport>,
}

impl FetchClient {
    /// Create a new fetch client.
    pub fn new(load_id: LoadId, transport: Arc<dyn HttpTransport>) -> Self {
        Self { load_id, transport }
    }

    /// GET `url` and decode the body as JSON.
    pub async fn fetch<T: DeserializeOwned>(&self, url: &str) -> Result<Fetched<T>, FetchError> {
        let started = Instant::now();
        let resp = self.transport.get(url).await?;

        if !resp.is_success() {
            return Err(FetchError::Status {
                status: resp.status,
                url: url.to_string(),
            });
        }

        let value: T = serde_json::from_slice(&resp.body).map_err(|e| FetchError::Parse {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        Ok(Fetched {
            value,
            status: resp.status,
            bytes: resp.body.len(),
            duration: started.elapsed(),
        })
    }

    /// Get the load ID.
    pub fn load_id(&self) -> &LoadId {
        &self.load_id
    }
}

impl std::fmt::Debug for FetchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchClient")
            .field("load_id", &self.load_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::StaticTransport;
    use futures::executor::block_on;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        title: String,
    }

    const URL: &str = "http://catalog.test/products";

    fn client(transport: StaticTransport) -> (FetchClient, Arc<StaticTransport>) {
        let transport = Arc::new(transport);
        let client = FetchClient::new(LoadId::from_string("test"), transport.clone());
        (client, transport)
    }

    #[test]
    fn test_fetch_decodes_json() {
        let (client, transport) =
            client(StaticTransport::new().with_body(URL, r#"[{"title":"Shirt"}]"#));

        let fetched: Fetched<Vec<Item>> = block_on(client.fetch(URL)).unwrap();
        assert_eq!(fetched.value, vec![Item { title: "Shirt".to_string() }]);
        assert_eq!(fetched.status, 200);
        assert_eq!(fetched.bytes, 19);
        assert_eq!(transport.request_count(), 1);
    }

    #[test]
    fn test_fetch_status_error() {
        let (client, _) = client(StaticTransport::new().with_response(URL, 503, "busy"));
        let err = block_on(client.fetch::<Vec<Item>>(URL)).unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 503, .. }));
    }

    #[test]
    fn test_fetch_parse_error() {
        let (client, _) = client(StaticTransport::new().with_body(URL, "<html>oops</html>"));
        let err = block_on(client.fetch::<Vec<Item>>(URL)).unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn test_fetch_does_not_retry() {
        let (client, transport) = client(StaticTransport::new().with_failure(URL, "reset"));
        let err = block_on(client.fetch::<Vec<Item>>(URL)).unwrap_err();
        assert_eq!(err.kind(), "transport");
        assert_eq!(transport.request_count(), 1);
    }
}
