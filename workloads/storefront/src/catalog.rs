//! Product catalog loading.

use shop_data::{FetchClient, FetchError, Fetched};

use crate::product::Product;

/// Fetch the product list from `endpoint`.
///
/// One GET, no retry. A non-2xx status, a transport failure or a body that
/// is not a JSON array of products fails the whole load.
pub async fn load_products(
    client: &FetchClient,
    endpoint: &str,
) -> Result<Fetched<Vec<Product>>, FetchError> {
    client.fetch::<Vec<Product>>(endpoint).await
}

/// Parse a product list from a local JSON document.
pub fn parse_products(json: &str) -> Result<Vec<Product>, serde_json::Error> {
    serde_json::from_str(json)
}
