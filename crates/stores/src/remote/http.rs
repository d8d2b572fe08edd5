//! `reqwest`-backed client for the product REST API.

use async_trait::async_trait;
use serde::Serialize;
use tracing::instrument;
use url::Url;

use modora_core::{Product, ProductId, RawProduct};

use super::{ProductApi, RemoteError};
use crate::config::RemoteConfig;

/// HTTP implementation of [`ProductApi`].
///
/// Cheap to clone; the underlying `reqwest::Client` pools connections.
#[derive(Debug, Clone)]
pub struct HttpProductApi {
    client: reqwest::Client,
    base_url: Url,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FavoriteBody {
    is_favorite: bool,
}

impl HttpProductApi {
    /// Create a new product API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &RemoteConfig) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, RemoteError> {
        self.base_url
            .join(path)
            .map_err(|e| RemoteError::Request(format!("invalid endpoint {path}: {e}")))
    }
}

#[async_trait]
impl ProductApi for HttpProductApi {
    #[instrument(skip(self))]
    async fn fetch_products(&self) -> Result<Vec<Product>, RemoteError> {
        let url = self.endpoint("api/Product")?;
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RemoteError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let raw: Vec<RawProduct> = response.json().await?;
        Ok(raw.into_iter().map(Product::from).collect())
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn set_favorite(&self, id: &ProductId, is_favorite: bool) -> Result<(), RemoteError> {
        let url = self.endpoint(&format!("api/Product/{id}"))?;
        let response = self
            .client
            .put(url)
            .json(&FavoriteBody { is_favorite })
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RemoteError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_join() {
        let config = RemoteConfig::new(Url::parse("https://shop.example.com/").unwrap());
        let api = HttpProductApi::new(&config).unwrap();
        assert_eq!(
            api.endpoint("api/Product").unwrap().as_str(),
            "https://shop.example.com/api/Product"
        );
        assert_eq!(
            api.endpoint("api/Product/P1").unwrap().as_str(),
            "https://shop.example.com/api/Product/P1"
        );
    }

    #[test]
    fn test_favorite_body_shape() {
        let body = serde_json::to_string(&FavoriteBody { is_favorite: true }).unwrap();
        assert_eq!(body, r#"{"isFavorite":true}"#);
    }
}
