//! Remote product service collaborator interface.
//!
//! The product catalogue and the favorite flag live server-side behind a JSON
//! REST API. The stores consume the [`ProductApi`] trait; [`HttpProductApi`]
//! is the `reqwest`-backed implementation. Raw payload normalization happens
//! inside the HTTP layer, so trait consumers only ever see the canonical
//! [`Product`] shape.

mod http;

pub use http::HttpProductApi;

use async_trait::async_trait;
use thiserror::Error;

use modora_core::{Product, ProductId};

/// Errors that can occur when talking to the product service.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// HTTP request failed (connect, timeout, decode).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// A request could not be constructed.
    #[error("invalid request: {0}")]
    Request(String),
}

/// Product REST service consumed by the stores.
#[async_trait]
pub trait ProductApi: Send + Sync {
    /// Fetch the full product list, normalized to the canonical shape.
    async fn fetch_products(&self) -> Result<Vec<Product>, RemoteError>;

    /// Set the favorite flag for one product.
    ///
    /// Any non-2xx response is a failure; callers treat it as a rollback
    /// trigger.
    async fn set_favorite(&self, id: &ProductId, is_favorite: bool) -> Result<(), RemoteError>;
}
