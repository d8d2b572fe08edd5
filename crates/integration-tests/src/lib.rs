//! Integration tests for Modora.
//!
//! Exercises whole-session flows across the stores with scripted
//! collaborator doubles: cart persistence across store lifetimes, and
//! favorites staying consistent with the catalogue through optimistic
//! toggles and rollbacks.
//!
//! # Test Categories
//!
//! - `cart_session` - cart persistence contract across sessions
//! - `favorites_flow` - favorites/catalogue reconciliation and rollbacks
//!
//! This crate only provides the shared [`ScriptedProductApi`] double; the
//! tests live under `tests/`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use modora_core::{Product, ProductId};
use modora_stores::remote::{ProductApi, RemoteError};

/// Scripted product service shared by the integration tests.
///
/// Serves a fixed catalogue, records every favorite call, and can be flipped
/// into a rejecting mode to exercise rollback paths.
#[derive(Default)]
pub struct ScriptedProductApi {
    catalogue: Mutex<Vec<Product>>,
    reject_favorites: AtomicBool,
    favorite_calls: Mutex<Vec<(ProductId, bool)>>,
}

impl ScriptedProductApi {
    /// Create a service serving the given catalogue.
    #[must_use]
    pub fn with_catalogue(products: Vec<Product>) -> Self {
        Self {
            catalogue: Mutex::new(products),
            ..Self::default()
        }
    }

    /// Make every subsequent favorite call fail with a 500.
    pub fn reject_favorites(&self, reject: bool) {
        self.reject_favorites.store(reject, Ordering::SeqCst);
    }

    /// Favorite calls observed so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn favorite_calls(&self) -> Vec<(ProductId, bool)> {
        self.favorite_calls
            .lock()
            .expect("favorite call log poisoned")
            .clone()
    }
}

#[async_trait]
impl ProductApi for ScriptedProductApi {
    async fn fetch_products(&self) -> Result<Vec<Product>, RemoteError> {
        Ok(self
            .catalogue
            .lock()
            .map_err(|e| RemoteError::Api {
                status: 500,
                message: e.to_string(),
            })?
            .clone())
    }

    async fn set_favorite(&self, id: &ProductId, is_favorite: bool) -> Result<(), RemoteError> {
        if let Ok(mut calls) = self.favorite_calls.lock() {
            calls.push((id.clone(), is_favorite));
        }
        tokio::task::yield_now().await;

        if self.reject_favorites.load(Ordering::SeqCst) {
            return Err(RemoteError::Api {
                status: 500,
                message: "favorite rejected".to_string(),
            });
        }

        // Keep the served catalogue in step with confirmed toggles.
        if let Ok(mut catalogue) = self.catalogue.lock() {
            if let Some(product) = catalogue.iter_mut().find(|p| p.id == *id) {
                product.is_favorite = is_favorite;
            }
        }
        Ok(())
    }
}
