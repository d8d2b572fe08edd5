//! Favorites store with optimistic toggles.
//!
//! Toggling applies locally before the network round-trip so the UI responds
//! instantly, then confirms against the remote product service. A rejection
//! or transport failure rolls the flag back to its pre-toggle value.
//!
//! Toggles on the same product are serialized through a per-product async
//! gate: a second toggle issued before the first resolves waits its turn, so
//! N back-to-back toggles always land on the parity of N and a slow
//! rollback can never clobber a newer toggle's state.
//!
//! Favorites are memory-only; they are reconciled against the product
//! service's `isFavorite` flags on each catalogue fetch via
//! [`FavoritesStore::sync_from`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, broadcast};
use tracing::warn;

use modora_core::{Product, ProductId};

use crate::remote::ProductApi;

/// Observer callback mirroring the flag into an external product list.
///
/// Invoked once with the optimistic value and, if the remote call fails,
/// once more with the restored value.
pub type LocalSync<'a> = &'a (dyn Fn(&ProductId, bool) + Send + Sync);

/// A favorite flag change, emitted on optimistic apply and on rollback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteEvent {
    pub product_id: ProductId,
    pub is_favorite: bool,
}

/// The favorited-product set.
///
/// Cheap to clone; clones share state.
#[derive(Clone)]
pub struct FavoritesStore {
    inner: Arc<Inner>,
}

struct Inner {
    favorites: Mutex<HashMap<ProductId, bool>>,
    /// One gate per product so same-product toggles queue behind the
    /// in-flight remote confirmation. Entries are retained for the session;
    /// the set is bounded by the catalogue size.
    gates: Mutex<HashMap<ProductId, Arc<AsyncMutex<()>>>>,
    api: Arc<dyn ProductApi>,
    events: broadcast::Sender<FavoriteEvent>,
}

impl FavoritesStore {
    /// Create an empty favorites store over the given product service.
    #[must_use]
    pub fn new(api: Arc<dyn ProductApi>) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            inner: Arc::new(Inner {
                favorites: Mutex::new(HashMap::new()),
                gates: Mutex::new(HashMap::new()),
                api,
                events,
            }),
        }
    }

    /// Toggle the favorite flag for `product_id`.
    ///
    /// The new flag is applied locally before the remote call and
    /// `on_local_sync` (if provided) is invoked with it immediately. On
    /// remote confirmation the new flag sticks and `Some(new_flag)` is
    /// returned. On rejection or network failure the flag is rolled back,
    /// `on_local_sync` is invoked again with the restored value, and `None`
    /// is returned - the error is logged, never propagated, to keep UI call
    /// sites simple.
    pub async fn toggle_favorite(
        &self,
        product_id: &ProductId,
        on_local_sync: Option<LocalSync<'_>>,
    ) -> Option<bool> {
        let gate = self.gate(product_id);
        let _serialized = gate.lock().await;

        let current = self.is_favorite(product_id);
        let next = !current;
        self.apply(product_id, next, on_local_sync);

        match self.inner.api.set_favorite(product_id, next).await {
            Ok(()) => Some(next),
            Err(err) => {
                warn!(
                    product_id = %product_id,
                    error = %err,
                    "favorite toggle rejected, rolling back"
                );
                self.apply(product_id, current, on_local_sync);
                None
            }
        }
    }

    /// Whether `product_id` is currently favorited.
    ///
    /// Absent entries and `false` entries are equivalent.
    #[must_use]
    pub fn is_favorite(&self, product_id: &ProductId) -> bool {
        self.favorites().get(product_id).copied().unwrap_or(false)
    }

    /// Number of favorited products.
    #[must_use]
    pub fn count(&self) -> usize {
        self.favorites().values().filter(|&&flag| flag).count()
    }

    /// Ids of all favorited products, sorted for deterministic output.
    #[must_use]
    pub fn ids_of(&self) -> Vec<ProductId> {
        let mut ids: Vec<ProductId> = self
            .favorites()
            .iter()
            .filter(|&(_, &flag)| flag)
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Reconcile the whole set against a fresh product fetch.
    ///
    /// Replaces local flags with the service's `is_favorite` flags; products
    /// no longer in the catalogue drop out.
    pub fn sync_from(&self, products: &[Product]) {
        let mut favorites = self.favorites();
        favorites.clear();
        favorites.extend(
            products
                .iter()
                .map(|product| (product.id.clone(), product.is_favorite)),
        );
    }

    /// Subscribe to favorite flag changes.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<FavoriteEvent> {
        self.inner.events.subscribe()
    }

    fn apply(&self, product_id: &ProductId, is_favorite: bool, on_local_sync: Option<LocalSync<'_>>) {
        self.favorites().insert(product_id.clone(), is_favorite);
        let _ = self.inner.events.send(FavoriteEvent {
            product_id: product_id.clone(),
            is_favorite,
        });
        if let Some(sync) = on_local_sync {
            sync(product_id, is_favorite);
        }
    }

    fn gate(&self, product_id: &ProductId) -> Arc<AsyncMutex<()>> {
        self.inner
            .gates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(product_id.clone())
            .or_default()
            .clone()
    }

    fn favorites(&self) -> MutexGuard<'_, HashMap<ProductId, bool>> {
        self.inner
            .favorites
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
