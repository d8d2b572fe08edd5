//! Shopping cart store.
//!
//! Owns the ordered list of cart line items and the persistence contract:
//! every mutation updates memory first, then writes the full snapshot to
//! device storage under `"cartItems"` - but never before [`CartStore::initialize`]
//! has finished, so a not-yet-restored cart can't be clobbered by an empty
//! write at startup. Persistence is best-effort: write failures are logged
//! and the in-memory state stays authoritative for the session.
//!
//! The store is single-writer: mutations take `&mut self` and await their
//! snapshot write inline, which also keeps writes in issuance order.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::warn;

use modora_core::{CartLineItem, CartSummary, Product};

use crate::error::StoreError;
use crate::persistence::{CART_ITEMS_KEY, KeyValueStorage, StorageError};

/// The shopping cart.
pub struct CartStore {
    items: Vec<CartLineItem>,
    loaded: bool,
    storage: Arc<dyn KeyValueStorage>,
    summary_tx: watch::Sender<CartSummary>,
}

impl CartStore {
    /// Create an empty, not-yet-loaded cart over the given storage.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        let (summary_tx, _) = watch::channel(CartSummary::default());
        Self {
            items: Vec::new(),
            loaded: false,
            storage,
            summary_tx,
        }
    }

    /// Restore the persisted snapshot from device storage.
    ///
    /// A missing key leaves the cart empty. An unreadable or corrupt payload
    /// also leaves the cart empty and returns the storage error so the caller
    /// can report it; the store stays fully usable either way. The store is
    /// marked loaded in every case, including failure, so that subsequent
    /// mutations persist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] when the read fails or the stored
    /// payload does not deserialize. Non-fatal: the cart simply starts empty.
    pub async fn initialize(&mut self) -> Result<(), StoreError> {
        let outcome = self.storage.get(CART_ITEMS_KEY).await;
        self.loaded = true;

        match outcome {
            Ok(Some(payload)) => match serde_json::from_str::<Vec<CartLineItem>>(&payload) {
                Ok(items) => {
                    self.items = items;
                    self.notify();
                    Ok(())
                }
                Err(err) => {
                    self.items.clear();
                    self.notify();
                    Err(StoreError::Storage(StorageError::Corrupt(err)))
                }
            },
            Ok(None) => Ok(()),
            Err(err) => {
                self.items.clear();
                self.notify();
                Err(err.into())
            }
        }
    }

    /// Add `product` in `size` to the cart.
    ///
    /// A line already holding the same `(product_id, size)` pair absorbs the
    /// candidate's quantity instead of duplicating - that is the expected
    /// merge path, not an error. New combinations append at the end, so
    /// display order follows insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MissingSize`] for an empty or whitespace size;
    /// no state changes in that case.
    pub async fn add_item(&mut self, product: &Product, size: &str) -> Result<(), StoreError> {
        if size.trim().is_empty() {
            return Err(StoreError::MissingSize);
        }

        let candidate = CartLineItem::for_product(product, size);
        match self
            .items
            .iter_mut()
            .find(|line| line.matches(&product.id, size))
        {
            Some(line) => line.quantity += candidate.quantity,
            None => self.items.push(candidate),
        }

        self.after_mutation().await;
        Ok(())
    }

    /// Delete the line at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::IndexOutOfRange`] for an invalid position; the
    /// cart is unchanged. (Erroring was chosen over a silent no-op so call
    /// sites with stale indices surface immediately.)
    pub async fn remove_item(&mut self, index: usize) -> Result<(), StoreError> {
        self.check_index(index)?;
        self.items.remove(index);
        self.after_mutation().await;
        Ok(())
    }

    /// Increment the quantity of the line at `index` by one.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::IndexOutOfRange`] for an invalid position.
    pub async fn increase_quantity(&mut self, index: usize) -> Result<(), StoreError> {
        self.check_index(index)?;
        if let Some(line) = self.items.get_mut(index) {
            line.quantity += 1;
        }
        self.after_mutation().await;
        Ok(())
    }

    /// Decrement the quantity of the line at `index` by one.
    ///
    /// A line at quantity one is removed entirely; quantity never reaches
    /// zero while the line exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::IndexOutOfRange`] for an invalid position.
    pub async fn decrease_quantity(&mut self, index: usize) -> Result<(), StoreError> {
        self.check_index(index)?;
        let remove_line = self.items.get(index).is_some_and(|line| line.quantity == 1);
        if remove_line {
            self.items.remove(index);
        } else if let Some(line) = self.items.get_mut(index) {
            line.quantity -= 1;
        }
        self.after_mutation().await;
        Ok(())
    }

    /// Empty the cart.
    pub async fn clear(&mut self) {
        self.items.clear();
        self.after_mutation().await;
    }

    /// Hand the cart contents off to checkout, leaving the cart empty.
    ///
    /// The emptied snapshot is persisted so an interrupted session does not
    /// resurrect already-ordered items.
    pub async fn take_for_checkout(&mut self) -> Vec<CartLineItem> {
        let items = std::mem::take(&mut self.items);
        self.after_mutation().await;
        items
    }

    /// Current line items in display (insertion) order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Whether the initial persisted snapshot has been restored (or the
    /// restore attempt has finished).
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Derived totals, recomputed on every read.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        CartSummary::of(&self.items)
    }

    /// Subscribe to summary updates.
    ///
    /// The channel carries the latest [`CartSummary`] after every mutation;
    /// display layers re-render from it instead of reaching into the store.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartSummary> {
        self.summary_tx.subscribe()
    }

    fn check_index(&self, index: usize) -> Result<(), StoreError> {
        if index >= self.items.len() {
            return Err(StoreError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(())
    }

    fn notify(&self) {
        self.summary_tx.send_replace(self.summary());
    }

    async fn after_mutation(&mut self) {
        self.notify();
        self.persist().await;
    }

    /// Best-effort write of the full current snapshot.
    ///
    /// Skipped until the initial load has finished. Failures are logged and
    /// never roll back the in-memory mutation.
    async fn persist(&self) {
        if !self.loaded {
            return;
        }

        let payload = match serde_json::to_string(&self.items) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(error = %err, "failed to serialize cart snapshot");
                return;
            }
        };

        if let Err(err) = self.storage.set(CART_ITEMS_KEY, &payload).await {
            warn!(error = %err, "failed to persist cart snapshot");
        }
    }
}
