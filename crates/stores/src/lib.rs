//! Modora Stores - cart and favorites state management.
//!
//! The two stores at the heart of the storefront:
//!
//! - [`cart::CartStore`] - the shopping cart: line-item merge rules, derived
//!   totals, and best-effort persistence to device storage.
//! - [`favorites::FavoritesStore`] - the favorited-product set: optimistic
//!   toggles confirmed against the remote product service, rolled back when
//!   the service rejects them.
//!
//! Both stores are independent and depend only on the two collaborator
//! interfaces defined here: [`persistence::KeyValueStorage`] (async key-value
//! device storage) and [`remote::ProductApi`] (the product REST service).
//! Display layers call the stores' operations and observe state through the
//! channels the stores expose; nothing else mutates store state.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod favorites;
pub mod persistence;
pub mod remote;

pub use cart::CartStore;
pub use catalog::Catalog;
pub use config::{ConfigError, RemoteConfig};
pub use error::StoreError;
pub use favorites::{FavoriteEvent, FavoritesStore};
pub use persistence::{KeyValueStorage, MemoryStorage, StorageError};
pub use remote::{HttpProductApi, ProductApi, RemoteError};
