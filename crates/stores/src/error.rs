//! Unified error type for store operations.
//!
//! Collaborator failures keep their own error enums ([`StorageError`],
//! [`RemoteError`], `ConfigError`); this module layers the store-level
//! taxonomy on top. Every failure path degrades to "operation had no effect,
//! previous state preserved" - nothing here is fatal.

use thiserror::Error;

use crate::persistence::StorageError;
use crate::remote::RemoteError;

/// Store-level error type.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A product was added to the cart without a size selection.
    #[error("a size must be selected before adding to the cart")]
    MissingSize,

    /// An index-based cart operation pointed outside the line list.
    #[error("no cart line at index {index} (cart has {len} lines)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Device storage failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The remote product service failed.
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
