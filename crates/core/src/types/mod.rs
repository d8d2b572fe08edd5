//! Core types for Modora.
//!
//! This module provides type-safe wrappers for common domain concepts.

mod cart;
mod id;
mod price;
mod product;

pub use cart::{CartLineItem, CartSummary};
pub use id::{CategoryId, ProductId};
pub use price::{Price, PriceError};
pub use product::{Product, RawProduct};
