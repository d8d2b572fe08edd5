//! Modora Core - Shared types library.
//!
//! This crate provides the domain types shared by the Modora storefront
//! state-management crates:
//! - `stores` - Cart and favorites state stores
//! - integration tests and any future front-end bindings
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no storage
//! access. Everything arriving from the remote product API is normalized into
//! these canonical shapes at the ingestion boundary; the stores never see raw
//! wire payloads.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, price normalization, product and cart shapes

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
