//! RocketShoes Storefront library.
//!
//! Client-side cart state for the RocketShoes shop: a cart store that checks
//! quantities against the remote stock API and persists every change to a
//! key-value store.
//!
//! # Modules
//!
//! - [`catalog`] - Product and stock lookups (`reqwest`, `moka` product cache)
//! - [`storage`] - Key-value persistence and the cart serialization boundary
//! - [`notify`] - User-facing notifications
//! - [`services`] - The cart store
//! - [`state`] - Wiring from configuration to a ready cart store

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod notify;
pub mod services;
pub mod state;
pub mod storage;
