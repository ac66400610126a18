//! RocketShoes Core - Shared cart types.
//!
//! This crate provides the types shared by the RocketShoes components:
//! - `storefront` - Cart store, catalog client and persistence
//! - `cli` - Command-line cart front end
//!
//! # Architecture
//!
//! The core crate contains only types and pure cart transformations - no I/O,
//! no storage access, no HTTP clients. Every cart mutation produces a new
//! [`Cart`] value; committing it anywhere is the caller's job.
//!
//! # Modules
//!
//! - [`types`] - Product IDs, prices, line items, stock records and the cart

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
