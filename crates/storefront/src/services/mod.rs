//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `cart` - The cart store: add, remove and re-quantify line items against
//!   remote stock, persisting every change

pub mod cart;

pub use cart::{CartOpError, CartStore, UpdateProductAmount};
