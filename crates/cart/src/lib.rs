//! Shopping cart line items keyed by product + variant selection.
//!
//! Lines are identified with the catalog's composite key, the same key the
//! inventory resolver uses, so "same variant" means the same thing in both
//! places.

pub mod availability;
pub mod cart;

pub use availability::{add_to_cart, ensure_available, snapshot_for};
pub use cart::{Cart, CartLine, ProductSnapshot, add_line};
