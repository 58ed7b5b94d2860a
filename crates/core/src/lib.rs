//! `storefront-core`: shared domain building blocks for the storefront engine.
//!
//! Everything here is **pure domain** (no IO, no storage, no transport).

pub mod aggregate;
pub mod error;
pub mod event;
pub mod id;
pub mod value_object;

pub use aggregate::{Aggregate, AggregateRoot};
pub use error::{DomainError, DomainResult};
pub use event::Event;
pub use id::AggregateId;
pub use value_object::{Quantity, ValueObject};
