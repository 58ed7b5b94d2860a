//! Value objects: equality by value, not identity.

use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values. A
/// variant selection `{Color: Red}` is a value object; a product is not.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

/// A purchase quantity, always at least one.
///
/// Zero and negative quantities are rejected here, at the boundary, so the
/// cart merge logic never has to consider them.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(NonZeroU32);

impl Quantity {
    pub const ONE: Quantity = Quantity(NonZeroU32::MIN);

    pub fn new(value: u32) -> DomainResult<Self> {
        NonZeroU32::new(value)
            .map(Self)
            .ok_or_else(|| DomainError::validation("quantity must be at least 1"))
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// Sum two quantities, saturating at `u32::MAX`.
    pub fn saturating_add(self, other: Quantity) -> Quantity {
        Quantity(self.0.saturating_add(other.get()))
    }
}

impl ValueObject for Quantity {}

impl TryFrom<u32> for Quantity {
    type Error = DomainError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for u32 {
    fn from(value: Quantity) -> Self {
        value.get()
    }
}

impl core::fmt::Display for Quantity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}
