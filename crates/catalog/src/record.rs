//! The product record as persisted and as consumed by the storefront.

use serde::{Deserialize, Serialize};

use storefront_core::AggregateId;

use crate::variant::{VariantCombination, VariantGroup};

/// Product identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub AggregateId);

impl ProductId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl core::str::FromStr for ProductId {
    type Err = storefront_core::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// Catalog payload for one product.
///
/// `variants` is only written when non-empty and `inventory` only when there
/// are variants. Without active variant groups the base `stock`/`price` are
/// authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub id: ProductId,
    pub name: String,
    /// Base price in minor currency units (e.g. cents).
    pub price: u64,
    #[serde(default)]
    pub stock: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<VariantGroup>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inventory: Vec<VariantCombination>,
}

impl ProductRecord {
    /// A simple product without variants.
    pub fn new(id: ProductId, name: impl Into<String>, price: u64, stock: u32) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            stock,
            variants: Vec::new(),
            inventory: Vec::new(),
        }
    }

    /// Whether at least one variant group is active.
    pub fn has_variants(&self) -> bool {
        self.variants.iter().any(VariantGroup::is_active)
    }

}
