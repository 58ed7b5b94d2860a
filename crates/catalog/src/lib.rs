//! Catalog domain: variant groups, the inventory matrix and its resolution.
//!
//! Everything in this crate is deterministic domain logic over plain values
//! (no IO, no HTTP, no storage). The one exception is the random token at the
//! end of a generated SKU, and even that source is injectable.

pub mod config;
pub mod generator;
pub mod key;
pub mod product;
pub mod reconcile;
pub mod record;
pub mod resolver;
pub mod sku;
pub mod variant;

pub use config::CatalogConfig;
pub use generator::{combination_count, generate, generate_capped};
pub use key::{CompositeKey, derive_key};
pub use product::{
    BaseInventorySet, CombinationEdited, CreateProduct, DefineVariants, EditCombination, Product,
    ProductCommand, ProductCreated, ProductEvent, SetBaseInventory, VariantsDefined,
};
pub use reconcile::{Reconciliation, reconcile, reconcile_with_report};
pub use record::{ProductId, ProductRecord};
pub use resolver::{Resolution, find_combination, matrix_index, resolve, total_stock};
pub use sku::SkuAllocator;
pub use variant::{Selection, VariantCombination, VariantGroup};
