//! Effective stock and price for a shopper's selection.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::key::{CompositeKey, derive_key};
use crate::record::ProductRecord;
use crate::variant::{Selection, VariantCombination};

/// What the storefront shows and validates against for a selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub stock: u32,
    /// Minor currency units.
    pub price: u64,
    /// Image of the matched combination, for switching the product photo.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// `false` when the product has variants but the selection did not
    /// identify a combination; stock and price are then the base fallback and
    /// say nothing about whether the item can be bought.
    pub matched: bool,
}

impl Resolution {
    pub fn is_in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// Resolve stock and price for `selection` on `product`.
///
/// - No active variant groups: the base stock and price, `matched = true`.
/// - A matrix entry whose options equal the selection: its stock, and its
///   price override or else the base price.
/// - Anything else (no selection, incomplete or stale selection): the base
///   stock and price with `matched = false`.
pub fn resolve(product: &ProductRecord, selection: Option<&Selection>) -> Resolution {
    if !product.has_variants() {
        return Resolution {
            stock: product.stock,
            price: product.price,
            image: None,
            matched: true,
        };
    }

    match selection.and_then(|s| find_combination(&product.inventory, s)) {
        Some(combination) => Resolution {
            stock: combination.stock,
            price: combination.effective_price(product.price),
            image: combination.image.clone(),
            matched: true,
        },
        None => {
            tracing::debug!(
                product = %product.id,
                selection = ?selection.map(ToString::to_string),
                "selection matches no combination; falling back to base stock and price"
            );
            Resolution {
                stock: product.stock,
                price: product.price,
                image: None,
                matched: false,
            }
        }
    }
}

/// The first matrix entry whose options equal `selection`.
pub fn find_combination<'a>(
    matrix: &'a [VariantCombination],
    selection: &Selection,
) -> Option<&'a VariantCombination> {
    matrix.iter().find(|combination| &combination.options == selection)
}

/// Availability for catalog-level badges.
///
/// Sum of matrix stock when the product has variants, otherwise base stock.
pub fn total_stock(product: &ProductRecord) -> u64 {
    if product.has_variants() {
        product.inventory.iter().map(|c| u64::from(c.stock)).sum()
    } else {
        u64::from(product.stock)
    }
}

/// Matrix entries keyed by composite key, for repeated lookups.
///
/// When the matrix holds equal option sets more than once the first entry
/// wins, matching [`find_combination`].
pub fn matrix_index(product: &ProductRecord) -> HashMap<CompositeKey, &VariantCombination> {
    let mut index = HashMap::with_capacity(product.inventory.len());
    for combination in &product.inventory {
        index
            .entry(derive_key(&product.id, Some(&combination.options)))
            .or_insert(combination);
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ProductId;
    use crate::variant::VariantGroup;
    use storefront_core::AggregateId;
    use uuid::Uuid;

    fn tee() -> ProductRecord {
        let mut record = ProductRecord::new(
            ProductId::new(AggregateId::from_uuid(Uuid::from_u128(5))),
            "Tee",
            999,
            50,
        );
        record.variants = vec![
            VariantGroup::new("Size", ["S", "M", "L"]),
            VariantGroup::new("Color", ["Red", "Blue"]),
        ];
        record.inventory = vec![
            VariantCombination {
                options: Selection::new().with("Size", "M").with("Color", "Blue"),
                stock: 3,
                price: None,
                sku: None,
                image: Some("m-blue.jpg".to_string()),
            },
            VariantCombination {
                options: Selection::new().with("Size", "L").with("Color", "Red"),
                stock: 7,
                price: Some(1499),
                sku: None,
                image: None,
            },
        ];
        record
    }

    #[test]
    fn match_without_override_uses_base_price() {
        let selection = Selection::new().with("Color", "Blue").with("Size", "M");
        let resolution = resolve(&tee(), Some(&selection));
        assert_eq!(resolution.stock, 3);
        assert_eq!(resolution.price, 999);
        assert_eq!(resolution.image.as_deref(), Some("m-blue.jpg"));
        assert!(resolution.matched);
    }

    #[test]
    fn match_with_override_uses_its_price() {
        let selection = Selection::new().with("Size", "L").with("Color", "Red");
        let resolution = resolve(&tee(), Some(&selection));
        assert_eq!((resolution.stock, resolution.price), (7, 1499));
    }

    #[test]
    fn incomplete_or_stale_selection_falls_back() {
        let product = tee();
        for selection in [
            Selection::new().with("Size", "M"),
            Selection::new().with("Size", "XL").with("Color", "Blue"),
            Selection::new().with("Size", "M").with("Color", "Blue").with("Fit", "Slim"),
        ] {
            let resolution = resolve(&product, Some(&selection));
            assert_eq!((resolution.stock, resolution.price), (50, 999));
            assert!(!resolution.matched);
        }
        assert!(!resolve(&product, None).matched);
    }

    #[test]
    fn products_without_variants_use_base_values() {
        let mut product = tee();
        product.variants = vec![VariantGroup::new("", ["ignored"])];
        let resolution = resolve(&product, Some(&Selection::new().with("Size", "M")));
        assert_eq!((resolution.stock, resolution.price), (50, 999));
        assert!(resolution.matched);
        assert_eq!(total_stock(&product), 50);
    }

    #[test]
    fn total_stock_sums_the_matrix() {
        assert_eq!(total_stock(&tee()), 10);
    }

    #[test]
    fn index_is_keyed_like_the_cart() {
        let product = tee();
        let index = matrix_index(&product);
        let key = derive_key(
            &product.id,
            Some(&Selection::new().with("Color", "Red").with("Size", "L")),
        );
        assert_eq!(index[&key].stock, 7);
        assert_eq!(index.len(), 2);
    }
}
