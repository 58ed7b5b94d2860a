//! Stock checks and pricing at add-to-cart time.

use storefront_catalog::{ProductRecord, Resolution, Selection, derive_key, resolve};
use storefront_core::{DomainError, DomainResult, Quantity};

use crate::cart::{Cart, ProductSnapshot};

/// Snapshot of `product` priced for `selection`.
///
/// Uses the resolved price (variant override or base price) and the matched
/// combination's image, if any.
pub fn snapshot_for(product: &ProductRecord, selection: Option<&Selection>) -> ProductSnapshot {
    let resolution = resolve(product, selection);
    ProductSnapshot {
        id: product.id,
        name: product.name.clone(),
        unit_price: resolution.price,
        image: resolution.image,
    }
}

/// Check that adding `quantity` keeps the line within the resolved stock.
///
/// A selection that does not identify a combination of a variant product is
/// rejected: the resolver's base-stock fallback is not a promise that the
/// item can be bought.
pub fn ensure_available(
    cart: &Cart,
    product: &ProductRecord,
    selection: Option<&Selection>,
    quantity: Quantity,
) -> DomainResult<Resolution> {
    let resolution = resolve(product, selection);
    if !resolution.matched {
        return Err(DomainError::validation(format!(
            "selection does not match any variant of '{}'",
            product.name
        )));
    }

    let key = derive_key(&product.id, line_selection(product, selection));
    let wanted = u64::from(cart.quantity_for(&key)) + u64::from(quantity.get());
    if wanted > u64::from(resolution.stock) {
        return Err(DomainError::invariant(format!(
            "insufficient stock for '{}': requested {wanted}, available {}",
            product.name, resolution.stock
        )));
    }

    Ok(resolution)
}

/// Validate, price and add in one step.
pub fn add_to_cart(
    mut cart: Cart,
    product: &ProductRecord,
    selection: Option<&Selection>,
    quantity: Quantity,
) -> DomainResult<Cart> {
    ensure_available(&cart, product, selection, quantity)?;
    let selection = line_selection(product, selection);
    cart.add(&snapshot_for(product, selection), selection, quantity);
    Ok(cart)
}

/// The selection a cart line is keyed on. A product without active variant
/// groups has one line whatever the shopper sent, so its base stock caps
/// every add.
fn line_selection<'a>(product: &ProductRecord, selection: Option<&'a Selection>) -> Option<&'a Selection> {
    if product.has_variants() { selection } else { None }
}
