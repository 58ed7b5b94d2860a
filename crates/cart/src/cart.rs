use serde::{Deserialize, Serialize};

use storefront_catalog::{CompositeKey, ProductId, Selection, derive_key};
use storefront_core::Quantity;

/// Product data captured when a line is added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    pub id: ProductId,
    pub name: String,
    /// Minor currency units.
    pub unit_price: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// One cart line.
///
/// Holds a copy of the price and options taken at add-time; later catalog
/// changes do not reach lines already in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_variants: Option<Selection>,
    pub quantity: Quantity,
    pub unit_price: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl CartLine {
    /// Identity of this line, recomputed from the stored selection.
    pub fn key(&self) -> CompositeKey {
        derive_key(&self.product_id, self.selected_variants.as_ref())
    }

    pub fn line_total(&self) -> u64 {
        self.unit_price.saturating_mul(u64::from(self.quantity.get()))
    }
}

/// A cart: at most one line per composite key.
///
/// Serialized as the bare sequence of lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CartLine>", into = "Vec<CartLine>")]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a cart from persisted lines.
    ///
    /// Keys are recomputed from each line's selection; lines that turn out to
    /// share a key are merged into the first one.
    pub fn from_lines(lines: impl IntoIterator<Item = CartLine>) -> Self {
        let mut cart = Self::new();
        for line in lines {
            let key = line.key();
            match cart.position(&key) {
                Some(i) => {
                    tracing::warn!(key = %key, "merging duplicate cart line on load");
                    let existing = &mut cart.lines[i];
                    existing.quantity = existing.quantity.saturating_add(line.quantity);
                }
                None => cart.lines.push(line),
            }
        }
        cart
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<CartLine> {
        self.lines
    }

    pub fn line(&self, key: &CompositeKey) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.key() == key)
    }

    /// Quantity already in the cart under `key` (0 if none).
    pub fn quantity_for(&self, key: &CompositeKey) -> u32 {
        self.line(key).map_or(0, |line| line.quantity.get())
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total units across all lines.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity.get())).sum()
    }

    pub fn subtotal(&self) -> u64 {
        self.lines
            .iter()
            .fold(0u64, |acc, line| acc.saturating_add(line.line_total()))
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add `quantity` of a product, merging into an existing line with the
    /// same key. No stock cap is applied here.
    pub fn add(&mut self, snapshot: &ProductSnapshot, selection: Option<&Selection>, quantity: Quantity) {
        let key = derive_key(&snapshot.id, selection);
        match self.position(&key) {
            Some(i) => {
                let existing = &mut self.lines[i];
                if existing.unit_price != snapshot.unit_price {
                    tracing::debug!(
                        key = %key,
                        kept = existing.unit_price,
                        offered = snapshot.unit_price,
                        "keeping the price captured when the line was first added"
                    );
                }
                existing.quantity = existing.quantity.saturating_add(quantity);
            }
            None => self.lines.push(CartLine {
                product_id: snapshot.id,
                name: snapshot.name.clone(),
                selected_variants: selection.cloned(),
                quantity,
                unit_price: snapshot.unit_price,
                image: snapshot.image.clone(),
            }),
        }
    }

    /// Set the quantity of a line; zero removes it. Returns the affected line's
    /// previous quantity, or `None` if no line has that key.
    pub fn set_quantity(&mut self, key: &CompositeKey, quantity: u32) -> Option<u32> {
        let i = self.position(key)?;
        let previous = self.lines[i].quantity.get();
        match Quantity::new(quantity) {
            Ok(quantity) => self.lines[i].quantity = quantity,
            Err(_) => {
                self.lines.remove(i);
            }
        }
        Some(previous)
    }

    pub fn remove_line(&mut self, key: &CompositeKey) -> Option<CartLine> {
        let i = self.position(key)?;
        Some(self.lines.remove(i))
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    fn position(&self, key: &CompositeKey) -> Option<usize> {
        self.lines.iter().position(|line| &line.key() == key)
    }
}

impl From<Vec<CartLine>> for Cart {
    fn from(lines: Vec<CartLine>) -> Self {
        Self::from_lines(lines)
    }
}

impl From<Cart> for Vec<CartLine> {
    fn from(cart: Cart) -> Self {
        cart.lines
    }
}

/// Value-in/value-out form of [`Cart::add`].
pub fn add_line(
    mut cart: Cart,
    snapshot: &ProductSnapshot,
    selection: Option<&Selection>,
    quantity: Quantity,
) -> Cart {
    cart.add(snapshot, selection, quantity);
    cart
}
