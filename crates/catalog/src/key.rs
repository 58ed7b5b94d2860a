//! Composite identity keys for `(product, selection)` pairs.
//!
//! The same key identifies an inventory matrix entry and a cart line, so the
//! resolver and the cart can never disagree about which variant is meant.

use serde::{Deserialize, Serialize};

use crate::record::ProductId;
use crate::variant::Selection;

/// Separates the product id from the selection pairs.
pub const PRODUCT_SEPARATOR: char = '|';
/// Separates `name:value` pairs from each other.
pub const PAIR_SEPARATOR: char = ',';
/// Separates a group name from its value.
pub const VALUE_SEPARATOR: char = ':';

const ESCAPE: char = '\\';

/// Canonical, order-independent key such as `"<product>|Color:Red,Size:M"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompositeKey(String);

impl CompositeKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for CompositeKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derive the composite key for a product and an optional selection.
///
/// An absent or empty selection yields the product id alone. Otherwise the
/// pairs are rendered in group-name order. Separator characters occurring
/// inside ids, names or values are backslash-escaped, which keeps the mapping
/// injective: distinct selections never share a key.
pub fn derive_key(product_id: &ProductId, selection: Option<&Selection>) -> CompositeKey {
    let mut key = String::new();
    push_escaped(&mut key, &product_id.to_string());

    let Some(selection) = selection.filter(|s| !s.is_empty()) else {
        return CompositeKey(key);
    };

    key.push(PRODUCT_SEPARATOR);
    for (i, (group, value)) in selection.iter().enumerate() {
        if i > 0 {
            key.push(PAIR_SEPARATOR);
        }
        push_escaped(&mut key, group);
        key.push(VALUE_SEPARATOR);
        push_escaped(&mut key, value);
    }
    CompositeKey(key)
}

fn push_escaped(out: &mut String, raw: &str) {
    for ch in raw.chars() {
        if matches!(ch, ESCAPE | PRODUCT_SEPARATOR | PAIR_SEPARATOR | VALUE_SEPARATOR) {
            out.push(ESCAPE);
        }
        out.push(ch);
    }
}
