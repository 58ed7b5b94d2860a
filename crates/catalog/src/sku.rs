//! Human-readable SKU labels for freshly generated combinations.

use rand::Rng;
use rand::rngs::ThreadRng;

use crate::variant::Selection;

/// Prefix used when the product has no name yet.
pub const DEFAULT_PLACEHOLDER: &str = "PRD";

const SEPARATOR: &str = "-";
const PREFIX_LEN: usize = 3;
const OPTION_LEN: usize = 2;

/// Builds labels such as `TSH-BL-ME-417`.
///
/// The trailing three-digit token is random. Nothing here checks the label
/// against the rest of the catalog, so two combinations can end up with the
/// same SKU.
#[derive(Debug, Clone)]
pub struct SkuAllocator<R = ThreadRng> {
    rng: R,
    placeholder: String,
}

impl SkuAllocator<ThreadRng> {
    pub fn new() -> Self {
        Self::with_rng(rand::thread_rng())
    }
}

impl Default for SkuAllocator<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> SkuAllocator<R> {
    /// Use a specific random source (a seeded `StdRng` in tests).
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Label a combination of `product_name`.
    ///
    /// Option fragments follow the selection's group-name order; blank values
    /// contribute no fragment.
    pub fn allocate(&mut self, product_name: &str, selection: &Selection) -> String {
        let prefix = fragment(product_name, PREFIX_LEN).unwrap_or_else(|| self.placeholder.clone());

        let mut parts = vec![prefix];
        parts.extend(selection.values().filter_map(|value| fragment(value, OPTION_LEN)));
        parts.push(self.rng.gen_range(100..=999u16).to_string());

        parts.join(SEPARATOR)
    }
}

/// First `len` letters or digits of the input, uppercased.
///
/// Punctuation and whitespace are skipped so a fragment never contains the
/// separator.
fn fragment(raw: &str, len: usize) -> Option<String> {
    let picked: String = raw.chars().filter(|c| c.is_alphanumeric()).take(len).collect();
    if picked.is_empty() {
        return None;
    }
    Some(picked.to_uppercase())
}
