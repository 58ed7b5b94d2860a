//! Catalog configuration.

use serde::{Deserialize, Serialize};

use crate::sku::DEFAULT_PLACEHOLDER;

pub const MAX_COMBINATIONS_ENV: &str = "STOREFRONT_MAX_COMBINATIONS";
pub const SKU_PLACEHOLDER_ENV: &str = "STOREFRONT_SKU_PLACEHOLDER";

const DEFAULT_MAX_COMBINATIONS: usize = 1000;

/// Limits and defaults applied when variant groups are (re)defined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Largest inventory matrix a product may expand to.
    pub max_combinations: usize,
    /// SKU prefix for products without a name.
    pub sku_placeholder: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            max_combinations: DEFAULT_MAX_COMBINATIONS,
            sku_placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }
}

impl CatalogConfig {
    /// Read overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup; unset or invalid values keep
    /// their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(MAX_COMBINATIONS_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(max) if max > 0 => config.max_combinations = max,
                _ => tracing::warn!(
                    value = %raw,
                    default = config.max_combinations,
                    "{} is not a positive integer; using default",
                    MAX_COMBINATIONS_ENV
                ),
            }
        }

        if let Some(raw) = lookup(SKU_PLACEHOLDER_ENV) {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                tracing::warn!("{} is blank; using default", SKU_PLACEHOLDER_ENV);
            } else {
                config.sku_placeholder = trimmed.to_uppercase();
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(CatalogConfig::from_lookup(lookup(&[])), CatalogConfig::default());
    }

    #[test]
    fn reads_overrides() {
        let config = CatalogConfig::from_lookup(lookup(&[
            (MAX_COMBINATIONS_ENV, " 250 "),
            (SKU_PLACEHOLDER_ENV, "item"),
        ]));
        assert_eq!(config.max_combinations, 250);
        assert_eq!(config.sku_placeholder, "ITEM");
    }

    #[test]
    fn invalid_values_keep_defaults() {
        let config = CatalogConfig::from_lookup(lookup(&[
            (MAX_COMBINATIONS_ENV, "0"),
            (SKU_PLACEHOLDER_ENV, "  "),
        ]));
        assert_eq!(config, CatalogConfig::default());
    }
}
