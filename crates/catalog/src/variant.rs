//! Variant groups, selections and inventory matrix entries.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use storefront_core::ValueObject;

/// A named product attribute (e.g. "Color") and its ordered option list.
///
/// Groups arrive straight from the admin form, so blank names and blank
/// options are representable. Such groups are *inactive* and are skipped by
/// generation; [`VariantGroup::normalized`] gives the trimmed, blank-free form
/// that gets persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantGroup {
    pub name: String,
    #[serde(default)]
    pub options: Vec<String>,
}

impl VariantGroup {
    pub fn new<I, S>(name: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            options: options.into_iter().map(Into::into).collect(),
        }
    }

    /// Group name with surrounding whitespace removed.
    pub fn trimmed_name(&self) -> &str {
        self.name.trim()
    }

    /// Trimmed, non-blank options in input order. Duplicates are kept.
    pub fn valid_options(&self) -> impl Iterator<Item = &str> + '_ {
        self.options
            .iter()
            .map(|option| option.trim())
            .filter(|option| !option.is_empty())
    }

    /// A group takes part in generation only with a name and at least one option.
    pub fn is_active(&self) -> bool {
        !self.trimmed_name().is_empty() && self.valid_options().next().is_some()
    }

    /// Trimmed copy without blank options, or `None` for an inactive group.
    pub fn normalized(&self) -> Option<VariantGroup> {
        if !self.is_active() {
            return None;
        }
        Some(VariantGroup::new(self.trimmed_name(), self.valid_options()))
    }
}

impl ValueObject for VariantGroup {}

/// Normalized copies of the active groups, in input order.
pub fn active_groups(groups: &[VariantGroup]) -> Vec<VariantGroup> {
    groups.iter().filter_map(VariantGroup::normalized).collect()
}

/// One chosen option value per variant group.
///
/// Backed by a `BTreeMap`, so two selections are equal exactly when they hold
/// the same `(group, value)` pairs, whatever order they were built in, and
/// iteration is always sorted by group name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection(BTreeMap<String, String>);

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, group: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(group, value);
        self
    }

    /// Set the value for a group, returning the previous one.
    pub fn insert(&mut self, group: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(group.into(), value.into())
    }

    pub fn get(&self, group: &str) -> Option<&str> {
        self.0.get(group).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `(group, value)` pairs sorted by group name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Option values in group-name order.
    pub fn values(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.values().map(String::as_str)
    }

    pub fn contains_group(&self, group: &str) -> bool {
        self.0.contains_key(group)
    }

    /// True when every active group has a value here and that value is one of
    /// the group's valid options.
    pub fn is_complete_for(&self, groups: &[VariantGroup]) -> bool {
        groups.iter().filter(|g| g.is_active()).all(|group| {
            self.get(group.trimmed_name())
                .is_some_and(|value| group.valid_options().any(|option| option == value))
        })
    }
}

impl ValueObject for Selection {}

impl<K, V> FromIterator<(K, V)> for Selection
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl core::fmt::Display for Selection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (i, (group, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" / ")?;
            }
            write!(f, "{group}: {value}")?;
        }
        Ok(())
    }
}

/// One entry of a product's inventory matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantCombination {
    pub options: Selection,
    #[serde(default)]
    pub stock: u32,
    /// Price override in minor currency units; `None` means "use the base price".
    /// Zero is refused on load.
    #[serde(
        default,
        deserialize_with = "positive_price",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl VariantCombination {
    /// A newly generated entry: no stock, base price, no image.
    pub fn fresh(options: Selection, sku: impl Into<String>) -> Self {
        Self {
            options,
            stock: 0,
            price: None,
            sku: Some(sku.into()),
            image: None,
        }
    }

    pub fn effective_price(&self, base_price: u64) -> u64 {
        self.price.unwrap_or(base_price)
    }

    /// Whether an operator has put data here that a drop would lose.
    pub fn carries_operator_data(&self) -> bool {
        self.stock > 0 || self.price.is_some() || self.image.is_some()
    }
}

fn positive_price<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<u64>::deserialize(deserializer)? {
        Some(0) => Err(serde::de::Error::custom("price override must be positive")),
        price => Ok(price),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_groups_are_inactive() {
        assert!(!VariantGroup::new("  ", ["Red"]).is_active());
        assert!(!VariantGroup::new("Color", ["", "   "]).is_active());
        assert!(!VariantGroup::new("Color", Vec::<String>::new()).is_active());
        assert!(VariantGroup::new("Color", ["", " Red "]).is_active());
    }

    #[test]
    fn normalized_trims_and_keeps_duplicates() {
        let group = VariantGroup::new(" Size ", ["S", " ", " M", "M"]);
        let normalized = group.normalized().unwrap();
        assert_eq!(normalized.name, "Size");
        assert_eq!(normalized.options, vec!["S", "M", "M"]);
    }

    #[test]
    fn active_groups_skips_inactive_ones() {
        let groups = vec![
            VariantGroup::new("Color", ["Red"]),
            VariantGroup::new("", ["X"]),
            VariantGroup::new("Size", [" "]),
        ];
        let active = active_groups(&groups);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "Color");
    }

    #[test]
    fn selection_equality_ignores_insertion_order() {
        let a = Selection::new().with("Color", "Red").with("Size", "M");
        let b = Selection::new().with("Size", "M").with("Color", "Red");
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "Color: Red / Size: M");
    }

    #[test]
    fn selections_of_different_cardinality_differ() {
        let a = Selection::new().with("Color", "Red");
        let b = Selection::new().with("Color", "Red").with("Size", "M");
        assert_ne!(a, b);
    }

    #[test]
    fn completeness_checks_every_active_group() {
        let groups = vec![
            VariantGroup::new("Color", ["Red", "Blue"]),
            VariantGroup::new("Size", ["S"]),
            VariantGroup::new("Blank", [""]),
        ];
        let full = Selection::new().with("Color", "Blue").with("Size", "S");
        assert!(full.is_complete_for(&groups));
        assert!(!Selection::new().with("Color", "Blue").is_complete_for(&groups));
        assert!(!Selection::new().with("Color", "Green").with("Size", "S").is_complete_for(&groups));
    }

    #[test]
    fn combination_serializes_without_empty_overrides() {
        let combination = VariantCombination::fresh(Selection::new().with("Color", "Red"), "TSH-RE-101");
        let json = serde_json::to_value(&combination).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "options": { "Color": "Red" }, "stock": 0, "sku": "TSH-RE-101" })
        );
        assert!(!combination.carries_operator_data());
        assert_eq!(combination.effective_price(999), 999);
    }

    #[test]
    fn zero_price_override_does_not_deserialize() {
        let json = serde_json::json!({ "options": { "Color": "Red" }, "price": 0 });
        assert!(serde_json::from_value::<VariantCombination>(json).is_err());

        let json = serde_json::json!({ "options": { "Color": "Red" }, "price": 1299 });
        let combination: VariantCombination = serde_json::from_value(json).unwrap();
        assert_eq!(combination.price, Some(1299));

        let json = serde_json::json!({ "options": { "Color": "Red" } });
        let combination: VariantCombination = serde_json::from_value(json).unwrap();
        assert_eq!(combination.price, None);
    }
}
