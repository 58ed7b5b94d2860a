//! Expansion of variant groups into the Cartesian product of selections.

use storefront_core::{DomainError, DomainResult};

use crate::variant::{Selection, VariantGroup};

/// Expand the active groups into every combination of their valid options.
///
/// Inactive groups are skipped. With no active group the result is empty and
/// the product keeps using its base stock. The first group varies slowest;
/// callers must not rely on that order when matching against stored entries.
///
/// The result size is the product of the valid option counts and is not
/// bounded here. Use [`generate_capped`] when the groups come from user input.
pub fn generate(groups: &[VariantGroup]) -> Vec<Selection> {
    let active: Vec<&VariantGroup> = groups.iter().filter(|g| g.is_active()).collect();
    if active.is_empty() {
        return Vec::new();
    }

    let mut partials = vec![Selection::new()];
    for group in &active {
        let name = group.trimmed_name();
        let options: Vec<&str> = group.valid_options().collect();

        let mut next = Vec::with_capacity(partials.len().saturating_mul(options.len()));
        for partial in &partials {
            for option in &options {
                next.push(partial.clone().with(name, *option));
            }
        }
        partials = next;
    }

    tracing::debug!(
        groups = active.len(),
        combinations = partials.len(),
        "generated variant combinations"
    );
    partials
}

/// Number of selections [`generate`] would return, without building them.
///
/// `None` if the count does not fit in `usize`.
pub fn combination_count(groups: &[VariantGroup]) -> Option<usize> {
    let mut active = groups.iter().filter(|g| g.is_active()).peekable();
    if active.peek().is_none() {
        return Some(0);
    }
    active.try_fold(1usize, |acc, group| acc.checked_mul(group.valid_options().count()))
}

/// [`generate`], refusing when the matrix would exceed `max_combinations`.
pub fn generate_capped(
    groups: &[VariantGroup],
    max_combinations: usize,
) -> DomainResult<Vec<Selection>> {
    match combination_count(groups) {
        Some(count) if count <= max_combinations => Ok(generate(groups)),
        Some(count) => Err(DomainError::validation(format!(
            "variant groups expand to {count} combinations (limit {max_combinations})"
        ))),
        None => Err(DomainError::validation(format!(
            "variant groups expand to more combinations than can be counted (limit {max_combinations})"
        ))),
    }
}
