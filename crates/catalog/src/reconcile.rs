//! Merging a freshly generated matrix with the previously edited one.

use std::collections::{HashMap, VecDeque};

use rand::Rng;

use crate::sku::SkuAllocator;
use crate::variant::{Selection, VariantCombination};

/// Outcome of a reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// The new matrix, one entry per fresh tuple, in fresh-tuple order.
    pub matrix: Vec<VariantCombination>,
    /// Tuples that had no prior entry and received defaults.
    pub created: Vec<Selection>,
    /// Prior entries that no longer correspond to any fresh tuple.
    pub dropped: Vec<VariantCombination>,
}

impl Reconciliation {
    /// Dropped entries whose stock, price override or image is lost.
    pub fn lost_operator_data(&self) -> impl Iterator<Item = &VariantCombination> + '_ {
        self.dropped.iter().filter(|c| c.carries_operator_data())
    }
}

/// Reconcile `fresh` tuples against `prior`, returning only the new matrix.
pub fn reconcile<R: Rng>(
    fresh: &[Selection],
    prior: &[VariantCombination],
    allocator: &mut SkuAllocator<R>,
    product_name: &str,
) -> Vec<VariantCombination> {
    reconcile_with_report(fresh, prior, allocator, product_name).matrix
}

/// Reconcile `fresh` tuples against `prior`.
///
/// Matching is by value: a prior entry matches a tuple when its options hold
/// exactly the same `(group, value)` pairs. Matches are carried over
/// untouched. Unmatched tuples get `stock = 0`, no price override, no image
/// and a newly allocated SKU. Prior entries left unmatched are dropped.
///
/// When the same tuple occurs more than once (duplicate options in a group),
/// the n-th occurrence pairs with the n-th equal prior entry, so running the
/// reconciliation again with unchanged groups returns the same matrix.
pub fn reconcile_with_report<R: Rng>(
    fresh: &[Selection],
    prior: &[VariantCombination],
    allocator: &mut SkuAllocator<R>,
    product_name: &str,
) -> Reconciliation {
    let mut index: HashMap<&Selection, VecDeque<usize>> = HashMap::new();
    for (i, combination) in prior.iter().enumerate() {
        index.entry(&combination.options).or_default().push_back(i);
    }

    let mut matched = vec![false; prior.len()];
    let mut matrix = Vec::with_capacity(fresh.len());
    let mut created = Vec::new();

    for tuple in fresh {
        match index.get_mut(tuple).and_then(VecDeque::pop_front) {
            Some(i) => {
                matched[i] = true;
                matrix.push(prior[i].clone());
            }
            None => {
                let sku = allocator.allocate(product_name, tuple);
                created.push(tuple.clone());
                matrix.push(VariantCombination::fresh(tuple.clone(), sku));
            }
        }
    }

    let dropped: Vec<VariantCombination> = prior
        .iter()
        .zip(&matched)
        .filter(|(_, kept)| !**kept)
        .map(|(combination, _)| combination.clone())
        .collect();

    for combination in dropped.iter().filter(|c| c.carries_operator_data()) {
        tracing::warn!(
            product = product_name,
            options = %combination.options,
            stock = combination.stock,
            price = ?combination.price,
            "dropping variant combination that no longer matches the variant groups"
        );
    }

    tracing::debug!(
        product = product_name,
        kept = matrix.len() - created.len(),
        created = created.len(),
        dropped = dropped.len(),
        "reconciled inventory matrix"
    );

    Reconciliation {
        matrix,
        created,
        dropped,
    }
}
