use std::collections::{BTreeMap, BTreeSet, HashMap};

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use uuid::Uuid;

use storefront_catalog::{
    CompositeKey, ProductId, ProductRecord, Selection, SkuAllocator, VariantCombination,
    VariantGroup, derive_key, generate, reconcile, resolve,
};
use storefront_core::AggregateId;

fn product_id(n: u128) -> ProductId {
    ProductId::new(AggregateId::from_uuid(Uuid::from_u128(n)))
}

fn allocator(seed: u64) -> SkuAllocator<StdRng> {
    SkuAllocator::with_rng(StdRng::seed_from_u64(seed))
}

/// Content of a matrix keyed by composite key, ignoring entry order.
fn by_key(product: &ProductId, matrix: &[VariantCombination]) -> HashMap<CompositeKey, VariantCombination> {
    matrix
        .iter()
        .map(|c| (derive_key(product, Some(&c.options)), c.clone()))
        .collect()
}

/// Groups with unique names and unique options (possibly blank / inactive).
fn groups_strategy() -> impl Strategy<Value = Vec<VariantGroup>> {
    prop::collection::btree_map(
        "[A-Z][a-z]{0,6}",
        prop::collection::btree_set("[A-Za-z0-9 ]{0,4}", 0..4),
        0..4,
    )
    .prop_map(|groups: BTreeMap<String, BTreeSet<String>>| {
        groups
            .into_iter()
            .map(|(name, options)| VariantGroup::new(name, options))
            .collect()
    })
}

/// Option values that stay distinct after trimming.
fn active_groups_strategy() -> impl Strategy<Value = Vec<VariantGroup>> {
    prop::collection::btree_map(
        "[A-Z][a-z]{0,6}",
        prop::collection::btree_set("[A-Za-z0-9]{1,4}", 1..4),
        1..4,
    )
    .prop_map(|groups: BTreeMap<String, BTreeSet<String>>| {
        groups
            .into_iter()
            .map(|(name, options)| VariantGroup::new(name, options))
            .collect()
    })
}

fn selection_strategy() -> impl Strategy<Value = Selection> {
    prop::collection::btree_map("[A-Za-z:,|\\\\]{0,4}", "[A-Za-z:,|\\\\]{0,4}", 0..4)
        .prop_map(|pairs: BTreeMap<String, String>| pairs.into_iter().collect::<Selection>())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    })]

    /// Property: the matrix size is the product of the valid option counts.
    #[test]
    fn generated_count_is_product_of_option_counts(groups in groups_strategy()) {
        let active: Vec<&VariantGroup> = groups.iter().filter(|g| g.is_active()).collect();
        let expected = if active.is_empty() {
            0
        } else {
            active.iter().map(|g| g.valid_options().count()).product::<usize>()
        };
        prop_assert_eq!(generate(&groups).len(), expected);
    }

    /// Property: keys do not depend on the order the selection was built in.
    #[test]
    fn key_ignores_insertion_order(pairs in prop::collection::vec(("[A-Za-z]{1,5}", "[A-Za-z]{0,5}"), 0..5)) {
        let forward: Selection = pairs.iter().cloned().collect();
        let backward: Selection = pairs.iter().rev().cloned().collect();
        // Later duplicates win in both; only compare when they describe the same set.
        prop_assume!(forward == backward);
        let p = product_id(1);
        prop_assert_eq!(derive_key(&p, Some(&forward)), derive_key(&p, Some(&backward)));
    }

    /// Property: distinct selections and distinct products never collide.
    #[test]
    fn keys_are_injective(
        a in selection_strategy(),
        b in selection_strategy(),
        p in 0u128..4,
        q in 0u128..4,
    ) {
        let ka = derive_key(&product_id(p), Some(&a));
        let kb = derive_key(&product_id(q), Some(&b));
        let same_identity = p == q && a == b;
        prop_assert_eq!(ka == kb, same_identity);
    }

    /// Property: re-syncing an unchanged definition is a no-op on content.
    #[test]
    fn reconcile_is_idempotent(groups in active_groups_strategy(), seed in any::<u64>(), edits in any::<u32>()) {
        let p = product_id(7);
        let fresh = generate(&groups);

        // An arbitrary prior matrix: an edited subset of the current one plus a stale entry.
        let mut prior = reconcile(&fresh, &[], &mut allocator(seed), "Tee");
        for (i, entry) in prior.iter_mut().enumerate() {
            if (edits >> (i % 32)) & 1 == 1 {
                entry.stock = i as u32 + 1;
                entry.price = Some(100 + i as u64);
            }
        }
        prior.retain(|c| c.stock % 3 != 2);
        prior.push(VariantCombination::fresh(Selection::new().with("Stale", "Gone"), "OLD-1"));

        let once = reconcile(&fresh, &prior, &mut allocator(seed), "Tee");
        let twice = reconcile(&fresh, &once, &mut allocator(seed.wrapping_add(1)), "Tee");
        prop_assert_eq!(by_key(&p, &once), by_key(&p, &twice));
    }
}

#[test]
fn preserved_entries_keep_stock_and_price() {
    let groups = vec![
        VariantGroup::new("Size", ["S", "M", "L"]),
        VariantGroup::new("Color", ["Red", "Blue"]),
    ];
    let prior = vec![VariantCombination {
        options: Selection::new().with("Color", "Red").with("Size", "L"),
        stock: 7,
        price: Some(499),
        sku: Some("TEE-RE-LA-123".to_string()),
        image: None,
    }];

    let matrix = reconcile(&generate(&groups), &prior, &mut allocator(1), "Tee");

    let entry = matrix
        .iter()
        .find(|c| c.options == prior[0].options)
        .expect("entry should survive");
    assert_eq!((entry.stock, entry.price), (7, Some(499)));
}

#[test]
fn removing_size_removes_every_size_entry() {
    let with_size = vec![
        VariantGroup::new("Size", ["S", "M"]),
        VariantGroup::new("Color", ["Red", "Blue"]),
    ];
    let mut prior = reconcile(&generate(&with_size), &[], &mut allocator(2), "Tee");
    for entry in &mut prior {
        entry.stock = 4;
    }

    let without_size = vec![VariantGroup::new("Color", ["Red", "Blue"])];
    let matrix = reconcile(&generate(&without_size), &prior, &mut allocator(3), "Tee");

    assert_eq!(matrix.len(), 2);
    assert!(matrix.iter().all(|c| !c.options.contains_group("Size")));
    assert!(matrix.iter().all(|c| c.stock == 0));
}

#[test]
fn size_by_color_scenario_resolves_to_base_price() {
    let groups = vec![
        VariantGroup::new("Size", ["S", "M", "L"]),
        VariantGroup::new("Color", ["Red", "Blue"]),
    ];
    let selections = generate(&groups);
    assert_eq!(selections.len(), 6);

    let mut product = ProductRecord::new(product_id(8), "Tee", 999, 0);
    product.variants = groups;
    product.inventory = reconcile(&selections, &[], &mut allocator(4), &product.name);
    let target = Selection::new().with("Size", "M").with("Color", "Blue");
    for entry in &mut product.inventory {
        if entry.options == target {
            entry.stock = 3;
        }
    }

    let resolution = resolve(&product, Some(&target));
    assert_eq!((resolution.stock, resolution.price), (3, 999));
    assert!(resolution.matched);
}
