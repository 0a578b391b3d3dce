use super::*;

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use std::collections::BTreeMap;

/// Walk the whole tree checking every structural invariant: BST ordering,
/// cached heights against recomputed heights, balance factors, and the
/// reachable node count against `len`.
fn validate_tree<K: Ord + std::fmt::Debug, V>(map: &AvlMap<K, V>) {
    fn check<K: Ord + std::fmt::Debug, V>(
        link: &Link<K, V>,
        lower: Option<&K>,
        upper: Option<&K>,
    ) -> (usize, u8) {
        let Some(node) = link.as_deref() else {
            return (0, 0);
        };

        if let Some(lower) = lower {
            assert!(
                node.key > *lower,
                "key {:?} must be greater than ancestor bound {:?}",
                node.key,
                lower
            );
        }
        if let Some(upper) = upper {
            assert!(
                node.key < *upper,
                "key {:?} must be less than ancestor bound {:?}",
                node.key,
                upper
            );
        }

        let (left_count, left_height) = check(&node.left, lower, Some(&node.key));
        let (right_count, right_height) = check(&node.right, Some(&node.key), upper);

        assert_eq!(
            node.height,
            1 + left_height.max(right_height),
            "cached height must match recomputed height at {:?}",
            node.key
        );
        let balance = i16::from(left_height) - i16::from(right_height);
        assert!(
            (-1..=1).contains(&balance),
            "balance factor {balance} out of range at {:?}",
            node.key
        );

        (left_count + right_count + 1, node.height)
    }

    let (count, _) = check(&map.root, None, None);
    assert_eq!(count, map.len(), "reachable node count must match len");
}

/// Keys are drawn from a small range so that op sequences hit the same key
/// repeatedly, exercising overwrites and removals of present keys.
#[derive(Clone, Debug, Arbitrary)]
enum Op {
    Insert(#[proptest(strategy = "0u16..512")] u16, u32),
    Remove(#[proptest(strategy = "0u16..512")] u16),
    Get(#[proptest(strategy = "0u16..512")] u16),
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence_ops(ops in prop::collection::vec(any::<Op>(), 0..=2000)) {
        let mut map: AvlMap<u16, u32> = AvlMap::new();
        let mut reference: BTreeMap<u16, u32> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(key, value) => {
                    prop_assert_eq!(map.insert(key, value), reference.insert(key, value));
                }
                Op::Remove(key) => {
                    prop_assert_eq!(map.remove(&key), reference.remove(&key));
                }
                Op::Get(key) => {
                    prop_assert_eq!(map.get(&key), reference.get(&key));
                }
            }

            prop_assert_eq!(map.len(), reference.len());
        }

        validate_tree(&map);
        let got: Vec<(u16, u32)> = map.iter().map(|(k, v)| (*k, *v)).collect();
        let expected: Vec<(u16, u32)> = reference.iter().map(|(k, v)| (*k, *v)).collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_iter_matches_btreemap(entries in prop::collection::vec((any::<u32>(), any::<u32>()), 0..=500)) {
        let mut map: AvlMap<u32, u32> = AvlMap::new();
        let mut reference: BTreeMap<u32, u32> = BTreeMap::new();

        for (key, value) in entries {
            prop_assert_eq!(map.insert(key, value), reference.insert(key, value));
        }

        validate_tree(&map);
        let got: Vec<(u32, u32)> = map.iter().map(|(k, v)| (*k, *v)).collect();
        let expected: Vec<(u32, u32)> = reference.iter().map(|(k, v)| (*k, *v)).collect();
        prop_assert_eq!(got, expected);

        // Keys come out strictly ascending.
        let keys: Vec<u32> = map.iter().map(|(k, _)| *k).collect();
        prop_assert!(keys.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn prop_height_bound(keys in prop::collection::hash_set(any::<u32>(), 0..=1024)) {
        let mut map: AvlMap<u32, ()> = AvlMap::new();
        let n = keys.len();
        for key in keys {
            map.insert(key, ());
        }

        prop_assert_eq!(map.len(), n);
        validate_tree(&map);

        let bound = 1.4405 * ((n as f64) + 2.0).log2();
        prop_assert!(
            (map.height() as f64) < bound,
            "height {} exceeds AVL bound {} for {} keys",
            map.height(),
            bound,
            n
        );
    }

    #[test]
    fn prop_into_iter_matches_iter(entries in prop::collection::vec((any::<u16>(), any::<u32>()), 0..=300)) {
        let map: AvlMap<u16, u32> = entries.into_iter().collect();
        let borrowed: Vec<(u16, u32)> = map.iter().map(|(k, v)| (*k, *v)).collect();
        let owned: Vec<(u16, u32)> = map.into_iter().collect();
        prop_assert_eq!(borrowed, owned);
    }
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(items: &[T], used: &mut [bool], out: &mut Vec<T>, f: &mut impl FnMut(Vec<T>)) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

#[test]
fn exhaustive_insert_order_small_set() {
    let keys: Vec<u32> = vec![5, 10, 15, 20, 25, 30, 35];

    for_each_permutation(&keys, |perm| {
        let mut map: AvlMap<u32, u64> = AvlMap::new();
        let mut reference: BTreeMap<u32, u64> = BTreeMap::new();

        for (i, key) in perm.into_iter().enumerate() {
            let value = i as u64;
            assert_eq!(map.insert(key, value), reference.insert(key, value));
            validate_tree(&map);
        }

        let got: Vec<(u32, u64)> = map.iter().map(|(k, v)| (*k, *v)).collect();
        let expected: Vec<(u32, u64)> = reference.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(got, expected);
    });
}

#[test]
fn exhaustive_remove_order_small_set() {
    let keys: Vec<u32> = vec![5, 10, 15, 20, 25, 30, 35];

    // Insert in a fixed order, then remove in all permutations.
    let mut base_map: AvlMap<u32, u64> = AvlMap::new();
    let mut base_reference: BTreeMap<u32, u64> = BTreeMap::new();
    for (i, key) in keys.iter().enumerate() {
        let value = i as u64;
        assert_eq!(base_map.insert(*key, value), base_reference.insert(*key, value));
    }

    for_each_permutation(&keys, |perm| {
        let mut map = base_map.clone();
        let mut reference = base_reference.clone();

        for key in perm {
            assert_eq!(map.remove(&key), reference.remove(&key));
            assert_eq!(map.len(), reference.len());
            validate_tree(&map);
        }
        assert_eq!(map.len(), 0);
        assert!(map.root.is_none());
    });
}
