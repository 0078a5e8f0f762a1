use std::ops::Range;

use proptest::prelude::*;

use crate::model;

use super::*;

fn insert_find_all(keys: &[u32]) {
    let mut tree: AvlTree<u32, u32> = AvlTree::new();

    for &key in keys {
        assert_eq!(tree.insert(key, key + 100), None);
        tree.assert_invariants();
    }

    for key in keys {
        assert_eq!(tree.get(key), Some(&(key + 100)));
        let id = tree.as_tree().find_node(key).expect("item not found");
        assert_eq!(tree.node(id).map(Node::key), Some(key));
    }
}

#[test]
fn zero_elems_find() {
    insert_find_all(&[]);
}

#[test]
fn single_elem_find() {
    insert_find_all(&[0]);
}

#[test]
fn two_elems_find() {
    insert_find_all(&[0, 1]);
    insert_find_all(&[1, 0]);
}

#[test]
fn three_elems_find() {
    insert_find_all(&[0, 1, 2]);
    insert_find_all(&[0, 2, 1]);
    insert_find_all(&[1, 0, 2]);
    insert_find_all(&[1, 2, 0]);
    insert_find_all(&[2, 0, 1]);
    insert_find_all(&[2, 1, 0]);
}

// Every ordering of `0..n`, in lexicographic order.
fn permutations(n: u32) -> Vec<Vec<u32>> {
    if n == 0 {
        return vec![vec![]];
    }

    let mut out = Vec::new();
    for first in 0..n {
        for rest in permutations(n - 1) {
            let mut perm = vec![first];
            perm.extend(rest.into_iter().map(|k| if k >= first { k + 1 } else { k }));
            out.push(perm);
        }
    }
    out
}

#[test]
fn four_and_five_elems_find() {
    for perm in permutations(4).into_iter().chain(permutations(5)) {
        insert_find_all(&perm);
    }
}

fn insert_remove_all(keys: &[u32]) {
    let mut tree: AvlTree<u32, u32> = AvlTree::new();

    for &key in keys {
        tree.insert(key, key);
        tree.assert_invariants();
    }

    for key in keys {
        assert_eq!(tree.remove(key), Some(*key));
        tree.assert_invariants();
    }
    assert!(tree.is_empty());
    assert_eq!(tree.root(), None);

    for &key in keys {
        tree.insert(key, key);
        tree.assert_invariants();
    }

    for key in keys.iter().rev() {
        assert_eq!(tree.remove(key), Some(*key));
        tree.assert_invariants();
    }
    assert!(tree.is_empty());
    assert_eq!(tree.root(), None);
}

#[test]
fn remove_one() {
    insert_remove_all(&[0]);
}

#[test]
fn remove_two() {
    insert_remove_all(&[0, 1]);
    insert_remove_all(&[1, 0]);
}

#[test]
fn remove_three() {
    insert_remove_all(&[0, 1, 2]);
    insert_remove_all(&[0, 2, 1]);
    insert_remove_all(&[1, 0, 2]);
    insert_remove_all(&[1, 2, 0]);
    insert_remove_all(&[2, 0, 1]);
    insert_remove_all(&[2, 1, 0]);
}

#[test]
fn remove_four_and_five() {
    for perm in permutations(4).into_iter().chain(permutations(5)) {
        insert_remove_all(&perm);
    }
}

// Key, value, balance and link handles of every node, in key order.
fn snapshot(tree: &AvlTree<u32, u32>) -> Vec<(u32, u32, i8, Option<NodeId>, Option<NodeId>)> {
    let bst = tree.as_tree();
    let mut out = Vec::new();
    let mut cur = bst.first_key_value().and_then(|(k, _)| bst.find_node(k));

    while let Some(id) = cur {
        let n = tree.node(id).expect("live node");
        out.push((*n.key(), *n.value(), n.balance(), n.left(), n.right()));
        cur = bst.successor(id);
    }

    out
}

#[test]
fn remove_missing_key_is_noop() {
    let mut tree: AvlTree<u32, u32> = (0..20).map(|k| (k * 2, k)).collect();
    let before = snapshot(&tree);
    let root = tree.root();

    assert_eq!(tree.remove(&7), None);
    assert_eq!(tree.remove(&100), None);

    assert_eq!(tree.root(), root);
    assert_eq!(snapshot(&tree), before);
    tree.assert_invariants();

    let mut empty: AvlTree<u32, u32> = AvlTree::new();
    assert_eq!(empty.remove(&0), None);
    assert!(empty.is_empty());
}

#[test]
fn upsert_keeps_shape() {
    let mut tree: AvlTree<u32, u32> = (0..31).map(|k| (k, 0)).collect();
    let before = snapshot(&tree);

    assert_eq!(tree.insert(17, 1700), Some(0));
    assert_eq!(tree.len(), 31);

    let after = snapshot(&tree);
    for (old, new) in before.iter().zip(&after) {
        if old.0 == 17 {
            assert_eq!(new.1, 1700);
        } else {
            assert_eq!(old.1, new.1);
        }
        assert_eq!((old.0, old.2, old.3, old.4), (new.0, new.2, new.3, new.4));
    }
}

#[test]
fn get_mut_and_try_get() {
    let mut tree: AvlTree<String, u32> = AvlTree::new();
    tree.insert("a".to_string(), 1);
    tree.insert("b".to_string(), 2);

    *tree.get_mut("a").expect("present") += 10;
    assert_eq!(tree.try_get("a"), Ok(&11));
    assert_eq!(tree.try_get("z"), Err(Error::KeyNotFound));
    assert!(tree.contains_key("b"));
    assert!(!tree.contains_key("c"));
}

#[test]
fn pop_first_and_last() {
    let mut tree: AvlTree<u32, ()> = (0..10).map(|k| (k, ())).collect();

    assert_eq!(tree.pop_first(), Some((0, ())));
    assert_eq!(tree.pop_last(), Some((9, ())));
    tree.assert_invariants();
    assert_eq!(tree.first_key_value(), Some((&1, &())));
    assert_eq!(tree.last_key_value(), Some((&8, &())));

    tree.clear();
    assert_eq!(tree.pop_first(), None);
    assert_eq!(tree.pop_last(), None);
}

#[test]
fn slots_are_recycled() {
    let mut tree: AvlTree<u32, u32> = AvlTree::new();
    for round in 0..10 {
        for k in 0..64 {
            tree.insert(k, round);
        }
        for k in 0..64 {
            tree.remove(&k);
        }
    }

    assert!(tree.is_empty());
    assert_eq!(tree.as_tree().nodes.capacity(), 64);
}

#[cfg(miri)]
const FUZZ_RANGE: Range<usize> = 0..10;

#[cfg(not(miri))]
const FUZZ_RANGE: Range<usize> = 0..500;

fn height_bound(len: usize) -> usize {
    (1.44 * ((len + 2) as f64).log2()).ceil() as usize
}

proptest::proptest! {
    #![proptest_config(ProptestConfig {
        max_shrink_iters: 65536,
        .. ProptestConfig::default()
    })]

    #[test]
    fn btree_equivalence(ops in proptest::collection::vec(model::op_strategy(), FUZZ_RANGE)) {
        model::run_btree_equivalence(ops);
    }

    #[test]
    fn height_stays_logarithmic(
        inserts in proptest::collection::vec(0u32..10_000, 0..500),
        removes in proptest::collection::vec(0u32..10_000, 0..500),
    ) {
        let mut tree = AvlTree::new();

        for key in inserts {
            tree.insert(key, ());
            prop_assert!(tree.height() <= height_bound(tree.len()));
            prop_assert!(tree.as_tree().is_balanced());
        }

        for key in removes {
            tree.remove(&key);
            prop_assert!(tree.height() <= height_bound(tree.len()));
            prop_assert!(tree.as_tree().is_balanced());
        }
    }

    #[test]
    fn insert_then_remove_all_empties(
        (inserts, removes) in proptest::collection::hash_set(any::<u32>(), 0..200)
            .prop_map(|set| set.into_iter().collect::<Vec<_>>())
            .prop_flat_map(|keys| (Just(keys.clone()), Just(keys).prop_shuffle()))
    ) {
        let mut tree = AvlTree::new();
        for &key in &inserts {
            prop_assert_eq!(tree.insert(key, key), None);
        }
        prop_assert_eq!(tree.len(), inserts.len());

        for key in removes {
            prop_assert_eq!(tree.remove(&key), Some(key));
            tree.assert_invariants();
        }

        prop_assert!(tree.is_empty());
        prop_assert_eq!(tree.root(), None);
    }
}
